use nom::number::complete::be_u16;
use nom::IResult;

use crate::internet::{parse_internet_layer, EtherType, InternetLayer};
use crate::utils::take_array;
use crate::TraceError;

/// Tag protocol identifier of an IEEE 802.1Q VLAN tag
pub const VLAN_TPID: u16 = 0x8100;

/// Values below this are a payload length, not an EtherType
pub const MIN_ETHERTYPE: u16 = 1536;

/// An Ethernet II / IEEE 802.3 frame
#[derive(Clone, Debug, PartialEq)]
pub struct EthernetFrame {
    pub mac_destination: [u8; 6],
    pub mac_source: [u8; 6],
    /// Complete 802.1Q tag, TPID included
    pub vlan_tag: Option<[u8; 4]>,
    /// Payload length, if the length-or-type field holds a length (else 0)
    pub length: u16,
    /// EtherType, if the length-or-type field holds a type (else 0)
    pub ether_type: EtherType,
    pub payload: InternetLayer,
}

impl EthernetFrame {
    /// The VLAN identifier (low 12 bits of the tag control information)
    pub fn vlan_id(&self) -> Option<u16> {
        self.vlan_tag
            .map(|tag| u16::from_be_bytes([tag[2], tag[3]]) & 0x0fff)
    }
}

/// Parse an Ethernet frame and its internet-layer payload
pub fn parse_ethernet_frame(i: &[u8]) -> IResult<&[u8], EthernetFrame, TraceError> {
    let (i, mac_destination) = take_array::<6>(i)?;
    let (i, mac_source) = take_array::<6>(i)?;
    let (i, mut next_value) = be_u16(i)?;
    let (i, vlan_tag) = if next_value == VLAN_TPID {
        let (i, tci) = take_array::<2>(i)?;
        let [tpid_hi, tpid_lo] = VLAN_TPID.to_be_bytes();
        let (i, value) = be_u16(i)?;
        next_value = value;
        (i, Some([tpid_hi, tpid_lo, tci[0], tci[1]]))
    } else {
        (i, None)
    };
    let (length, ether_type) = if next_value < MIN_ETHERTYPE {
        (next_value, EtherType(0))
    } else {
        (0, EtherType(next_value))
    };
    let (i, payload) = parse_internet_layer(i, ether_type)?;
    let frame = EthernetFrame {
        mac_destination,
        mac_source,
        vlan_tag,
        length,
        ether_type,
        payload,
    };
    Ok((i, frame))
}
