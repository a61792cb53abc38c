//! Internet layer decoding (IPv4, IPv6)

use log::trace;
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::transport::TransportLayer;
use crate::TraceError;

mod ipv4;
mod ipv6;

pub use ipv4::*;
pub use ipv6::*;

/// EtherType of an Ethernet payload
///
/// Only `IPV4` and `IPV6` are decoded, other values produce
/// [`InternetLayer::Unknown`].
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct EtherType(pub u16);

newtype_enum! {
impl debug EtherType {
    IPV4 = 0x0800,
    ARP = 0x0806,
    WAKE_ON_LAN = 0x0842,
    TRILL = 0x22f3,
    DECNET_PHASE_4 = 0x6003,
    REVERSE_ARP = 0x8035,
    APPLETALK = 0x809b,
    APPLETALK_ARP = 0x80f3,
    VLAN = 0x8100,
    IPX1 = 0x8137,
    IPX2 = 0x8138,
    QNET = 0x8204,
    IPV6 = 0x86dd,
    FLOW_CONTROL = 0x8808,
    SLOW = 0x8809,
    COBRANET = 0x8819,
    MPLS_UNICAST = 0x8847,
    MPLS_MULTICAST = 0x8848,
    PPPOE_DISCOVERY = 0x8863,
    PPPOE_SESSION = 0x8864,
    JUMBO_FRAMES = 0x8870,
    HOMEPLUG = 0x887b,
    EAP_OVER_LAN = 0x888e,
    PROFINET = 0x8892,
    HYPERSCSI = 0x889a,
    ATA_OVER_ETHERNET = 0x88a2,
    ETHERCAT = 0x88a4,
    POWERLINK = 0x88ab,
    LLDP = 0x88cc,
    SERCOS3 = 0x88cd,
    MRP = 0x88e3,
    MAC_SECURITY = 0x88e5,
    IEEE1588 = 0x88f7,
    FCOE = 0x8906,
    FCOE_INIT = 0x8914,
    ROCE = 0x8915,
    HSR = 0x892f,
}
}

/// Decoded internet-layer datagram
#[derive(Clone, Debug, PartialEq)]
pub enum InternetLayer {
    Ipv4(Ipv4Packet),
    Ipv6(Ipv6Packet),
    /// EtherType not understood: the raw remainder, as an unknown transport layer
    Unknown(TransportLayer),
}

impl InternetLayer {
    /// The transport layer carried by this datagram
    pub fn transport(&self) -> &TransportLayer {
        match self {
            InternetLayer::Ipv4(p) => &p.payload,
            InternetLayer::Ipv6(p) => &p.payload,
            InternetLayer::Unknown(payload) => payload,
        }
    }
}

/// Decode an internet-layer datagram, depending on the EtherType
pub fn parse_internet_layer(
    i: &[u8],
    ether_type: EtherType,
) -> IResult<&[u8], InternetLayer, TraceError> {
    match ether_type {
        EtherType::IPV4 => {
            let (i, packet) = parse_ipv4_packet(i)?;
            Ok((i, InternetLayer::Ipv4(packet)))
        }
        EtherType::IPV6 => {
            let (i, packet) = parse_ipv6_packet(i)?;
            Ok((i, InternetLayer::Ipv6(packet)))
        }
        _ => {
            trace!("undecoded ethertype {:?}", ether_type);
            let payload = TransportLayer::Unknown(i.to_vec());
            Ok((&[], InternetLayer::Unknown(payload)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_internet_layer, EtherType, InternetLayer};
    use crate::transport::TransportLayer;

    #[test]
    fn test_unknown_ethertype_keeps_bytes() {
        let data = [0x00, 0x01, 0x08, 0x00, 0x06, 0x04];
        for ether_type in &[EtherType::ARP, EtherType(0), EtherType(0xffff)] {
            let (rem, layer) = parse_internet_layer(&data, *ether_type).expect("unknown");
            assert!(rem.is_empty());
            assert_eq!(
                layer,
                InternetLayer::Unknown(TransportLayer::Unknown(data.to_vec()))
            );
        }
    }

    #[test]
    fn test_ethertype_debug() {
        assert_eq!(format!("{:?}", EtherType::IPV6), "IPV6");
        assert_eq!(format!("{}", EtherType::IPV4), "IPV4");
    }
}
