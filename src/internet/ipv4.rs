use std::net::Ipv4Addr;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::transport::{parse_transport_layer, IpProtocol, TransportLayer};
use crate::utils::take_array;
use crate::TraceError;

/// An IPv4 packet, with its bit-packed header fields expanded
#[derive(Clone, Debug, PartialEq)]
pub struct Ipv4Packet {
    /// Header length, in 32-bit words
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub id: u16,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: IpProtocol,
    pub checksum: u16,
    pub source_address: Ipv4Addr,
    pub destination_address: Ipv4Addr,
    /// Raw option bytes (`(ihl - 5) * 4` bytes)
    pub options: Vec<u8>,
    pub payload: TransportLayer,
}

impl Ipv4Packet {
    /// Fixed header size, in bytes
    pub const HEADER_LEN: usize = 20;

    /// Header size, options included, in bytes
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl) * 4
    }
}

/// Parse an IPv4 packet and its transport-layer payload
///
/// The payload is bounded by `total_length`; anything after it (for ex.
/// Ethernet padding) is returned unparsed.
pub fn parse_ipv4_packet(i: &[u8]) -> IResult<&[u8], Ipv4Packet, TraceError> {
    if i.len() < Ipv4Packet::HEADER_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, version_ihl) = be_u8(i)?;
    let (i, dscp_ecn) = be_u8(i)?;
    let (i, total_length) = be_u16(i)?;
    let (i, id) = be_u16(i)?;
    let (i, flags_fragment) = take_array::<2>(i)?;
    let (i, ttl) = be_u8(i)?;
    let (i, protocol) = be_u8(i)?;
    let (i, checksum) = be_u16(i)?;
    let (i, source) = take_array::<4>(i)?;
    let (i, destination) = take_array::<4>(i)?;

    if version_ihl >> 4 != 4 {
        return Err(nom::Err::Error(TraceError::TypeMismatch));
    }
    let ihl = version_ihl & 0x0f;

    let (i, options) = if ihl > 5 {
        take(usize::from(ihl - 5) * 4)(i)?
    } else {
        (i, &[][..])
    };

    // total length includes the header, options included
    let header_len = usize::from(ihl) * 4;
    let payload_len = usize::from(total_length)
        .checked_sub(header_len)
        .ok_or(nom::Err::Error(TraceError::InsufficientLength))?;
    let (i, data) = take(payload_len)(i)?;
    let protocol = IpProtocol(protocol);
    let (_, payload) = parse_transport_layer(data, protocol)?;

    let packet = Ipv4Packet {
        ihl,
        dscp: dscp_ecn >> 2,
        ecn: dscp_ecn & 0x03,
        total_length,
        id,
        dont_fragment: flags_fragment[0] & 0x40 != 0,
        more_fragments: flags_fragment[0] & 0x20 != 0,
        fragment_offset: u16::from_be_bytes([flags_fragment[0] & 0x1f, flags_fragment[1]]),
        ttl,
        protocol,
        checksum,
        source_address: Ipv4Addr::from(source),
        destination_address: Ipv4Addr::from(destination),
        options: options.to_vec(),
        payload,
    };
    Ok((i, packet))
}
