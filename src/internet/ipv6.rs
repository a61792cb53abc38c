use std::net::Ipv6Addr;

use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::transport::{parse_transport_layer, IpProtocol, TransportLayer};
use crate::utils::take_array;
use crate::TraceError;

/// An IPv6 packet (fixed header only)
///
/// Extension headers are not walked: `next_header` selects the transport
/// decoder directly, and unsupported values decode as
/// [`TransportLayer::Unknown`].
#[derive(Clone, Debug, PartialEq)]
pub struct Ipv6Packet {
    pub traffic_class: u8,
    /// 20-bit flow label
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: IpProtocol,
    pub hop_limit: u8,
    pub source_address: Ipv6Addr,
    pub destination_address: Ipv6Addr,
    pub payload: TransportLayer,
}

impl Ipv6Packet {
    /// Fixed header size, in bytes
    pub const HEADER_LEN: usize = 40;
}

/// Parse an IPv6 packet and its transport-layer payload
///
/// Everything after the fixed header is handed to the transport decoder.
pub fn parse_ipv6_packet(i: &[u8]) -> IResult<&[u8], Ipv6Packet, TraceError> {
    if i.len() < Ipv6Packet::HEADER_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, start) = take_array::<4>(i)?;
    let (i, payload_length) = be_u16(i)?;
    let (i, next_header) = be_u8(i)?;
    let (i, hop_limit) = be_u8(i)?;
    let (i, source) = take_array::<16>(i)?;
    let (i, destination) = take_array::<16>(i)?;

    if start[0] >> 4 != 6 {
        return Err(nom::Err::Error(TraceError::TypeMismatch));
    }
    let traffic_class = ((start[0] & 0x0f) << 4) | (start[1] >> 4);
    let flow_label =
        (u32::from(start[1] & 0x0f) << 16) | (u32::from(start[2]) << 8) | u32::from(start[3]);

    let next_header = IpProtocol(next_header);
    let (i, payload) = parse_transport_layer(i, next_header)?;
    let packet = Ipv6Packet {
        traffic_class,
        flow_label,
        payload_length,
        next_header,
        hop_limit,
        source_address: Ipv6Addr::from(source),
        destination_address: Ipv6Addr::from(destination),
        payload,
    };
    Ok((i, packet))
}
