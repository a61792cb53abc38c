//! Transport layer decoding (TCP, UDP, SCTP)

use std::borrow::Cow;

use log::trace;
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::TraceError;

pub mod sctp;
mod tcp;
mod udp;

pub use sctp::{parse_sctp_segment, SctpSegment};
pub use tcp::*;
pub use udp::*;

/// IP protocol number (IPv4 `protocol`, IPv6 `next_header`)
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct IpProtocol(pub u8);

newtype_enum! {
impl debug IpProtocol {
    HOPOPT = 0,
    ICMP = 1,
    TCP = 6,
    UDP = 17,
    TLSP = 56,
    ICMPV6 = 58,
    SCTP = 132,
}
}

/// Decoded transport-layer segment
#[derive(Clone, Debug, PartialEq)]
pub enum TransportLayer {
    Tcp(TcpSegment),
    Udp(UdpDatagram),
    Sctp(SctpSegment),
    /// Protocol not understood: raw bytes
    Unknown(Vec<u8>),
}

impl TransportLayer {
    /// Application data carried by the segment
    ///
    /// For SCTP, this is the concatenation of the user data of all DATA
    /// chunks, in order.
    pub fn data(&self) -> Cow<'_, [u8]> {
        match self {
            TransportLayer::Tcp(s) => Cow::Borrowed(&s.data),
            TransportLayer::Udp(d) => Cow::Borrowed(&d.data),
            TransportLayer::Sctp(s) => Cow::Owned(s.data()),
            TransportLayer::Unknown(v) => Cow::Borrowed(v),
        }
    }
}

/// Decode a transport-layer segment, depending on the IP protocol
pub fn parse_transport_layer(
    i: &[u8],
    protocol: IpProtocol,
) -> IResult<&[u8], TransportLayer, TraceError> {
    match protocol {
        IpProtocol::TCP => {
            let (i, segment) = parse_tcp_segment(i)?;
            Ok((i, TransportLayer::Tcp(segment)))
        }
        IpProtocol::UDP => {
            let (i, datagram) = parse_udp_datagram(i)?;
            Ok((i, TransportLayer::Udp(datagram)))
        }
        IpProtocol::SCTP => {
            let (i, segment) = parse_sctp_segment(i)?;
            Ok((i, TransportLayer::Sctp(segment)))
        }
        _ => {
            trace!("undecoded IP protocol {:?}", protocol);
            Ok((&[], TransportLayer::Unknown(i.to_vec())))
        }
    }
}
