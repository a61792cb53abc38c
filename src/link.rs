//! Link layer decoding
//!
//! The trace header declares one [`Linktype`] for every frame. Only Ethernet
//! framing is decoded; frames of any other link type are kept as raw bytes,
//! wrapped in the unknown variants of each layer.

use log::trace;
use nom::IResult;

use crate::internet::InternetLayer;
use crate::linktype::Linktype;
use crate::transport::TransportLayer;
use crate::TraceError;

mod ethernet;

pub use ethernet::*;

/// Decoded content of one captured frame
#[derive(Clone, Debug, PartialEq)]
pub enum LinkLayer {
    Ethernet(EthernetFrame),
    /// Link type not understood: the whole frame, as an unknown internet layer
    Unknown(InternetLayer),
}

impl LinkLayer {
    /// The internet layer carried by this frame
    pub fn internet(&self) -> &InternetLayer {
        match self {
            LinkLayer::Ethernet(frame) => &frame.payload,
            LinkLayer::Unknown(payload) => payload,
        }
    }
}

/// Decode a link-layer frame, depending on linktype
///
/// The input must be bounded to the captured length of the frame. Bytes not
/// consumed by the inner layers (for ex. Ethernet padding) are returned.
pub fn parse_link_layer(i: &[u8], linktype: Linktype) -> IResult<&[u8], LinkLayer, TraceError> {
    match linktype {
        Linktype::ETHERNET => {
            let (i, frame) = parse_ethernet_frame(i)?;
            Ok((i, LinkLayer::Ethernet(frame)))
        }
        _ => {
            trace!("undecoded link type {}, keeping {} raw bytes", linktype, i.len());
            let payload = InternetLayer::Unknown(TransportLayer::Unknown(i.to_vec()));
            Ok((&[], LinkLayer::Unknown(payload)))
        }
    }
}
