//! SCTP common header and chunk sequence
//!
//! Chunks and their parameters are variable-length records padded to 4 bytes.
//! Each chunk type owning parameters selects a [`ParameterParser`] to decode
//! them, so supporting a new parameter only requires a new parser function.

use nom::number::complete::{be_u16, be_u32};
use nom::IResult;

use crate::TraceError;

mod chunk;
mod parameter;

pub use chunk::*;
pub use parameter::*;

/// An SCTP packet
#[derive(Clone, Debug, PartialEq)]
pub struct SctpSegment {
    pub source_port: u16,
    pub destination_port: u16,
    pub verification_tag: u32,
    pub checksum: u32,
    pub chunks: Vec<Chunk>,
}

impl SctpSegment {
    /// Common header size, in bytes
    pub const HEADER_LEN: usize = 12;

    /// Concatenation of the user data of all DATA chunks, in order
    pub fn data(&self) -> Vec<u8> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                Chunk::Data(data) => Some(data.data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}

/// Parse an SCTP packet; all bytes after the common header are chunks
pub fn parse_sctp_segment(i: &[u8]) -> IResult<&[u8], SctpSegment, TraceError> {
    if i.len() < SctpSegment::HEADER_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, source_port) = be_u16(i)?;
    let (i, destination_port) = be_u16(i)?;
    let (i, verification_tag) = be_u32(i)?;
    let (i, checksum) = be_u32(i)?;
    let (i, chunks) = parse_chunks(i)?;
    let segment = SctpSegment {
        source_port,
        destination_port,
        verification_tag,
        checksum,
        chunks,
    };
    Ok((i, segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{parse_transport_layer, IpProtocol, TransportLayer};
    use hex_literal::hex;

    const SCTP_DATA: &[u8] = &hex!(
        "
0b 59 0b 59 00 00 0e 50 53 82 8c 3e 00 03 00 13
00 00 00 01 00 00 00 00 00 00 00 00 61 62 63 00
0b 00 00 04 00 03 00 12 00 00 00 02 00 00 00 01
00 00 00 00 64 65 00 00"
    );

    #[test]
    fn test_parse_sctp_segment() {
        let (rem, seg) = parse_sctp_segment(SCTP_DATA).expect("sctp parsing failed");
        assert!(rem.is_empty());
        assert_eq!(seg.source_port, 2905);
        assert_eq!(seg.destination_port, 2905);
        assert_eq!(seg.verification_tag, 0x0e50);
        assert_eq!(seg.checksum, 0x5382_8c3e);
        assert_eq!(seg.chunks.len(), 3);
        assert_eq!(seg.chunks[1].chunk_type(), ChunkType::COOKIE_ACK);
        assert_eq!(seg.data(), b"abcde");
    }

    #[test]
    fn test_sctp_transport_data() {
        let (_, layer) = parse_transport_layer(SCTP_DATA, IpProtocol::SCTP).expect("sctp");
        assert!(matches!(layer, TransportLayer::Sctp(_)));
        assert_eq!(layer.data().as_ref(), b"abcde");
    }

    #[test]
    fn test_parse_sctp_errors() {
        let err = parse_sctp_segment(&SCTP_DATA[..11]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
        let err = parse_sctp_segment(&SCTP_DATA[..30]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
        let (_, seg) = parse_sctp_segment(&SCTP_DATA[..12]).expect("no chunks");
        assert!(seg.chunks.is_empty());
    }
}
