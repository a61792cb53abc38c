use std::time::Duration;

use log::debug;
use nom::bytes::complete::take;
use nom::IResult;

use crate::endianness::{ByteOrder, TraceBE, TraceEndianness, TraceLE};
use crate::link::{parse_link_layer, LinkLayer};
use crate::linktype::Linktype;
use crate::TraceError;

/// Pcap record header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameHeader {
    pub ts_sec: u32,
    pub ts_usec: u32,
    /// Number of bytes stored in the trace for this frame
    pub caplen: u32,
    /// Length of the frame on the wire
    pub origlen: u32,
}

impl FrameHeader {
    pub const SIZE: usize = 16;

    /// Capture time, as seconds and microseconds since the epoch
    pub fn timestamp(&self) -> Duration {
        Duration::from_secs(u64::from(self.ts_sec)) + Duration::from_micros(u64::from(self.ts_usec))
    }

    /// Size of the record on the wire, header included
    #[inline]
    pub fn record_len(&self) -> usize {
        Self::SIZE + self.caplen as usize
    }
}

/// One captured frame and its decoded layers
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub timestamp: Duration,
    pub caplen: u32,
    pub origlen: u32,
    pub link: LinkLayer,
}

impl Frame {
    /// True if the frame was cut by the capture snapshot length
    pub fn is_truncated(&self) -> bool {
        self.caplen < self.origlen
    }
}

pub type FrameHeaderParseFn = fn(&[u8]) -> IResult<&[u8], FrameHeader, TraceError>;
pub type FrameParseFn = fn(&[u8], Linktype) -> IResult<&[u8], Frame, TraceError>;

fn frame_header_parser<E: TraceEndianness>(i: &[u8]) -> IResult<&[u8], FrameHeader, TraceError> {
    let (i, ts_sec) = E::parse_u32(i)?;
    let (i, ts_usec) = E::parse_u32(i)?;
    let (i, caplen) = E::parse_u32(i)?;
    let (i, origlen) = E::parse_u32(i)?;
    let header = FrameHeader {
        ts_sec,
        ts_usec,
        caplen,
        origlen,
    };
    Ok((i, header))
}

fn frame_parser<E: TraceEndianness>(
    i: &[u8],
    linktype: Linktype,
) -> IResult<&[u8], Frame, TraceError> {
    let (i, header) = frame_header_parser::<E>(i)?;
    let (i, data) = take(header.caplen as usize)(i)?;
    let (rem, link) = parse_link_layer(data, linktype)?;
    if !rem.is_empty() {
        debug!("discarding {} trailing bytes of {}-byte frame", rem.len(), data.len());
    }
    let frame = Frame {
        timestamp: header.timestamp(),
        caplen: header.caplen,
        origlen: header.origlen,
        link,
    };
    Ok((i, frame))
}

/// Read a pcap record header (little-endian)
pub fn parse_frame_header_le(i: &[u8]) -> IResult<&[u8], FrameHeader, TraceError> {
    frame_header_parser::<TraceLE>(i)
}

/// Read a pcap record header (big-endian)
pub fn parse_frame_header_be(i: &[u8]) -> IResult<&[u8], FrameHeader, TraceError> {
    frame_header_parser::<TraceBE>(i)
}

/// Read a pcap record and decode its layers (little-endian)
///
/// The link decoder only sees the `caplen` bytes of the frame. Bytes it does
/// not consume are discarded; the remainder after the record is returned.
pub fn parse_frame_le(i: &[u8], linktype: Linktype) -> IResult<&[u8], Frame, TraceError> {
    frame_parser::<TraceLE>(i, linktype)
}

/// Read a pcap record and decode its layers (big-endian)
pub fn parse_frame_be(i: &[u8], linktype: Linktype) -> IResult<&[u8], Frame, TraceError> {
    frame_parser::<TraceBE>(i, linktype)
}

pub(crate) fn frame_parsers(byte_order: ByteOrder) -> (FrameHeaderParseFn, FrameParseFn) {
    match byte_order {
        ByteOrder::BigEndian => (
            parse_frame_header_be as FrameHeaderParseFn,
            parse_frame_be as FrameParseFn,
        ),
        ByteOrder::LittleEndian => (parse_frame_header_le, parse_frame_le),
    }
}
