use nom::IResult;

use crate::endianness::{ByteOrder, TraceBE, TraceEndianness, TraceLE};
use crate::linktype::Linktype;
use crate::utils::take_array;
use crate::TraceError;

/// Magic number of a big-endian trace, as read from the file
pub const MAGIC_BE: [u8; 4] = [0xa1, 0xb2, 0xc3, 0xd4];
/// Magic number of a little-endian trace, as read from the file
pub const MAGIC_LE: [u8; 4] = [0xd4, 0xc3, 0xb2, 0xa1];

/// Pcap global header
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TraceHeader {
    /// Byte order of all trace and frame header integers, from the magic number
    pub byte_order: ByteOrder,
    /// Version major number (currently 2)
    pub version_major: u16,
    /// Version minor number (currently 4)
    pub version_minor: u16,
    /// The correction time in seconds between GMT (UTC) and the local timezone of the following packet header timestamps
    pub thiszone: i32,
    /// In theory, the accuracy of time stamps in the capture; in practice, all tools set it to 0
    pub sigfigs: u32,
    /// max len of captured packets, in octets
    pub snaplen: u32,
    /// Data link type of every frame
    pub network: Linktype,
}

impl TraceHeader {
    /// Size of the header on the wire, magic number included
    pub const SIZE: usize = 24;

    pub fn is_bigendian(&self) -> bool {
        self.byte_order == ByteOrder::BigEndian
    }
}

/// Read the magic number and return the byte order it selects
///
/// Fails with `InsufficientLength` if fewer than 4 bytes are available, and
/// `NotATraceFile` if the 4 bytes are not a known magic number.
pub fn parse_magic(i: &[u8]) -> IResult<&[u8], ByteOrder, TraceError> {
    let (i, magic) = take_array::<4>(i)?;
    match magic {
        MAGIC_BE => Ok((i, ByteOrder::BigEndian)),
        MAGIC_LE => Ok((i, ByteOrder::LittleEndian)),
        _ => Err(nom::Err::Error(TraceError::NotATraceFile)),
    }
}

fn trace_header_parser<E: TraceEndianness>(i: &[u8]) -> IResult<&[u8], TraceHeader, TraceError> {
    let (i, version_major) = E::parse_u16(i)?;
    let (i, version_minor) = E::parse_u16(i)?;
    let (i, thiszone) = E::parse_i32(i)?;
    let (i, sigfigs) = E::parse_u32(i)?;
    let (i, snaplen) = E::parse_u32(i)?;
    let (i, network) = E::parse_u32(i)?;
    let header = TraceHeader {
        byte_order: E::ORDER,
        version_major,
        version_minor,
        thiszone,
        sigfigs,
        snaplen,
        network: Linktype(network),
    };
    Ok((i, header))
}

/// Read the pcap global header
///
/// Errors from the magic number are returned unchanged. A header cut short
/// after the magic number fails with `UnexpectedEof`.
pub fn parse_trace_header(i: &[u8]) -> IResult<&[u8], TraceHeader, TraceError> {
    let (i, byte_order) = parse_magic(i)?;
    let res = match byte_order {
        ByteOrder::BigEndian => trace_header_parser::<TraceBE>(i),
        ByteOrder::LittleEndian => trace_header_parser::<TraceLE>(i),
    };
    res.map_err(|e| match e {
        nom::Err::Error(TraceError::InsufficientLength) => {
            nom::Err::Error(TraceError::UnexpectedEof)
        }
        e => e,
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use hex_literal::hex;

    // ntp.pcap header
    pub const TRACE_HDR_LE: &[u8] = &hex!(
        "
D4 C3 B2 A1 02 00 04 00 00 00 00 00 00 00 00 00
00 00 04 00 01 00 00 00"
    );

    pub const TRACE_HDR_BE: &[u8] = &hex!(
        "
A1 B2 C3 D4 00 02 00 04 FF FF FF F8 00 00 00 00
00 00 FF FF 00 00 00 01"
    );

    #[test]
    fn test_parse_magic() {
        let (rem, order) = parse_magic(&MAGIC_BE).expect("magic");
        assert!(rem.is_empty());
        assert_eq!(order, ByteOrder::BigEndian);
        let (_, order) = parse_magic(&MAGIC_LE).expect("magic");
        assert_eq!(order, ByteOrder::LittleEndian);
        // nanosecond and modified magic numbers are not supported
        for magic in &[hex!("4d 3c b2 a1"), hex!("a1 b2 3c 4d"), hex!("34 cd b2 a1")] {
            let err = parse_magic(magic).unwrap_err();
            assert!(matches!(err, nom::Err::Error(TraceError::NotATraceFile)));
        }
        for len in 0..4 {
            let err = parse_magic(&MAGIC_LE[..len]).unwrap_err();
            assert!(matches!(
                err,
                nom::Err::Error(TraceError::InsufficientLength)
            ));
        }
    }

    #[test]
    fn test_parse_trace_header() {
        let (rem, hdr) = parse_trace_header(TRACE_HDR_LE).expect("header parsing failed");
        assert!(rem.is_empty());
        assert_eq!(hdr.byte_order, ByteOrder::LittleEndian);
        assert_eq!(hdr.version_major, 2);
        assert_eq!(hdr.version_minor, 4);
        assert_eq!(hdr.snaplen, 262_144);
        assert_eq!(hdr.network, Linktype::ETHERNET);
        assert!(!hdr.is_bigendian());
    }

    #[test]
    fn test_parse_trace_header_be() {
        let (rem, hdr) = parse_trace_header(TRACE_HDR_BE).expect("header parsing failed");
        assert!(rem.is_empty());
        assert!(hdr.is_bigendian());
        assert_eq!(hdr.version_major, 2);
        assert_eq!(hdr.version_minor, 4);
        assert_eq!(hdr.thiszone, -8);
        assert_eq!(hdr.snaplen, 65535);
        assert_eq!(hdr.network, Linktype::ETHERNET);
    }

    #[test]
    fn test_parse_trace_header_truncated() {
        for len in 4..TraceHeader::SIZE {
            let err = parse_trace_header(&TRACE_HDR_LE[..len]).unwrap_err();
            assert!(matches!(err, nom::Err::Error(TraceError::UnexpectedEof)));
        }
        let err = parse_trace_header(&TRACE_HDR_LE[..2]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
    }
}
