use std::fmt;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use crate::TraceError;

/// TCP control flags: NS (from the data offset byte) and the 8 flags of the next byte
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct TcpFlags(pub u16);

impl TcpFlags {
    pub const FIN: TcpFlags = TcpFlags(0x001);
    pub const SYN: TcpFlags = TcpFlags(0x002);
    pub const RST: TcpFlags = TcpFlags(0x004);
    pub const PSH: TcpFlags = TcpFlags(0x008);
    pub const ACK: TcpFlags = TcpFlags(0x010);
    pub const URG: TcpFlags = TcpFlags(0x020);
    pub const ECE: TcpFlags = TcpFlags(0x040);
    pub const CWR: TcpFlags = TcpFlags(0x080);
    pub const NS: TcpFlags = TcpFlags(0x100);

    const NAMES: [(TcpFlags, &'static str); 9] = [
        (TcpFlags::NS, "NS"),
        (TcpFlags::CWR, "CWR"),
        (TcpFlags::ECE, "ECE"),
        (TcpFlags::URG, "URG"),
        (TcpFlags::ACK, "ACK"),
        (TcpFlags::PSH, "PSH"),
        (TcpFlags::RST, "RST"),
        (TcpFlags::SYN, "SYN"),
        (TcpFlags::FIN, "FIN"),
    ];

    #[inline]
    pub fn contains(self, other: TcpFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TcpFlags {
    type Output = TcpFlags;

    fn bitor(self, rhs: TcpFlags) -> TcpFlags {
        TcpFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = TcpFlags::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "TcpFlags({})", names.join("|"))
    }
}

/// A TCP segment
///
/// Options are kept as raw bytes and not decoded individually.
#[derive(Clone, Debug, PartialEq)]
pub struct TcpSegment {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence_number: u32,
    pub ack_number: u32,
    /// Data offset: header size in 32-bit words
    pub header_size: u8,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    pub options: Vec<u8>,
    pub data: Vec<u8>,
}

impl TcpSegment {
    /// Fixed header size, in bytes
    pub const HEADER_LEN: usize = 20;
}

/// Parse a TCP segment; all bytes after the header and options are payload
pub fn parse_tcp_segment(i: &[u8]) -> IResult<&[u8], TcpSegment, TraceError> {
    if i.len() < TcpSegment::HEADER_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, source_port) = be_u16(i)?;
    let (i, destination_port) = be_u16(i)?;
    let (i, sequence_number) = be_u32(i)?;
    let (i, ack_number) = be_u32(i)?;
    let (i, offset_ns) = be_u8(i)?;
    let (i, flags) = be_u8(i)?;
    let (i, window_size) = be_u16(i)?;
    let (i, checksum) = be_u16(i)?;
    let (i, urgent_pointer) = be_u16(i)?;

    let header_size = offset_ns >> 4;
    let (i, options) = if header_size > 5 {
        take(usize::from(header_size - 5) * 4)(i)?
    } else {
        (i, &[][..])
    };
    let segment = TcpSegment {
        source_port,
        destination_port,
        sequence_number,
        ack_number,
        header_size,
        flags: TcpFlags((u16::from(offset_ns & 0x01) << 8) | u16::from(flags)),
        window_size,
        checksum,
        urgent_pointer,
        options: options.to_vec(),
        data: i.to_vec(),
    };
    Ok((&[], segment))
}

#[cfg(test)]
mod tests {
    use super::{parse_tcp_segment, TcpFlags};
    use crate::TraceError;
    use hex_literal::hex;

    const TCP_SYN: &[u8] = &hex!(
        "
c3 50 00 50 00 00 00 01 00 00 00 00 51 c2 72 10
00 00 00 00"
    );

    #[test]
    fn test_parse_tcp_flags() {
        let (rem, seg) = parse_tcp_segment(TCP_SYN).expect("tcp parsing failed");
        assert!(rem.is_empty());
        assert_eq!(seg.source_port, 50000);
        assert_eq!(seg.destination_port, 80);
        assert_eq!(seg.sequence_number, 1);
        assert_eq!(seg.header_size, 5);
        assert_eq!(
            seg.flags,
            TcpFlags::NS | TcpFlags::CWR | TcpFlags::ECE | TcpFlags::SYN
        );
        assert!(!seg.flags.contains(TcpFlags::ACK));
        assert_eq!(format!("{:?}", seg.flags), "TcpFlags(NS|CWR|ECE|SYN)");
        assert_eq!(seg.window_size, 0x7210);
        assert!(seg.options.is_empty());
        assert!(seg.data.is_empty());
    }

    #[test]
    fn test_parse_tcp_truncated() {
        let err = parse_tcp_segment(&TCP_SYN[..19]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
        // data offset 6, option word missing
        let mut data = TCP_SYN.to_vec();
        data[12] = 0x60;
        data.extend_from_slice(&[1, 1]);
        let err = parse_tcp_segment(&data).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
    }

    #[test]
    fn test_parse_tcp_small_data_offset() {
        // data offset below 5: no options, everything after the header is data
        let mut data = TCP_SYN.to_vec();
        data[12] = 0x20;
        data.extend_from_slice(b"abc");
        let (_, seg) = parse_tcp_segment(&data).expect("tcp parsing failed");
        assert_eq!(seg.header_size, 2);
        assert!(seg.options.is_empty());
        assert_eq!(seg.data, b"abc");
    }
}
