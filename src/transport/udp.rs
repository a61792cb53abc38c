use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;

use crate::TraceError;

/// A UDP datagram
#[derive(Clone, Debug, PartialEq)]
pub struct UdpDatagram {
    pub source_port: u16,
    pub destination_port: u16,
    /// Length of header and data, in bytes
    pub length: u16,
    pub checksum: u16,
    pub data: Vec<u8>,
}

impl UdpDatagram {
    pub const HEADER_LEN: usize = 8;
}

/// Parse a UDP datagram
///
/// The payload is bounded by the `length` field; trailing bytes are returned.
pub fn parse_udp_datagram(i: &[u8]) -> IResult<&[u8], UdpDatagram, TraceError> {
    if i.len() < UdpDatagram::HEADER_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, source_port) = be_u16(i)?;
    let (i, destination_port) = be_u16(i)?;
    let (i, length) = be_u16(i)?;
    let (i, checksum) = be_u16(i)?;
    let data_len = usize::from(length)
        .checked_sub(UdpDatagram::HEADER_LEN)
        .ok_or(nom::Err::Error(TraceError::InsufficientLength))?;
    let (i, data) = take(data_len)(i)?;
    let datagram = UdpDatagram {
        source_port,
        destination_port,
        length,
        checksum,
        data: data.to_vec(),
    };
    Ok((i, datagram))
}

#[cfg(test)]
mod tests {
    use super::parse_udp_datagram;
    use crate::TraceError;
    use hex_literal::hex;

    // DNS PTR query
    const UDP_DNS: &[u8] = &hex!(
        "
08 50 00 35 00 32 83 97 31 1f 01 00 00 01 00 00
00 00 00 00 01 32 01 31 03 31 36 38 03 31 39 32
07 69 6e 2d 61 64 64 72 04 61 72 70 61 00 00 0c
00 01"
    );

    #[test]
    fn test_parse_udp() {
        let (rem, dgram) = parse_udp_datagram(UDP_DNS).expect("udp parsing failed");
        assert!(rem.is_empty());
        assert_eq!(dgram.source_port, 2128);
        assert_eq!(dgram.destination_port, 53);
        assert_eq!(dgram.length, 50);
        assert_eq!(dgram.checksum, 33687);
        assert_eq!(dgram.data.len(), 42);
    }

    #[test]
    fn test_parse_udp_trailing_bytes() {
        let mut data = UDP_DNS.to_vec();
        data.extend_from_slice(&[0, 0, 0]);
        let (rem, dgram) = parse_udp_datagram(&data).expect("udp parsing failed");
        assert_eq!(rem.len(), 3);
        assert_eq!(dgram.data.as_slice(), &UDP_DNS[8..]);
    }

    #[test]
    fn test_parse_udp_bad_length() {
        let err = parse_udp_datagram(&UDP_DNS[..40]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
        let mut data = UDP_DNS.to_vec();
        data[5] = 4;
        let err = parse_udp_datagram(&data).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
    }
}
