use log::trace;
use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;
use rusticata_macros::{align32, newtype_enum};

use super::parameter::{
    parse_error_parameter, parse_heartbeat_info, parse_init_parameter, parse_parameters,
    HeartbeatInfoParameter, Parameter,
};
use crate::TraceError;

/// SCTP chunk type
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct ChunkType(pub u8);

newtype_enum! {
impl debug ChunkType {
    DATA = 0,
    INIT = 1,
    INIT_ACK = 2,
    SACK = 3,
    HEARTBEAT = 4,
    HEARTBEAT_ACK = 5,
    ABORT = 6,
    SHUTDOWN = 7,
    SHUTDOWN_ACK = 8,
    ERROR = 9,
    COOKIE_ECHO = 10,
    COOKIE_ACK = 11,
    SHUTDOWN_COMPLETE = 14,
}
}

/// Common header of all chunks
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChunkHeader {
    pub chunk_type: ChunkType,
    pub flags: u8,
    /// Length of the chunk, header included, padding excluded
    pub length: u16,
}

impl ChunkHeader {
    pub const SIZE: usize = 4;

    /// Size of the chunk on the wire, padding included
    #[inline]
    pub fn aligned_len(&self) -> usize {
        align32!(usize::from(self.length))
    }
}

pub fn parse_chunk_header(i: &[u8]) -> IResult<&[u8], ChunkHeader, TraceError> {
    let (i, chunk_type) = be_u8(i)?;
    let (i, flags) = be_u8(i)?;
    let (i, length) = be_u16(i)?;
    let header = ChunkHeader {
        chunk_type: ChunkType(chunk_type),
        flags,
        length,
    };
    Ok((i, header))
}

/// A decoded SCTP chunk
#[derive(Clone, Debug, PartialEq)]
pub enum Chunk {
    Data(DataChunk),
    Init(InitChunk),
    InitAck(InitChunk),
    Sack(SackChunk),
    Heartbeat(HeartbeatChunk),
    HeartbeatAck(HeartbeatChunk),
    Abort(AbortChunk),
    Shutdown(ShutdownChunk),
    ShutdownAck(ShutdownAckChunk),
    Error(ErrorChunk),
    CookieEcho(CookieEchoChunk),
    CookieAck(CookieAckChunk),
    ShutdownComplete(ShutdownCompleteChunk),
    Unknown(UnknownChunk),
}

impl Chunk {
    pub fn header(&self) -> &ChunkHeader {
        match self {
            Chunk::Data(c) => &c.header,
            Chunk::Init(c) | Chunk::InitAck(c) => &c.header,
            Chunk::Sack(c) => &c.header,
            Chunk::Heartbeat(c) | Chunk::HeartbeatAck(c) => &c.header,
            Chunk::Abort(c) => &c.header,
            Chunk::Shutdown(c) => &c.header,
            Chunk::ShutdownAck(c) => &c.header,
            Chunk::Error(c) => &c.header,
            Chunk::CookieEcho(c) => &c.header,
            Chunk::CookieAck(c) => &c.header,
            Chunk::ShutdownComplete(c) => &c.header,
            Chunk::Unknown(c) => &c.header,
        }
    }

    #[inline]
    pub fn chunk_type(&self) -> ChunkType {
        self.header().chunk_type
    }
}

/// Payload data (DATA)
#[derive(Clone, Debug, PartialEq)]
pub struct DataChunk {
    pub header: ChunkHeader,
    pub tsn: u32,
    pub stream_identifier: u16,
    pub stream_sequence_number: u16,
    pub payload_protocol_identifier: u32,
    /// User data, padding excluded
    pub data: Vec<u8>,
}

impl DataChunk {
    pub const FLAG_UNORDERED: u8 = 0x04;
    pub const FLAG_BEGINNING: u8 = 0x02;
    pub const FLAG_ENDING: u8 = 0x01;

    #[inline]
    pub fn is_unordered(&self) -> bool {
        self.header.flags & Self::FLAG_UNORDERED != 0
    }

    #[inline]
    pub fn is_beginning(&self) -> bool {
        self.header.flags & Self::FLAG_BEGINNING != 0
    }

    #[inline]
    pub fn is_ending(&self) -> bool {
        self.header.flags & Self::FLAG_ENDING != 0
    }
}

/// Association initiation (INIT and INIT ACK)
#[derive(Clone, Debug, PartialEq)]
pub struct InitChunk {
    pub header: ChunkHeader,
    pub initiate_tag: u32,
    pub advertised_receiver_window_credit: u32,
    pub outbound_streams: u16,
    pub inbound_streams: u16,
    pub initial_tsn: u32,
    pub parameters: Vec<Parameter>,
}

/// A gap ack block, as offsets relative to the cumulative TSN ack
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GapAckBlock {
    pub start: u16,
    pub end: u16,
}

/// Selective acknowledgement (SACK)
#[derive(Clone, Debug, PartialEq)]
pub struct SackChunk {
    pub header: ChunkHeader,
    pub cumulative_tsn_ack: u32,
    pub advertised_receiver_window_credit: u32,
    pub gap_ack_blocks: Vec<GapAckBlock>,
    pub duplicate_tsns: Vec<u32>,
}

/// Heartbeat request or acknowledgement (HEARTBEAT and HEARTBEAT ACK)
#[derive(Clone, Debug, PartialEq)]
pub struct HeartbeatChunk {
    pub header: ChunkHeader,
    pub info: HeartbeatInfoParameter,
}

/// ABORT
#[derive(Clone, Debug, PartialEq)]
pub struct AbortChunk {
    pub header: ChunkHeader,
    pub errors: u32,
}

/// SHUTDOWN
#[derive(Clone, Debug, PartialEq)]
pub struct ShutdownChunk {
    pub header: ChunkHeader,
    pub cumulative_tsn_ack: u32,
}

/// Operation error (ERROR)
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorChunk {
    pub header: ChunkHeader,
    pub parameters: Vec<Parameter>,
}

/// State cookie (COOKIE ECHO)
#[derive(Clone, Debug, PartialEq)]
pub struct CookieEchoChunk {
    pub header: ChunkHeader,
    pub cookie: Vec<u8>,
}

/// Chunk with a type not decoded by this crate
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownChunk {
    pub header: ChunkHeader,
    /// Chunk body, padding excluded
    pub data: Vec<u8>,
}

pub(crate) trait SctpChunkParser: Sized {
    /// Minimum declared length, header included
    const MIN_LEN: usize;
    /// Chunk types handled by this parser (empty: any type)
    const TYPES: &'static [ChunkType];

    // caller function must have tested chunk type and length
    fn inner_parse(header: ChunkHeader, value: &[u8]) -> IResult<&[u8], Self, TraceError>;
}

/// Parse one chunk with parser `P`, padding included
pub(crate) fn chunk_parser<P: SctpChunkParser>(i: &[u8]) -> IResult<&[u8], P, TraceError> {
    let (i, header) = parse_chunk_header(i)?;
    if !P::TYPES.is_empty() && !P::TYPES.contains(&header.chunk_type) {
        return Err(nom::Err::Error(TraceError::TypeMismatch));
    }
    let length = usize::from(header.length);
    if length < P::MIN_LEN {
        return Err(nom::Err::Error(TraceError::InsufficientLength));
    }
    let (i, value) = take(length - ChunkHeader::SIZE)(i)?;
    let (i, _padding) = take(header.aligned_len() - length)(i)?;
    let (_, chunk) = P::inner_parse(header, value)?;
    Ok((i, chunk))
}

impl SctpChunkParser for DataChunk {
    const MIN_LEN: usize = 16;
    const TYPES: &'static [ChunkType] = &[ChunkType::DATA];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, tsn) = be_u32(i)?;
        let (i, stream_identifier) = be_u16(i)?;
        let (i, stream_sequence_number) = be_u16(i)?;
        let (i, payload_protocol_identifier) = be_u32(i)?;
        let chunk = DataChunk {
            header,
            tsn,
            stream_identifier,
            stream_sequence_number,
            payload_protocol_identifier,
            data: i.to_vec(),
        };
        Ok((&[], chunk))
    }
}

impl SctpChunkParser for InitChunk {
    const MIN_LEN: usize = 20;
    const TYPES: &'static [ChunkType] = &[ChunkType::INIT, ChunkType::INIT_ACK];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, initiate_tag) = be_u32(i)?;
        let (i, advertised_receiver_window_credit) = be_u32(i)?;
        let (i, outbound_streams) = be_u16(i)?;
        let (i, inbound_streams) = be_u16(i)?;
        let (i, initial_tsn) = be_u32(i)?;
        let (i, parameters) = parse_parameters(i, parse_init_parameter)?;
        let chunk = InitChunk {
            header,
            initiate_tag,
            advertised_receiver_window_credit,
            outbound_streams,
            inbound_streams,
            initial_tsn,
            parameters,
        };
        Ok((i, chunk))
    }
}

fn parse_gap_ack_block(i: &[u8]) -> IResult<&[u8], GapAckBlock, TraceError> {
    let (i, start) = be_u16(i)?;
    let (i, end) = be_u16(i)?;
    Ok((i, GapAckBlock { start, end }))
}

impl SctpChunkParser for SackChunk {
    const MIN_LEN: usize = 16;
    const TYPES: &'static [ChunkType] = &[ChunkType::SACK];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, cumulative_tsn_ack) = be_u32(i)?;
        let (i, advertised_receiver_window_credit) = be_u32(i)?;
        let (i, num_gap_ack_blocks) = be_u16(i)?;
        let (i, num_duplicate_tsns) = be_u16(i)?;
        let expected = 4 * (usize::from(num_gap_ack_blocks) + usize::from(num_duplicate_tsns));
        if i.len() < expected {
            return Err(nom::Err::Error(TraceError::InsufficientLength));
        }
        let (i, gap_ack_blocks) = count(parse_gap_ack_block, usize::from(num_gap_ack_blocks))(i)?;
        let (i, duplicate_tsns) = count(be_u32, usize::from(num_duplicate_tsns))(i)?;
        let chunk = SackChunk {
            header,
            cumulative_tsn_ack,
            advertised_receiver_window_credit,
            gap_ack_blocks,
            duplicate_tsns,
        };
        Ok((i, chunk))
    }
}

impl SctpChunkParser for HeartbeatChunk {
    const MIN_LEN: usize = 8;
    const TYPES: &'static [ChunkType] = &[ChunkType::HEARTBEAT, ChunkType::HEARTBEAT_ACK];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, info) = parse_heartbeat_info(i)?;
        Ok((i, HeartbeatChunk { header, info }))
    }
}

impl SctpChunkParser for AbortChunk {
    const MIN_LEN: usize = 8;
    const TYPES: &'static [ChunkType] = &[ChunkType::ABORT];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, errors) = be_u32(i)?;
        Ok((i, AbortChunk { header, errors }))
    }
}

impl SctpChunkParser for ShutdownChunk {
    const MIN_LEN: usize = 8;
    const TYPES: &'static [ChunkType] = &[ChunkType::SHUTDOWN];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, cumulative_tsn_ack) = be_u32(i)?;
        let chunk = ShutdownChunk {
            header,
            cumulative_tsn_ack,
        };
        Ok((i, chunk))
    }
}

impl SctpChunkParser for ErrorChunk {
    const MIN_LEN: usize = 4;
    const TYPES: &'static [ChunkType] = &[ChunkType::ERROR];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let (i, parameters) = parse_parameters(i, parse_error_parameter)?;
        Ok((i, ErrorChunk { header, parameters }))
    }
}

impl SctpChunkParser for CookieEchoChunk {
    const MIN_LEN: usize = 4;
    const TYPES: &'static [ChunkType] = &[ChunkType::COOKIE_ECHO];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let cookie = i.to_vec();
        Ok((&[], CookieEchoChunk { header, cookie }))
    }
}

impl SctpChunkParser for UnknownChunk {
    const MIN_LEN: usize = 4;
    const TYPES: &'static [ChunkType] = &[];

    fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
        let data = i.to_vec();
        Ok((&[], UnknownChunk { header, data }))
    }
}

macro_rules! header_only_chunk {
    ($(#[$meta:meta])* $name:ident, $chunk_type:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            pub header: ChunkHeader,
        }

        impl SctpChunkParser for $name {
            const MIN_LEN: usize = 4;
            const TYPES: &'static [ChunkType] = &[ChunkType::$chunk_type];

            fn inner_parse(header: ChunkHeader, i: &[u8]) -> IResult<&[u8], Self, TraceError> {
                Ok((i, $name { header }))
            }
        }
    };
}

header_only_chunk!(
    /// SHUTDOWN ACK
    ShutdownAckChunk,
    SHUTDOWN_ACK
);
header_only_chunk!(
    /// COOKIE ACK
    CookieAckChunk,
    COOKIE_ACK
);
header_only_chunk!(
    /// SHUTDOWN COMPLETE
    ShutdownCompleteChunk,
    SHUTDOWN_COMPLETE
);

/// Parse a single chunk, dispatching on its type
///
/// The chunk padding is consumed. Unsupported types decode as
/// [`Chunk::Unknown`].
pub fn parse_chunk(i: &[u8]) -> IResult<&[u8], Chunk, TraceError> {
    let (_, header) = parse_chunk_header(i)?;
    match header.chunk_type {
        ChunkType::DATA => chunk_parser(i).map(|(i, c)| (i, Chunk::Data(c))),
        ChunkType::INIT => chunk_parser(i).map(|(i, c)| (i, Chunk::Init(c))),
        ChunkType::INIT_ACK => chunk_parser(i).map(|(i, c)| (i, Chunk::InitAck(c))),
        ChunkType::SACK => chunk_parser(i).map(|(i, c)| (i, Chunk::Sack(c))),
        ChunkType::HEARTBEAT => chunk_parser(i).map(|(i, c)| (i, Chunk::Heartbeat(c))),
        ChunkType::HEARTBEAT_ACK => chunk_parser(i).map(|(i, c)| (i, Chunk::HeartbeatAck(c))),
        ChunkType::ABORT => chunk_parser(i).map(|(i, c)| (i, Chunk::Abort(c))),
        ChunkType::SHUTDOWN => chunk_parser(i).map(|(i, c)| (i, Chunk::Shutdown(c))),
        ChunkType::SHUTDOWN_ACK => chunk_parser(i).map(|(i, c)| (i, Chunk::ShutdownAck(c))),
        ChunkType::ERROR => chunk_parser(i).map(|(i, c)| (i, Chunk::Error(c))),
        ChunkType::COOKIE_ECHO => chunk_parser(i).map(|(i, c)| (i, Chunk::CookieEcho(c))),
        ChunkType::COOKIE_ACK => chunk_parser(i).map(|(i, c)| (i, Chunk::CookieAck(c))),
        ChunkType::SHUTDOWN_COMPLETE => {
            chunk_parser(i).map(|(i, c)| (i, Chunk::ShutdownComplete(c)))
        }
        _ => {
            trace!("unknown chunk type {:?}", header.chunk_type);
            chunk_parser(i).map(|(i, c)| (i, Chunk::Unknown(c)))
        }
    }
}

/// Parse the sequence of chunks filling the input
pub fn parse_chunks(i: &[u8]) -> IResult<&[u8], Vec<Chunk>, TraceError> {
    let mut chunks = Vec::new();
    let mut i = i;
    while !i.is_empty() {
        let (_, header) = parse_chunk_header(i)?;
        if usize::from(header.length) < ChunkHeader::SIZE {
            return Err(nom::Err::Error(TraceError::InsufficientLength));
        }
        let aligned = header.aligned_len();
        if i.len() < aligned {
            return Err(nom::Err::Error(TraceError::InsufficientLength));
        }
        let (_, chunk) = parse_chunk(&i[..aligned])?;
        i = &i[aligned..];
        chunks.push(chunk);
    }
    Ok((i, chunks))
}
