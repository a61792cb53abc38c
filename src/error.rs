use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

/// Errors raised while decoding a trace or any of its layers
#[derive(Debug, Error)]
pub enum TraceError {
    /// The magic number is neither the big-endian nor the little-endian pcap magic
    #[error("not a pcap file")]
    NotATraceFile,
    /// Fewer bytes are available than a declared or fixed-size field requires
    #[error("insufficient length")]
    InsufficientLength,
    /// The input ended inside a record that cannot be empty
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A concrete decoder was given a record whose tag it does not own
    #[error("incorrect packet type")]
    TypeMismatch,
    /// Fault reported by the byte source
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parser error: {0:?}")]
    NomError(ErrorKind),
}

impl<I> ParseError<I> for TraceError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof => TraceError::InsufficientLength,
            _ => TraceError::NomError(kind),
        }
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<TraceError>> for TraceError {
    fn from(e: nom::Err<TraceError>) -> Self {
        match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            // layer parsers work on complete, bounded slices
            nom::Err::Incomplete(_) => TraceError::InsufficientLength,
        }
    }
}
