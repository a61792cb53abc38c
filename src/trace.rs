//! PCAP trace decoding
//!
//! See <https://wiki.wireshark.org/Development/LibpcapFileFormat> for details.
//!
//! There are 2 ways of decoding a trace. [`parse_trace`] reads the entire
//! source and collects all frames in a [`Trace`]. On failure, the frames
//! decoded so far are kept in the returned [`PartialTrace`].
//!
//! The [`TraceReader`] streaming parser reads the trace header, then yields
//! frames one at a time. It can be used for large files or infinite streams.
//!
//! Record headers and frames in a memory buffer can also be parsed directly
//! with [`parse_trace_header`] and [`parse_frame_le`] or [`parse_frame_be`].

use std::error::Error;
use std::fmt;
use std::io::Read;

use crate::TraceError;

mod frame;
mod header;
mod reader;

pub use frame::*;
pub use header::*;
pub use reader::*;

/// A fully decoded trace
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub header: TraceHeader,
    pub frames: Vec<Frame>,
}

/// A trace whose decoding stopped on an error
///
/// `frames` holds every frame decoded before the failing one; the failing
/// frame is not included.
#[derive(Debug)]
pub struct PartialTrace {
    /// Trace header, if it could be read
    pub header: Option<TraceHeader>,
    pub frames: Vec<Frame>,
    /// The error raised while decoding the record after the last frame
    pub error: TraceError,
}

impl fmt::Display for PartialTrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "trace decoding failed after {} frames: {}",
            self.frames.len(),
            self.error
        )
    }
}

impl Error for PartialTrace {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Decode a complete trace from `reader`
///
/// Decoding stops cleanly when the source ends exactly at a record boundary.
/// Any other failure returns the frames decoded before it, with the error.
pub fn parse_trace<R: Read>(reader: R) -> Result<Trace, PartialTrace> {
    let reader = match TraceReader::new(DEFAULT_CAPACITY, reader) {
        Ok(reader) => reader,
        Err(error) => {
            return Err(PartialTrace {
                header: None,
                frames: Vec::new(),
                error,
            })
        }
    };
    let header = reader.header().clone();
    let mut frames = Vec::new();
    for res in reader {
        match res {
            Ok(frame) => frames.push(frame),
            Err(error) => {
                return Err(PartialTrace {
                    header: Some(header),
                    frames,
                    error,
                })
            }
        }
    }
    Ok(Trace { header, frames })
}
