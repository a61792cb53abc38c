use std::io::{ErrorKind, Read};

use circular::Buffer;
use log::debug;

use super::frame::{frame_parsers, Frame, FrameHeader, FrameHeaderParseFn, FrameParseFn};
use super::header::{parse_trace_header, TraceHeader};
use crate::TraceError;

/// Initial buffer capacity of [`TraceReader::default_capacity`]
pub const DEFAULT_CAPACITY: usize = 65536;

/// Streaming decoder over a pcap trace
///
/// ## Trace Reader
///
/// This reader is a streaming parser based on a circular buffer. It creates an
/// abstraction over any input providing the `Read` trait, and takes care of
/// managing the circular buffer to provide an iterator over decoded frames.
///
/// The global header is read when the reader is created, and is available
/// with [`header`](TraceReader::header). The link type it declares is used to
/// decode every frame.
///
/// The reader never requests more bytes from the source than the current
/// record requires. The buffer grows when a frame is larger than its capacity.
///
/// Iteration stops after the first error: a truncated record, a layer that
/// cannot be decoded, or an I/O error from the source.
///
/// ## Example
///
/// ```rust
/// use pcap_layers::{TraceReader, DEFAULT_CAPACITY};
/// # use pcap_layers::TraceError;
///
/// # fn main() -> Result<(), TraceError> {
/// # let input: &[u8] = &[
/// #     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00,
/// #     0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
/// # ];
/// let mut reader = TraceReader::new(DEFAULT_CAPACITY, input)?;
/// println!("link type: {}", reader.header().network);
/// for frame in &mut reader {
///     let frame = frame?;
///     println!("{:?}: {} bytes", frame.timestamp, frame.caplen);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TraceReader<R>
where
    R: Read,
{
    header: TraceHeader,
    reader: R,
    buffer: Buffer,
    consumed: usize,
    done: bool,
    parse_header: FrameHeaderParseFn,
    parse: FrameParseFn,
}

impl<R> TraceReader<R>
where
    R: Read,
{
    /// Creates a new `TraceReader<R>` with the provided buffer capacity, and reads the trace header.
    pub fn new(capacity: usize, reader: R) -> Result<TraceReader<R>, TraceError> {
        let buffer = Buffer::with_capacity(capacity.max(TraceHeader::SIZE));
        Self::from_buffer(buffer, reader)
    }

    /// Creates a new `TraceReader<R>` with [`DEFAULT_CAPACITY`].
    pub fn default_capacity(reader: R) -> Result<TraceReader<R>, TraceError> {
        Self::new(DEFAULT_CAPACITY, reader)
    }

    /// Creates a new `TraceReader<R>` using the provided `Buffer`.
    pub fn from_buffer(mut buffer: Buffer, mut reader: R) -> Result<TraceReader<R>, TraceError> {
        fill_buffer(&mut reader, &mut buffer, TraceHeader::SIZE)?;
        let (_, header) = parse_trace_header(buffer.data())?;
        buffer.consume(TraceHeader::SIZE);
        debug!(
            "pcap {}.{} {:?} trace, link type {}, snaplen {}",
            header.version_major,
            header.version_minor,
            header.byte_order,
            header.network,
            header.snaplen
        );
        let (parse_header, parse) = frame_parsers(header.byte_order);
        Ok(TraceReader {
            header,
            reader,
            buffer,
            consumed: TraceHeader::SIZE,
            done: false,
            parse_header,
            parse,
        })
    }

    /// The trace global header
    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    /// Number of bytes of the source consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn consume(&mut self, offset: usize) {
        self.consumed += offset;
        self.buffer.consume(offset);
    }

    /// Read and decode the next record, or return `None` at a clean end of trace
    fn next_frame(&mut self) -> Result<Option<Frame>, TraceError> {
        let available = fill_buffer(&mut self.reader, &mut self.buffer, FrameHeader::SIZE)?;
        if available == 0 {
            debug!("end of trace after {} bytes", self.consumed);
            return Ok(None);
        }
        if available < FrameHeader::SIZE {
            return Err(TraceError::InsufficientLength);
        }
        let (_, frame_header) = (self.parse_header)(self.buffer.data())?;
        let record_len = frame_header.record_len();
        let available = fill_buffer(&mut self.reader, &mut self.buffer, record_len)?;
        if available < record_len {
            return Err(TraceError::InsufficientLength);
        }
        let res = (self.parse)(&self.buffer.data()[..record_len], self.header.network)
            .map(|(_, frame)| frame);
        // the whole record is consumed, whatever the link decoder used
        self.consume(record_len);
        let frame = res?;
        debug!(
            "frame at {:?}: caplen {}, origlen {}",
            frame.timestamp, frame.caplen, frame.origlen
        );
        Ok(Some(frame))
    }
}

impl<R> Iterator for TraceReader<R>
where
    R: Read,
{
    type Item = Result<Frame, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                debug!("trace decoding stopped after {} bytes: {}", self.consumed, e);
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R> std::iter::FusedIterator for TraceReader<R> where R: Read {}

/// Read from `reader` until `buffer` holds at least `needed` bytes, or the source is exhausted
///
/// Returns the number of bytes available. No more than `needed` bytes are
/// buffered. The buffer is grown when `needed` exceeds its capacity.
fn fill_buffer<R: Read>(
    reader: &mut R,
    buffer: &mut Buffer,
    needed: usize,
) -> Result<usize, TraceError> {
    while buffer.available_data() < needed {
        if buffer.available_space() == 0 {
            buffer.shift();
        }
        if buffer.available_space() == 0 {
            // grow progressively, a bogus caplen must not allocate before data arrives
            let new_size = needed.min(buffer.capacity().saturating_mul(2).max(4096));
            debug!("growing buffer from {} to {} bytes", buffer.capacity(), new_size);
            buffer.grow(new_size);
        }
        let want = (needed - buffer.available_data()).min(buffer.available_space());
        let sz = match reader.read(&mut buffer.space()[..want]) {
            Ok(sz) => sz,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TraceError::Io(e)),
        };
        if sz == 0 {
            break;
        }
        buffer.fill(sz);
    }
    Ok(buffer.available_data())
}
