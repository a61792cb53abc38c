//! # Layered pcap decoder
//!
//! This crate decodes legacy pcap traces into a tree of protocol layers: each
//! captured frame is decoded as a link layer (Ethernet), an internet layer
//! (IPv4 or IPv6) and a transport layer (TCP, UDP or SCTP). SCTP packets are
//! further decoded into typed chunks and chunk parameters.
//!
//! Every layer is selected by a type tag read from the enclosing layer, and
//! every length field is checked against the available bytes before use.
//! Unsupported tags never fail: the layer is kept as raw bytes in the
//! `Unknown` variant of the enclosing layer.
//!
//! Decoded values own their data, so a [`Trace`] does not borrow the input.
//!
//! # Example: decoding a whole trace
//!
//! ```rust
//! use pcap_layers::*;
//!
//! # let input: &[u8] = &[
//! #     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00,
//! #     0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
//! # ];
//! match parse_trace(input) {
//!     Ok(trace) => {
//!         for frame in &trace.frames {
//!             if let TransportLayer::Tcp(tcp) = frame.link.internet().transport() {
//!                 println!("TCP {} -> {}", tcp.source_port, tcp.destination_port);
//!             }
//!         }
//!     }
//!     Err(partial) => {
//!         println!("{} frames decoded before error: {}", partial.frames.len(), partial.error);
//!     }
//! }
//! ```
//!
//! For large traces, use the [`TraceReader`] streaming parser, which yields
//! frames one at a time.
//!
//! Every layer decoder is also available as a [nom](https://docs.rs/nom)
//! parser over a byte slice, for ex. [`parse_ethernet_frame`] or
//! [`parse_sctp_segment`].

mod endianness;
mod error;
mod linktype;
mod utils;

pub use endianness::ByteOrder;
pub use error::*;
pub use linktype::*;

pub mod internet;
pub mod link;
pub mod trace;
pub mod transport;

pub use internet::*;
pub use link::*;
pub use trace::*;
pub use transport::*;
