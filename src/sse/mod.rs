//! Generation stream decoding.
//!
//! The service answers a submit request with a chunked UTF-8 body in which
//! every meaningful line has the form `data: <json>`.
//!
//! # Module structure
//! - `decoder` - Byte chunks to complete lines (FrameDecoder)
//! - `events` - Typed events (StreamEvent, ProgressEvent)
//! - `parser` - Line classification (parse_sse_line, parse_frame)

mod decoder;
mod events;
mod parser;

pub use decoder::FrameDecoder;
pub use events::{ProgressEvent, StreamEvent};
pub use parser::{parse_frame, parse_sse_line, SseLine, DATA_PREFIX};
