//! Response payload decoding
//!
//! - [`PayloadDecoder`]: picks the strategy matching the response framing
//! - `ChunkedDecoder`: `transfer-encoding: chunked` payloads
//! - `LengthDecoder`: `content-length` payloads
//!
//! Payloads delimited by the connection close are passed through as they
//! arrive; the caller signals their end on EOF.

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
