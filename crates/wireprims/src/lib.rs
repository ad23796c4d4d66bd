//! Compact self-delimiting binary serialization.
//!
//! wireprims encodes integers, floats, text, containers and length-prefixed
//! external messages into a byte stream where every record carries its own
//! extent, so independently written values can be read back one at a time.
//!
//! # Crate Structure
//!
//! - [`codec`]: the wire codecs, stream adapters and error types
//!
//! The `cli` feature builds the `wireprims` binary for encoding and
//! inspecting records from the command line.

/// Re-export codec types.
pub mod codec {
    pub use wireprims_codec::*;
}

pub use wireprims_codec::{
    deserialize, from_bytes, from_bytes_exact, serialize, to_bytes, Codec, CodecError, Reader,
    Writer,
};
