//! Compact binary serialization for primitives, containers and framed
//! external messages.
//!
//! Every supported type implements [`Codec`], which writes to a [`Writer`] and
//! reads from a [`Reader`] wrapping any `std::io` stream:
//! - Integers are variable-length sign-magnitude records (1 to 9 bytes)
//! - Floats are decimal text tokens closed by a single space
//! - Containers are a varint element count followed by their elements
//! - [`Framed`] messages carry a 4-byte little-endian size prefix
//!
//! Records are self-delimiting, so values written back-to-back on one stream
//! are read back one at a time with nothing left over. When a nested value
//! fails, the error names the innermost failure and then each enclosing
//! container, one `while deserializing object of type ...` line per level.

pub mod boolean;
pub mod byte;
pub mod codec;
pub mod config;
pub mod containers;
pub mod error;
pub mod float;
pub mod framed;
pub mod reader;
pub mod text;
pub mod varint;
pub mod writer;

pub use codec::{deserialize, from_bytes, from_bytes_exact, serialize, to_bytes, Codec};
pub use config::{CodecConfig, DEFAULT_READ_CHUNK, DEFAULT_WRITE_BUFFER, MAX_FRAMED_SIZE};
pub use containers::{read_len, serialize_seq, Complex};
pub use error::{CodecError, Direction, ErrorKind, Result};
pub use float::FloatToken;
pub use framed::{ExternalMessage, Framed};
pub use reader::Reader;
pub use varint::VarInt;
pub use writer::Writer;
