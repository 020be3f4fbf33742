//! # RESP - Redis Serialization Protocol Library
//!
//! A RESP2 decoder and encoder built around a closed set of value variants.
//!
//! ## Features
//!
//! - **Cursor-based decoding**: one call consumes exactly one frame and
//!   reports how many bytes it used
//! - **Distinct nulls**: null bulk strings and null arrays are separate from
//!   empty ones and from decode failures
//! - **Wide integers**: integer replies are `i128`
//! - **Bounded input**: nesting depth, bulk string length, array length and
//!   line length are limited by [`DecoderConfig`]
//!
//! ## Example
//!
//! ```rust
//! use resp::RespEncoder;
//! use resp::RespValue;
//!
//! let cmd = RespValue::array(vec![
//! 	RespValue::bulk_string("GET"),
//! 	RespValue::bulk_string("key"),
//! ]);
//!
//! let encoded = cmd.encode();
//! assert_eq!(&encoded[..], b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n");
//!
//! let decoded = resp::parse(&encoded).unwrap();
//! assert_eq!(decoded, cmd);
//! ```

mod encode;
mod error;
mod parser;
mod types;
mod utils;

pub use encode::RespEncoder;
pub use encode::serialize;
pub use error::ParseError;
pub use parser::DEFAULT_MAX_ARRAY_LEN;
pub use parser::DEFAULT_MAX_BULK_LEN;
pub use parser::DEFAULT_MAX_DEPTH;
pub use parser::DEFAULT_MAX_LINE_LEN;
pub use parser::Decoder;
pub use parser::DecoderConfig;
pub use parser::parse;
pub use parser::parse_frame;
pub use types::Line;
pub use types::RespValue;
