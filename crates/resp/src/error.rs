//! Error types for RESP decoding.

use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur while decoding a RESP frame.
///
/// Each variant is a distinct failure kind. None of them is ever reported as a
/// null value, since null bulk strings and null arrays are valid results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	/// The leading byte is not a known type tag. `None` means the input ended
	/// where a tag was expected.
	#[error("Unknown type tag: {}", describe_tag(.0))]
	UnknownTypeTag(Option<u8>),

	/// A simple string, error or bulk string payload is not valid UTF-8.
	#[error("Invalid UTF-8: {0}")]
	Encoding(#[from] Utf8Error),

	/// An integer or length line is not a valid integer literal, or does not
	/// fit in an `i128`.
	#[error("Invalid integer: {0:?}")]
	InvalidInteger(String),

	/// A bulk string or array declared a negative length other than `-1`.
	#[error("Invalid length: {0}")]
	InvalidLength(i128),

	/// The bytes following a bulk string payload are not CRLF.
	#[error("Missing CRLF after bulk string")]
	MissingTerminator,

	/// Fewer bytes remain than the frame requires.
	#[error("Truncated input: need at least {needed} bytes, {available} available")]
	Truncated { needed: usize, available: usize },

	/// Arrays are nested deeper than the decoder allows.
	#[error("Nesting depth exceeds limit of {max}")]
	DepthExceeded { max: usize },

	/// A declared or buffered size is above the configured limit. `what`
	/// names the field: a bulk string, an array, a line or a whole request.
	#[error("Size of {what} ({size}) exceeds limit of {max}")]
	TooLarge {
		what: &'static str,
		size: usize,
		max: usize,
	},
}

impl ParseError {
	/// Returns `true` if the error only means the buffer ended early.
	///
	/// A transport that keeps reading into the same buffer can retry once more
	/// bytes arrive. Every other error is a protocol violation.
	pub fn is_incomplete(&self) -> bool {
		matches!(
			self,
			ParseError::Truncated { .. } | ParseError::UnknownTypeTag(None)
		)
	}
}

fn describe_tag(tag: &Option<u8>) -> String {
	match tag {
		Some(b) if b.is_ascii_graphic() => format!("'{}'", *b as char),
		Some(b) => format!("0x{b:02X}"),
		None => "end of input".to_string(),
	}
}
