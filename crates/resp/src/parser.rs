//! Cursor-based RESP decoder.
//!
//! A [`Decoder`] walks an immutable buffer. Every call to
//! [`Decoder::parse`] consumes exactly one complete value and leaves the
//! cursor on the first byte of the next one, so arrays are decoded by calling
//! the same entry point once per element.

use std::io::Cursor;

use bytes::Buf;
use bytes::BytesMut;
use tracing::debug;
use tracing::trace;

use crate::error::ParseError;
use crate::types::Line;
use crate::types::RespValue;
use crate::utils::*;

/// Default maximum nesting depth for arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum payload of a bulk string, in bytes (512 MiB).
pub const DEFAULT_MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Default maximum element count of a single array.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Default maximum length of a simple string, error, integer or length line,
/// in bytes, terminator excluded (64 KiB).
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Limits applied while decoding.
///
/// Declared lengths are checked as soon as their header line is read, so an
/// oversized frame is rejected before its payload arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
	/// Maximum number of arrays that may enclose a value. A top-level array
	/// has depth 1.
	pub max_depth: usize,
	/// Maximum declared length of a bulk string.
	pub max_bulk_len: usize,
	/// Maximum declared element count of an array.
	pub max_array_len: usize,
	/// Maximum length of a line-oriented field.
	pub max_line_len: usize,
}

impl Default for DecoderConfig {
	fn default() -> Self {
		Self::new()
	}
}

impl DecoderConfig {
	pub const fn new() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			max_bulk_len: DEFAULT_MAX_BULK_LEN,
			max_array_len: DEFAULT_MAX_ARRAY_LEN,
			max_line_len: DEFAULT_MAX_LINE_LEN,
		}
	}

	/// Set the maximum nesting depth.
	pub const fn max_depth(mut self, depth: usize) -> Self {
		self.max_depth = depth;
		self
	}

	/// Set the maximum bulk string length.
	pub const fn max_bulk_len(mut self, len: usize) -> Self {
		self.max_bulk_len = len;
		self
	}

	/// Set the maximum array element count.
	pub const fn max_array_len(mut self, len: usize) -> Self {
		self.max_array_len = len;
		self
	}

	/// Set the maximum line length.
	pub const fn max_line_len(mut self, len: usize) -> Self {
		self.max_line_len = len;
		self
	}
}

/// Decodes RESP values from a borrowed buffer.
///
/// The decoder never copies the buffer and never keeps references into it
/// past a call: decoded values own their data.
pub struct Decoder<'a> {
	cursor: Cursor<&'a [u8]>,
	config: DecoderConfig,
	depth: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(buf: &'a [u8]) -> Self {
		Self::with_config(buf, DecoderConfig::default())
	}

	pub fn with_config(buf: &'a [u8], config: DecoderConfig) -> Self {
		Self {
			cursor: Cursor::new(buf),
			config,
			depth: 0,
		}
	}

	/// Number of bytes consumed so far.
	pub fn position(&self) -> usize {
		self.cursor.position() as usize
	}

	/// The bytes not consumed yet.
	pub fn remaining(&self) -> &'a [u8] {
		let buf: &'a [u8] = *self.cursor.get_ref();
		&buf[self.position().min(buf.len())..]
	}

	/// Returns `true` once every byte of the buffer has been consumed.
	pub fn is_empty(&self) -> bool {
		!self.cursor.has_remaining()
	}

	/// Decode one value starting at the cursor.
	///
	/// On error the cursor position is unspecified and the decoder should be
	/// discarded.
	pub fn parse(&mut self) -> Result<RespValue, ParseError> {
		if !self.cursor.has_remaining() {
			return Err(ParseError::UnknownTypeTag(None));
		}

		let position = self.position();
		let tag = self.cursor.get_u8();
		trace!(tag = %(tag as char), position, "decoding value");

		match tag {
			SIMPLE_STRING => self.parse_simple_string(),
			ERROR => self.parse_error(),
			INTEGER => self.parse_integer(),
			BULK_STRING => self.parse_bulk_string(),
			ARRAY => self.parse_array(),
			other => {
				debug!(tag = other, position, "rejecting unknown type tag");
				Err(ParseError::UnknownTypeTag(Some(other)))
			}
		}
	}

	/// Read a line and advance past its CRLF. The returned slice excludes the
	/// terminator.
	fn read_line(&mut self) -> Result<&'a [u8], ParseError> {
		let rest = self.remaining();
		let max = self.config.max_line_len;
		match find_crlf(rest) {
			Some(end) if end > max => Err(self.too_large("line", end, max)),
			Some(end) => {
				self.cursor.advance(end + CRLF.len());
				Ok(&rest[..end])
			}
			// A trailing CR may be the first half of the terminator.
			None if rest.strip_suffix(b"\r").unwrap_or(rest).len() > max => {
				Err(self.too_large("line", rest.len(), max))
			}
			None => Err(ParseError::Truncated {
				needed: rest.len() + 1,
				available: rest.len(),
			}),
		}
	}

	/// Read a length line and check it against `max`. `Ok(None)` is the null
	/// marker `-1`.
	fn read_length(&mut self, what: &'static str, max: usize) -> Result<Option<usize>, ParseError> {
		let length = parse_length(self.read_line()?)?;
		match length {
			Some(n) if n > max => Err(self.too_large(what, n, max)),
			length => Ok(length),
		}
	}

	fn too_large(&self, what: &'static str, size: usize, max: usize) -> ParseError {
		debug!(what, size, max, "rejecting oversized input");
		ParseError::TooLarge { what, size, max }
	}

	/// Parse a simple string: `+OK\r\n`
	fn parse_simple_string(&mut self) -> Result<RespValue, ParseError> {
		let line = self.read_line()?;
		Ok(RespValue::SimpleString(Line::from_wire(
			std::str::from_utf8(line)?.to_owned(),
		)))
	}

	/// Parse an error: `-ERR message\r\n`
	fn parse_error(&mut self) -> Result<RespValue, ParseError> {
		let line = self.read_line()?;
		Ok(RespValue::Error(Line::from_wire(
			std::str::from_utf8(line)?.to_owned(),
		)))
	}

	/// Parse an integer: `:1000\r\n`
	fn parse_integer(&mut self) -> Result<RespValue, ParseError> {
		let line = self.read_line()?;
		Ok(RespValue::Integer(parse_integer(line)?))
	}

	/// Parse a bulk string: `$6\r\nfoobar\r\n` or `$-1\r\n` for null
	fn parse_bulk_string(&mut self) -> Result<RespValue, ParseError> {
		let Some(length) = self.read_length("bulk string", self.config.max_bulk_len)? else {
			return Ok(RespValue::BulkString(None));
		};

		let rest = self.remaining();
		let needed = length.saturating_add(CRLF.len());
		if rest.len() < needed {
			debug!(needed, available = rest.len(), "bulk string truncated");
			return Err(ParseError::Truncated {
				needed,
				available: rest.len(),
			});
		}
		if &rest[length..needed] != CRLF {
			return Err(ParseError::MissingTerminator);
		}

		let data = std::str::from_utf8(&rest[..length])?;
		self.cursor.advance(needed);
		Ok(RespValue::BulkString(Some(data.to_owned())))
	}

	/// Parse an array: `*2\r\n...` or `*-1\r\n` for null
	fn parse_array(&mut self) -> Result<RespValue, ParseError> {
		let Some(length) = self.read_length("array", self.config.max_array_len)? else {
			return Ok(RespValue::Array(None));
		};

		if self.depth >= self.config.max_depth {
			debug!(max = self.config.max_depth, "array nesting too deep");
			return Err(ParseError::DepthExceeded {
				max: self.config.max_depth,
			});
		}

		self.depth += 1;
		let items = self.parse_elements(length);
		self.depth -= 1;
		Ok(RespValue::Array(Some(items?)))
	}

	fn parse_elements(&mut self, length: usize) -> Result<Vec<RespValue>, ParseError> {
		// Every element takes at least three bytes, so the remaining input
		// bounds how many can follow regardless of the declared count.
		let mut items = Vec::with_capacity(length.min(self.cursor.remaining() / 3));
		for _ in 0..length {
			items.push(self.parse()?);
		}
		Ok(items)
	}
}

/// Convenience function for one-off parsing.
///
/// Decodes the first value in `buf` and ignores any bytes after it. Use
/// [`Decoder`] directly to learn how many bytes were consumed.
pub fn parse(buf: &[u8]) -> Result<RespValue, ParseError> {
	Decoder::new(buf).parse()
}

/// Decode one value from the front of `buf` and advance past it.
///
/// The buffer is left untouched when decoding fails, so a transport can append
/// more bytes and retry after an [incomplete](ParseError::is_incomplete) error.
pub fn parse_frame(buf: &mut BytesMut, config: DecoderConfig) -> Result<RespValue, ParseError> {
	let mut decoder = Decoder::with_config(&buf[..], config);
	let value = decoder.parse()?;
	let consumed = decoder.position();
	buf.advance(consumed);
	Ok(value)
}
