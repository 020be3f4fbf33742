//! Utility functions and constants for RESP protocol.

use crate::error::ParseError;

/// CRLF line ending
pub const CRLF: &[u8] = b"\r\n";

/// Type markers
pub const SIMPLE_STRING: u8 = b'+';
pub const ERROR: u8 = b'-';
pub const INTEGER: u8 = b':';
pub const BULK_STRING: u8 = b'$';
pub const ARRAY: u8 = b'*';

/// Wire form of the null bulk string and the null array.
pub const NULL_BULK_STRING: &[u8] = b"$-1\r\n";
pub const NULL_ARRAY: &[u8] = b"*-1\r\n";

/// Find the position of CRLF in a byte slice
#[inline]
pub fn find_crlf(buf: &[u8]) -> Option<usize> {
	memchr::memmem::find(buf, CRLF)
}

/// Parse a signed integer literal from a byte slice.
///
/// Values outside the `i128` range are rejected, not truncated.
#[inline]
pub fn parse_integer(buf: &[u8]) -> Result<i128, ParseError> {
	std::str::from_utf8(buf)
		.ok()
		.and_then(|s| s.parse::<i128>().ok())
		.ok_or_else(|| ParseError::InvalidInteger(String::from_utf8_lossy(buf).into_owned()))
}

/// Parse the length line of a bulk string or an array.
///
/// Only the canonical forms are accepted: `-1` for null, otherwise plain
/// decimal digits with no sign and no leading zero.
pub fn parse_length(buf: &[u8]) -> Result<Option<usize>, ParseError> {
	let (negative, digits) = match buf.split_first() {
		Some((b'-', rest)) => (true, rest),
		_ => (false, buf),
	};
	let canonical = !digits.is_empty()
		&& digits.iter().all(u8::is_ascii_digit)
		&& (digits.len() == 1 || digits[0] != b'0');
	if !canonical || (negative && digits == b"0") {
		return Err(ParseError::InvalidInteger(
			String::from_utf8_lossy(buf).into_owned(),
		));
	}

	let value = parse_integer(digits)?;
	match (negative, value) {
		(true, 1) => Ok(None),
		(true, n) => Err(ParseError::InvalidLength(-n)),
		(false, n) => usize::try_from(n)
			.map(Some)
			.map_err(|_| ParseError::InvalidLength(n)),
	}
}

/// Number of bytes in the decimal rendering of `n`.
#[inline]
pub fn decimal_len(n: u128) -> usize {
	let mut n = n;
	let mut len = 1;
	while n >= 10 {
		n /= 10;
		len += 1;
	}
	len
}
