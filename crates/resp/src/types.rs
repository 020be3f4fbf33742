//! RESP data types and value representation.

use std::fmt;
use std::ops::Deref;

/// Payload of a simple string or an error.
///
/// A `Line` never contains the CRLF terminator, so it always encodes as a
/// single RESP line. [`Line::new`] replaces every CR and LF with a space.
/// Lines read off the wire may keep a lone CR or LF, since the decoder stops
/// at the first CRLF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Line(String);

impl Line {
	pub fn new(s: impl Into<String>) -> Self {
		let s = s.into();
		if s.contains(['\r', '\n']) {
			Line(s.replace(['\r', '\n'], " "))
		} else {
			Line(s)
		}
	}

	/// Wrap text taken from between a type tag and the first CRLF.
	pub(crate) fn from_wire(s: String) -> Self {
		debug_assert!(!s.contains("\r\n"));
		Line(s)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl Deref for Line {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Line {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Line {
	fn from(s: &str) -> Self {
		Line::new(s)
	}
}

impl From<String> for Line {
	fn from(s: String) -> Self {
		Line::new(s)
	}
}

impl PartialEq<str> for Line {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for Line {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// Represents a RESP protocol value.
///
/// Bulk strings and arrays carry an `Option`: `None` is the protocol's null
/// marker (`$-1` / `*-1`), which is distinct from an empty string or array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
	/// Simple string: `+OK\r\n`
	SimpleString(Line),

	/// Error: `-ERR message\r\n`
	Error(Line),

	/// Integer: `:1000\r\n`
	///
	/// Stored as `i128`, so any literal up to 39 digits in that range decodes
	/// without loss. Wider literals fail to decode.
	Integer(i128),

	/// Bulk string: `$6\r\nfoobar\r\n`, or `$-1\r\n` for `None`
	BulkString(Option<String>),

	/// Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`, or `*-1\r\n` for `None`
	Array(Option<Vec<RespValue>>),
}

impl RespValue {
	/// Check if the value is an error
	pub fn is_error(&self) -> bool {
		matches!(self, RespValue::Error(_))
	}

	/// Check if the value is a null bulk string or a null array
	pub fn is_null(&self) -> bool {
		matches!(self, RespValue::BulkString(None) | RespValue::Array(None))
	}

	/// Try to convert to a string slice
	pub fn as_str(&self) -> Option<&str> {
		match self {
			RespValue::SimpleString(s) => Some(s.as_str()),
			RespValue::BulkString(Some(s)) => Some(s.as_str()),
			_ => None,
		}
	}

	/// Try to convert to integer
	pub fn as_integer(&self) -> Option<i128> {
		match self {
			RespValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Try to convert to array
	pub fn as_array(&self) -> Option<&[RespValue]> {
		match self {
			RespValue::Array(Some(a)) => Some(a.as_slice()),
			_ => None,
		}
	}

	/// Try to consume and convert to Vec<RespValue>
	pub fn into_vec(self) -> Option<Vec<RespValue>> {
		match self {
			RespValue::Array(a) => a,
			_ => None,
		}
	}

	/// Name of the variant, for log lines and error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			RespValue::SimpleString(_) => "simple string",
			RespValue::Error(_) => "error",
			RespValue::Integer(_) => "integer",
			RespValue::BulkString(_) => "bulk string",
			RespValue::Array(_) => "array",
		}
	}

	// Convenience constructors

	/// Create a simple string value. CR and LF are replaced with spaces.
	pub fn simple_string(s: impl Into<String>) -> Self {
		RespValue::SimpleString(Line::new(s))
	}

	/// Create an error value. CR and LF are replaced with spaces.
	pub fn error(e: impl Into<String>) -> Self {
		RespValue::Error(Line::new(e))
	}

	/// Create an integer value
	pub fn integer(i: impl Into<i128>) -> Self {
		RespValue::Integer(i.into())
	}

	/// Create a bulk string value
	pub fn bulk_string(s: impl Into<String>) -> Self {
		RespValue::BulkString(Some(s.into()))
	}

	/// Create a null bulk string
	pub fn null_bulk_string() -> Self {
		RespValue::BulkString(None)
	}

	/// Create an array value from an iterator
	pub fn array(items: impl IntoIterator<Item = RespValue>) -> Self {
		RespValue::Array(Some(items.into_iter().collect()))
	}

	/// Create a null array
	pub fn null_array() -> Self {
		RespValue::Array(None)
	}
}

/// Renders values the way `redis-cli` prints them, on one line.
impl fmt::Display for RespValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RespValue::SimpleString(s) => write!(f, "{s}"),
			RespValue::Error(e) => write!(f, "(error) {e}"),
			RespValue::Integer(i) => write!(f, "(integer) {i}"),
			RespValue::BulkString(Some(s)) => write!(f, "{s:?}"),
			RespValue::BulkString(None) | RespValue::Array(None) => write!(f, "(nil)"),
			RespValue::Array(Some(items)) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{item}")?;
				}
				write!(f, "]")
			}
		}
	}
}

// Convenient From implementations
impl From<&str> for RespValue {
	fn from(s: &str) -> Self {
		RespValue::BulkString(Some(s.to_string()))
	}
}

impl From<String> for RespValue {
	fn from(s: String) -> Self {
		RespValue::BulkString(Some(s))
	}
}

impl From<i32> for RespValue {
	fn from(i: i32) -> Self {
		RespValue::Integer(i.into())
	}
}

impl From<i64> for RespValue {
	fn from(i: i64) -> Self {
		RespValue::Integer(i.into())
	}
}

impl From<i128> for RespValue {
	fn from(i: i128) -> Self {
		RespValue::Integer(i)
	}
}

impl<T: Into<RespValue>> From<Vec<T>> for RespValue {
	fn from(v: Vec<T>) -> Self {
		RespValue::Array(Some(v.into_iter().map(Into::into).collect()))
	}
}

/// `None` becomes the null bulk string, the usual "no such key" reply.
impl<T: Into<RespValue>> From<Option<T>> for RespValue {
	fn from(o: Option<T>) -> Self {
		match o {
			Some(v) => v.into(),
			None => RespValue::BulkString(None),
		}
	}
}
