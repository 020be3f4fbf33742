//! RESP encoder.
//!
//! Encoding is total: every [`RespValue`] has exactly one wire form, chosen by
//! its variant.

use bytes::BufMut;
use bytes::Bytes;
use bytes::BytesMut;

use crate::RespValue;
use crate::utils::*;

/// Trait for encoding RESP values.
pub trait RespEncoder {
	/// Append the wire form of `self` to `buf`.
	fn encode_to(&self, buf: &mut BytesMut);

	/// Exact number of bytes [`RespEncoder::encode_to`] writes.
	fn encoded_len(&self) -> usize;

	fn encode(&self) -> Bytes {
		let mut buf = BytesMut::with_capacity(self.encoded_len());
		self.encode_to(&mut buf);
		buf.freeze()
	}
}

impl RespEncoder for RespValue {
	fn encode_to(&self, buf: &mut BytesMut) {
		match self {
			RespValue::SimpleString(s) => encode_line(buf, SIMPLE_STRING, s),
			RespValue::Error(e) => encode_line(buf, ERROR, e),
			RespValue::Integer(i) => encode_integer(buf, *i),
			RespValue::BulkString(Some(s)) => encode_bulk_string(buf, s),
			RespValue::BulkString(None) => buf.put_slice(NULL_BULK_STRING),
			RespValue::Array(Some(arr)) => encode_array(buf, arr),
			RespValue::Array(None) => buf.put_slice(NULL_ARRAY),
		}
	}

	fn encoded_len(&self) -> usize {
		match self {
			RespValue::SimpleString(s) | RespValue::Error(s) => 1 + s.len() + CRLF.len(),
			RespValue::Integer(i) => {
				1 + decimal_len(i.unsigned_abs()) + usize::from(*i < 0) + CRLF.len()
			}
			RespValue::BulkString(Some(s)) => length_line_len(s.len()) + s.len() + CRLF.len(),
			RespValue::BulkString(None) => NULL_BULK_STRING.len(),
			RespValue::Array(Some(arr)) => {
				length_line_len(arr.len()) + arr.iter().map(RespEncoder::encoded_len).sum::<usize>()
			}
			RespValue::Array(None) => NULL_ARRAY.len(),
		}
	}
}

/// Serialize a value into a fresh buffer.
pub fn serialize(value: &RespValue) -> Bytes {
	value.encode()
}

#[inline]
fn encode_line(buf: &mut BytesMut, marker: u8, s: &str) {
	buf.put_u8(marker);
	buf.put_slice(s.as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_integer(buf: &mut BytesMut, i: i128) {
	buf.put_u8(INTEGER);
	buf.put_slice(i.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn encode_length(buf: &mut BytesMut, marker: u8, length: usize) {
	buf.put_u8(marker);
	buf.put_slice(length.to_string().as_bytes());
	buf.put_slice(CRLF);
}

#[inline]
fn length_line_len(length: usize) -> usize {
	1 + decimal_len(length as u128) + CRLF.len()
}

#[inline]
fn encode_bulk_string(buf: &mut BytesMut, s: &str) {
	// Length prefix counts UTF-8 bytes, not characters.
	encode_length(buf, BULK_STRING, s.len());
	buf.put_slice(s.as_bytes());
	buf.put_slice(CRLF);
}

fn encode_array(buf: &mut BytesMut, arr: &[RespValue]) {
	encode_length(buf, ARRAY, arr.len());
	for value in arr {
		value.encode_to(buf);
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn test_encode_simple_string() {
		let val = RespValue::SimpleString("OK".into());
		assert_eq!(val.encode(), b"+OK\r\n".as_slice());
	}

	#[test]
	fn test_encode_error() {
		let val = RespValue::Error("ERR bad".into());
		assert_eq!(val.encode(), b"-ERR bad\r\n".as_slice());
	}

	#[rstest]
	#[case(100, b":100\r\n")]
	#[case(-100, b":-100\r\n")]
	#[case(0, b":0\r\n")]
	#[case(999_999_999_999_999_999_999, b":999999999999999999999\r\n")]
	#[case(i128::MIN, b":-170141183460469231731687303715884105728\r\n")]
	fn test_encode_integer(#[case] input: i128, #[case] expected: &[u8]) {
		let val = RespValue::Integer(input);
		assert_eq!(val.encode(), expected);
	}

	#[test]
	fn test_encode_bulk_string() {
		let val = RespValue::BulkString(Some("hello".into()));
		assert_eq!(val.encode(), b"$5\r\nhello\r\n".as_slice());
	}

	#[test]
	fn test_encode_bulk_string_empty() {
		let val = RespValue::BulkString(Some(String::new()));
		assert_eq!(val.encode(), b"$0\r\n\r\n".as_slice());
	}

	#[test]
	fn test_encode_bulk_string_counts_bytes() {
		let val = RespValue::bulk_string("héllo");
		assert_eq!(val.encode(), "$6\r\nhéllo\r\n".as_bytes());
	}

	#[test]
	fn test_encode_nulls() {
		assert_eq!(RespValue::BulkString(None).encode(), b"$-1\r\n".as_slice());
		assert_eq!(RespValue::Array(None).encode(), b"*-1\r\n".as_slice());
	}

	#[test]
	fn test_encode_array() {
		let val = RespValue::array(vec![
			RespValue::simple_string("hello"),
			RespValue::integer(42),
			RespValue::null_bulk_string(),
		]);
		assert_eq!(val.encode(), b"*3\r\n+hello\r\n:42\r\n$-1\r\n".as_slice());
	}

	#[test]
	fn test_encode_array_empty() {
		let val = RespValue::Array(Some(vec![]));
		assert_eq!(val.encode(), b"*0\r\n".as_slice());
	}

	#[test]
	fn test_encode_to_appends() {
		let mut buf = BytesMut::from(&b"+OK\r\n"[..]);
		RespValue::integer(1).encode_to(&mut buf);
		assert_eq!(&buf[..], b"+OK\r\n:1\r\n");
	}

	#[rstest]
	#[case(RespValue::simple_string("OK"))]
	#[case(RespValue::error("ERR something"))]
	#[case(RespValue::integer(0))]
	#[case(RespValue::integer(-12345))]
	#[case(RespValue::Integer(i128::MAX))]
	#[case(RespValue::bulk_string(""))]
	#[case(RespValue::bulk_string("日本語"))]
	#[case(RespValue::null_bulk_string())]
	#[case(RespValue::null_array())]
	#[case(RespValue::array(vec![]))]
	#[case(RespValue::array(vec![
		RespValue::bulk_string("x".repeat(1000)),
		RespValue::array(vec![RespValue::integer(-1), RespValue::null_array()]),
	]))]
	fn test_encoded_len_matches_output(#[case] value: RespValue) {
		assert_eq!(value.encoded_len(), value.encode().len());
	}

	#[test]
	fn test_serialize_matches_encode() {
		let val = RespValue::array(vec![RespValue::bulk_string("PING")]);
		assert_eq!(serialize(&val), val.encode());
	}
}
