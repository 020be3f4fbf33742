//! Integration tests for RESP encoder

use resp::RespEncoder;
use resp::RespValue;
use rstest::rstest;

#[test]
fn test_encode_redis_ping() {
	let cmd = RespValue::array(vec![RespValue::bulk_string("PING")]);
	assert_eq!(&cmd.encode()[..], b"*1\r\n$4\r\nPING\r\n");
}

#[test]
fn test_encode_echo_command() {
	let cmd = RespValue::array(vec![
		RespValue::bulk_string("echo"),
		RespValue::bulk_string("hello"),
	]);
	assert_eq!(&cmd.encode()[..], b"*2\r\n$4\r\necho\r\n$5\r\nhello\r\n");
}

#[rstest]
#[case(RespValue::simple_string("OK"), b"+OK\r\n")]
#[case(RespValue::error("ERR bad"), b"-ERR bad\r\n")]
#[case(RespValue::integer(1000), b":1000\r\n")]
#[case(RespValue::bulk_string("hello"), b"$5\r\nhello\r\n")]
#[case(RespValue::null_bulk_string(), b"$-1\r\n")]
#[case(RespValue::null_array(), b"*-1\r\n")]
#[case(RespValue::array(vec![]), b"*0\r\n")]
fn test_encode_wire_forms(#[case] value: RespValue, #[case] expected: &[u8]) {
	assert_eq!(&resp::serialize(&value)[..], expected);
}

#[rstest]
#[case(RespValue::simple_string("OK"))]
#[case(RespValue::error("ERR test error"))]
#[case(RespValue::integer(42))]
#[case(RespValue::integer(-100))]
#[case(RespValue::Integer(99_999_999_999_999_999_999_999))]
#[case(RespValue::bulk_string("hello world"))]
#[case(RespValue::bulk_string(""))]
#[case(RespValue::null_bulk_string())]
#[case(RespValue::null_array())]
#[case(RespValue::array(vec![]))]
fn test_roundtrip_simple_types(#[case] original: RespValue) {
	let encoded = original.encode();
	let decoded = resp::parse(&encoded).unwrap();
	assert_eq!(original, decoded, "Roundtrip failed for {:?}", original);
}

#[test]
fn test_roundtrip_nested_arrays() {
	let original = RespValue::array(vec![
		RespValue::array(vec![RespValue::integer(1), RespValue::integer(2)]),
		RespValue::array(vec![RespValue::null_bulk_string(), RespValue::null_array()]),
		RespValue::array(vec![]),
	]);

	let encoded = original.encode();
	let decoded = resp::parse(&encoded).unwrap();
	assert_eq!(original, decoded);
}

#[test]
fn test_encode_large_bulk_string() {
	let data = "x".repeat(1024);
	let value = RespValue::bulk_string(data.clone());
	let encoded = value.encode();

	assert!(encoded.starts_with(b"$1024\r\n"));
	let decoded = resp::parse(&encoded).unwrap();
	assert_eq!(decoded.as_str(), Some(data.as_str()));
}

#[test]
fn test_encode_multibyte_text_uses_byte_length() {
	let value = RespValue::bulk_string("naïve café");
	let encoded = value.encode();
	assert!(encoded.starts_with(b"$12\r\n"));
	assert_eq!(resp::parse(&encoded).unwrap(), value);
}

#[rstest]
#[case(RespValue::SimpleString("a\r\nb".into()))]
#[case(RespValue::Error("ERR x\r\n+OK".into()))]
#[case(RespValue::SimpleString(resp::Line::new(String::from("\r\n"))))]
fn test_line_variants_built_directly_stay_one_frame(#[case] inner: RespValue) {
	let value = RespValue::array(vec![inner]);
	let encoded = value.encode();

	let mut decoder = resp::Decoder::new(&encoded);
	assert_eq!(decoder.parse().unwrap(), value);
	assert_eq!(decoder.position(), encoded.len());
}
