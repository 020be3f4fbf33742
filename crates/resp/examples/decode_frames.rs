use resp::Decoder;
use resp::ParseError;
use resp::RespEncoder;
use resp::RespValue;

fn main() {
	println!("--- RESP Frame Decoding Example ---");

	// Three frames back to back, as a transport would hand them over:
	// - A Simple String: "+OK\r\n"
	// - An Integer wider than 64 bits
	// - An Array: "*2\r\n$3\r\nGET\r\n$-1\r\n"
	let wire = b"+OK\r\n:123456789012345678901234\r\n*2\r\n$3\r\nGET\r\n$-1\r\n";

	let mut decoder = Decoder::new(wire);
	loop {
		match decoder.parse() {
			Ok(value) => {
				println!(
					"[Decoder] {} at byte {}: {}",
					value.kind(),
					decoder.position(),
					value
				);
			}
			Err(ParseError::UnknownTypeTag(None)) => {
				println!("[Decoder] End of buffer");
				break;
			}
			Err(e) => {
				eprintln!("[Decoder] Error: {}", e);
				break;
			}
		}
	}

	let reply = RespValue::array(vec![
		RespValue::simple_string("PONG"),
		RespValue::null_bulk_string(),
	]);
	println!("\n[Encoder] {:?}", reply.encode());
}
