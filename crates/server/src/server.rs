use std::net::SocketAddr;

use bytes::BytesMut;
use resp::DecoderConfig;
use resp::ParseError;
use resp::RespEncoder;
use resp::RespValue;
use resp::parse_frame;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::ServerConfig;

pub type ServerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Per-connection input limits.
#[derive(Debug, Clone, Copy)]
struct Limits {
	decoder: DecoderConfig,
	max_frame_len: usize,
}

pub struct Server {
	listener: TcpListener,
	limits: Limits,
}

impl Server {
	/// Bind the listening socket described by `config`.
	pub async fn bind(config: &ServerConfig) -> ServerResult<Self> {
		let addr = config.addr();
		let listener = TcpListener::bind(&addr).await?;
		info!("RESP server listening on {}", listener.local_addr()?);

		Ok(Self {
			listener,
			limits: Limits {
				decoder: DecoderConfig::new()
					.max_depth(config.max_depth)
					.max_bulk_len(config.max_bulk_len),
				max_frame_len: config.max_frame_len,
			},
		})
	}

	pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
		self.listener.local_addr()
	}

	pub async fn run(self) -> ServerResult<()> {
		loop {
			match self.listener.accept().await {
				Ok((socket, addr)) => {
					debug!("New client connected from {}", addr);
					let limits = self.limits;

					tokio::spawn(async move {
						match handle_client(socket, limits).await {
							Ok(()) => debug!("Client {} disconnected", addr),
							Err(e) => error!("Error handling client {}: {}", addr, e),
						}
					});
				}
				Err(e) => {
					error!("Error accepting connection: {}", e);
				}
			}
		}
	}
}

async fn handle_client(mut socket: TcpStream, limits: Limits) -> ServerResult<()> {
	let mut buffer = BytesMut::with_capacity(4096);
	let pong = RespValue::simple_string("PONG").encode();

	loop {
		let n = match socket.read_buf(&mut buffer).await {
			Ok(n) => n,
			Err(e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
				// Connection reset by peer (e.g. client crashed or closed abruptly)
				debug!("Connection reset by peer");
				return Ok(());
			}
			Err(e) => return Err(e.into()),
		};

		if n == 0 {
			// Connection closed
			if buffer.is_empty() {
				return Ok(());
			} else {
				return Err("Connection closed with incomplete data".into());
			}
		}

		while !buffer.is_empty() {
			match parse_frame(&mut buffer, limits.decoder) {
				Ok(value) => {
					info!(kind = value.kind(), "Parser output: {}", value);

					if let Err(e) = socket.write_all(&pong).await {
						if e.kind() == std::io::ErrorKind::ConnectionReset {
							debug!("Connection reset by peer");
							return Ok(());
						}
						return Err(e.into());
					}
				}
				Err(e) if e.is_incomplete() => {
					// Cap the bytes held for one unfinished request.
					if buffer.len() > limits.max_frame_len {
						let e = ParseError::TooLarge {
							what: "request",
							size: buffer.len(),
							max: limits.max_frame_len,
						};
						return reject(&mut socket, e).await;
					}
					break;
				}
				Err(e) => return reject(&mut socket, e).await,
			}
		}
	}
}

/// Report a protocol error to the client. The connection is closed after.
async fn reject(socket: &mut TcpStream, e: ParseError) -> ServerResult<()> {
	warn!("Protocol error: {}", e);
	let error_response = RespValue::error(format!("ERR Protocol error: {}", e));
	if let Err(write_err) = socket.write_all(&error_response.encode()).await {
		// If we can't write the error response because connection is reset, just give up
		if write_err.kind() != std::io::ErrorKind::ConnectionReset {
			return Err(write_err.into());
		}
	}
	Err(e.into())
}
