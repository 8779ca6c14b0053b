// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	io::{BufRead, BufReader, Write},
	net::{SocketAddr, TcpListener},
	thread::{self, JoinHandle},
};

pub fn free_local_socket() -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind to ephemeral port");
	let addr = listener.local_addr().expect("failed to get local addr");
	drop(listener);
	addr
}

/// A canned http response.
#[derive(Debug, Clone)]
pub struct StubResponse {
	pub status: u16,
	pub content_type: String,
	pub body: String,
}

impl StubResponse {
	pub fn ok(content_type: &str, body: &str) -> Self {
		Self {
			status: 200,
			content_type: content_type.to_string(),
			body: body.to_string(),
		}
	}

	pub fn status(status: u16) -> Self {
		Self {
			status,
			content_type: "text/plain".to_string(),
			body: String::new(),
		}
	}
}

/// Serves the given responses, one per accepted connection, then stops.
pub struct StubServer {
	addr: SocketAddr,
	handle: Option<JoinHandle<()>>,
}

impl StubServer {
	pub fn start(responses: Vec<StubResponse>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind stub server");
		let addr = listener.local_addr().expect("failed to get local addr");

		let handle = thread::spawn(move || {
			for response in responses {
				let Ok((mut stream, _)) = listener.accept() else {
					return;
				};

				let mut reader = BufReader::new(stream.try_clone().expect("failed to clone stream"));
				let mut line = String::new();
				while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
					if line == "\r\n" || line == "\n" {
						break;
					}
					line.clear();
				}

				let reply = format!(
					"HTTP/1.1 {} STUB\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
					response.status,
					response.content_type,
					response.body.len(),
					response.body
				);
				let _ = stream.write_all(reply.as_bytes());
				let _ = stream.flush();
			}
		});

		Self {
			addr,
			handle: Some(handle),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
	}

	/// Waits until every canned response was served.
	pub fn join(mut self) {
		if let Some(handle) = self.handle.take() {
			handle.join().expect("stub server panicked");
		}
	}
}
