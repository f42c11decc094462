//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers every GET with whatever the responder returns for (path, request
//! number) and records the request paths so tests can count attempts.
//! Connections are handled one at a time, in arrival order.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Reply {
            status: 200,
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Reply {
            status,
            body: format!("status {}", status).into_bytes(),
        }
    }
}

pub struct StatusServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StatusServer {
    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Starts a server in a background thread. `responder` gets the request path
/// and the 0-based index of the request. The server runs until the process exits.
pub fn start<F>(responder: F) -> StatusServer
where
    F: Fn(&str, usize) -> Reply + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &responder, &seen);
        }
    });
    StatusServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// Serves `replies` in order; once exhausted, repeats the last one.
pub fn start_sequence(replies: Vec<Reply>) -> StatusServer {
    start(move |_, n| replies[n.min(replies.len() - 1)].clone())
}

fn handle<F>(mut stream: TcpStream, responder: &F, seen: &Mutex<Vec<String>>)
where
    F: Fn(&str, usize) -> Reply,
{
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let index = {
        let mut seen = seen.lock().unwrap();
        seen.push(path.clone());
        seen.len() - 1
    };
    let reply = responder(&path, index);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
