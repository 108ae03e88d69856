//! Minimal HTTP/1.1 server that misbehaves on cue, for retry integration tests.
//!
//! Each accepted connection takes the next reply from a script; once the
//! script is used up the last reply repeats.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 OK with this body.
    Ok(Vec<u8>),
    /// Given status with a short text body.
    Status(u16),
    /// Wait this long, then answer 200 with the body (client should time out first).
    Stall(Duration, Vec<u8>),
    /// Read the request and close without answering.
    Hangup,
}

pub struct FlakyServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl FlakyServer {
    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(script: Vec<Reply>) -> FlakyServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let script = Arc::new(script);
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = server_hits.fetch_add(1, Ordering::SeqCst);
            let reply = script[n.min(script.len() - 1)].clone();
            thread::spawn(move || handle(stream, reply));
        }
    });
    FlakyServer {
        url: format!("http://127.0.0.1:{}/resource", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, reply: Reply) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    match reply {
        Reply::Ok(body) => respond(&mut stream, "200 OK", &body),
        Reply::Status(code) => {
            let status = format!("{} Scripted", code);
            respond(&mut stream, &status, b"scripted failure");
        }
        Reply::Stall(delay, body) => {
            thread::sleep(delay);
            respond(&mut stream, "200 OK", &body);
        }
        Reply::Hangup => {}
    }
}

fn respond(stream: &mut TcpStream, status: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
