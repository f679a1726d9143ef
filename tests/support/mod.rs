//! One-shot HTTP server for exercising the real transport.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub enum Reply {
    /// Answer with this status and body.
    Status(u16, Vec<u8>),
    /// Accept the connection, read the request, then say nothing for this long.
    Stall(Duration),
    /// Answer 200 announcing `len` bytes, then send them one at a time, `every` apart.
    Drip { len: usize, every: Duration },
}

/// Serve a single request on an ephemeral port; returns the base URL.
pub fn serve_once(reply: Reply) -> (String, JoinHandle<Option<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().ok()?;
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).ok()?;
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let path = request.split_whitespace().nth(1).map(str::to_string);
        match reply {
            Reply::Status(code, body) => {
                let head = format!(
                    "HTTP/1.1 {code} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).ok()?;
                stream.write_all(&body).ok()?;
                stream.flush().ok()?;
            }
            Reply::Stall(d) => thread::sleep(d),
            Reply::Drip { len, every } => {
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
                );
                stream.write_all(head.as_bytes()).ok()?;
                for _ in 0..len {
                    thread::sleep(every);
                    // The client hanging up ends the drip early.
                    stream.write_all(b"x").ok()?;
                    stream.flush().ok()?;
                }
            }
        }
        path
    });
    (format!("http://{addr}"), handle)
}

/// Number of entries in `dir`.
pub fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
