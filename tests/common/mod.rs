//! Loopback test server.
//!
//! `serve` binds an ephemeral port and answers one connection per canned
//! reply, recording every request it reads. The client under test builds a
//! fresh transport client per call and every reply says `Connection: close`,
//! so each call lands on its own accepted connection, in call order.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// One request as the server saw it: the head (request line plus header
/// lines, CRLFs stripped) and the raw body bytes.
pub struct Received {
    pub head: Vec<String>,
    pub body: Vec<u8>,
}

impl Received {
    pub fn request_line(&self) -> &str {
        &self.head[0]
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head[1..].iter().find_map(|line| {
            let (n, v) = line.split_once(':')?;
            if n.trim().eq_ignore_ascii_case(name) {
                Some(v.trim())
            } else {
                None
            }
        })
    }

    /// Every value sent for `name`, in wire order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.head[1..]
            .iter()
            .filter_map(|line| {
                let (n, v) = line.split_once(':')?;
                if n.trim().eq_ignore_ascii_case(name) {
                    Some(v.trim())
                } else {
                    None
                }
            })
            .collect()
    }
}

pub struct Server {
    pub base: String,
    handle: JoinHandle<Vec<Received>>,
}

impl Server {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Waits for every expected connection and returns the recorded
    /// requests in arrival order.
    pub fn finish(self) -> Vec<Received> {
        self.handle.join().expect("server thread")
    }
}

/// Starts a server that handles exactly `replies.len()` connections, sending
/// the replies in order.
pub fn serve(replies: Vec<String>) -> Server {
    let _ = env_logger::builder().is_test(true).try_init();

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));

    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().expect("accept");
            recorded.push(read_request(&mut stream));
            stream.write_all(reply.as_bytes()).expect("write reply");
            stream.flush().expect("flush reply");
        }
        recorded
    });

    Server { base, handle }
}

/// An HTTP/1.1 reply with the given status line tail (e.g. `"200 OK"`),
/// extra header lines, and body. Always closes the connection.
pub fn reply(status: &str, extra_headers: &[&str], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for header in extra_headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    out
}

fn read_request(stream: &mut TcpStream) -> Received {
    let mut reader = BufReader::new(stream);

    let mut head = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read head line");
        let line = line.trim_end().to_string();
        if line.is_empty() {
            break;
        }
        head.push(line);
    }

    let partial = Received { head, body: Vec::new() };
    let body = if let Some(len) = partial.header("Content-Length") {
        let len: usize = len.parse().expect("content-length");
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).expect("read sized body");
        buf
    } else if partial
        .header("Transfer-Encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"))
    {
        read_chunked(&mut reader)
    } else {
        Vec::new()
    };

    Received { body, ..partial }
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).expect("chunk size");
        let size = usize::from_str_radix(size_line.trim(), 16).expect("hex chunk size");
        if size == 0 {
            let mut trailer = String::new();
            reader.read_line(&mut trailer).expect("final CRLF");
            break;
        }
        let mut chunk = vec![0u8; size];
        reader.read_exact(&mut chunk).expect("chunk data");
        body.extend_from_slice(&chunk);
        let mut crlf = String::new();
        reader.read_line(&mut crlf).expect("chunk CRLF");
    }
    body
}
