//! HTTP/1.1 over std::net, one thread per connection
//!
//! The dashboard speaks just enough HTTP for a local tool: GET requests,
//! `Connection: close` responses with an explicit length. A request that
//! fails mid-handler produces a response and a log line; it never unwinds
//! past the connection thread, so one bad request cannot take the server
//! down.

use crate::router::Router;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A parsed inbound request
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: String,
}

/// An outbound response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    pub fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/html".into(),
            body: body.into_bytes(),
        }
    }

    pub fn raw(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            body,
        }
    }

    fn write_to(&self, stream: &mut TcpStream) -> std::io::Result<()> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
            self.status,
            status_text(self.status),
            self.body.len(),
            self.content_type
        );
        stream.write_all(head.as_bytes())?;
        stream.write_all(&self.body)?;
        stream.flush()
    }
}

/// The dashboard server: a listener plus the router every connection shares.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Bind to `addr`. Port 0 picks an ephemeral port (used by tests).
    pub fn bind<A: ToSocketAddrs>(addr: A, router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the listener fails. Each connection gets its
    /// own thread; a build in flight on one never blocks the others.
    pub fn run(self) -> std::io::Result<()> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    std::thread::spawn(move || handle_connection(&router, stream));
                }
                Err(e) => {
                    error!(target: "devdash::http", "accept failed: {}", e);
                }
            }
        }
        Ok(())
    }
}

fn handle_connection(router: &Router, mut stream: TcpStream) {
    let request = match parse_request(&stream) {
        Ok(request) => request,
        Err(e) => {
            debug!(target: "devdash::http", "unparseable request: {}", e);
            let _ = Response::html(400, "<h1>Bad Request</h1>".into()).write_to(&mut stream);
            return;
        }
    };

    let response = if request.method != "GET" {
        Response::html(405, "<h1>Method Not Allowed</h1>".into())
    } else {
        router.route(&percent_decode(&request.path))
    };

    info!(
        target: "devdash::http",
        method = %request.method,
        path = %request.path,
        status = response.status,
        "request"
    );

    // The client may be gone by the time a build finishes; that only fails
    // this write, and the result is simply discarded.
    if let Err(e) = response.write_to(&mut stream) {
        debug!(target: "devdash::http", path = %request.path, "response write failed: {}", e);
    }
}

/// Read the request line and drain headers until the blank line.
fn parse_request(stream: &TcpStream) -> Result<Request, String> {
    let mut reader = BufReader::new(stream.try_clone().map_err(|e| e.to_string())?);

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .map_err(|e| e.to_string())?;
    let parts: Vec<&str> = request_line.trim().splitn(3, ' ').collect();
    if parts.len() < 2 {
        return Err("invalid HTTP request line".to_string());
    }
    let method = parts[0].to_string();
    let (path, query) = split_target(parts[1]);

    loop {
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|e| e.to_string())?;
        if line.trim().is_empty() {
            break;
        }
    }

    Ok(Request {
        method,
        path,
        query,
    })
}

/// Split a request target into path and query.
fn split_target(target: &str) -> (String, String) {
    match target.find('?') {
        Some(idx) => (target[..idx].to_string(), target[idx + 1..].to_string()),
        None => (target.to_string(), String::new()),
    }
}

/// Decode `%XX` escapes and `+` in a URL path.
pub fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/plain/path.js"), "/plain/path.js");
        assert_eq!(percent_decode("/with%20space"), "/with space");
        assert_eq!(percent_decode("/a+b"), "/a b");
        assert_eq!(percent_decode("/broken%2"), "/broken%2");
        assert_eq!(percent_decode("/broken%zz"), "/broken%zz");
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/a/b"), ("/a/b".into(), "".into()));
        assert_eq!(
            split_target("/a/b?x=1&y=2"),
            ("/a/b".into(), "x=1&y=2".into())
        );
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(502), "Bad Gateway");
        assert_eq!(status_text(999), "Unknown");
    }

    #[test]
    fn test_response_html() {
        let response = Response::html(404, "<h1>gone</h1>".into());
        assert_eq!(response.status, 404);
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.body, b"<h1>gone</h1>");
    }
}
