//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single body with an optional ETag, answers `If-None-Match` with
//! 304 when asked to, and records every request head so tests can assert on
//! what the client sent. Body and tag can be changed while running.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// ETag sent with every 200/304 response.
    pub etag: Option<String>,
    /// If false, `If-None-Match` is ignored and 200 is always returned.
    pub honor_if_none_match: bool,
    pub content_type: Option<String>,
    /// Status for every response; non-200 statuses send the body as an error page.
    pub status: u16,
    /// Sleep before responding (for timeout tests).
    pub delay: Option<Duration>,
    /// Respond with `302 Found` pointing here instead of serving the body.
    pub redirect_to: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            etag: None,
            honor_if_none_match: true,
            content_type: None,
            status: 200,
            delay: None,
            redirect_to: None,
        }
    }
}

/// A request head as received: method line plus header pairs.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// All values of `name`, case-insensitive, in arrival order.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

struct Shared {
    body: Vec<u8>,
    opts: ServerOptions,
    requests: Vec<RecordedRequest>,
}

pub struct TestServer {
    pub url: String,
    shared: Arc<Mutex<Shared>>,
}

impl TestServer {
    /// Replace the served body (simulates the resource changing).
    pub fn set_body(&self, body: &[u8]) {
        self.shared.lock().unwrap().body = body.to_vec();
    }

    pub fn set_etag(&self, etag: Option<&str>) {
        self.shared.lock().unwrap().opts.etag = etag.map(str::to_string);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.lock().unwrap().requests.clone()
    }
}

/// Starts a server in a background thread serving `body` with default options.
/// The server runs until the process exits.
pub fn start(body: &[u8]) -> TestServer {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: &[u8], opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let shared = Arc::new(Mutex::new(Shared {
        body: body.to_vec(),
        opts,
        requests: Vec::new(),
    }));
    let server_shared = Arc::clone(&shared);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let shared = Arc::clone(&server_shared);
            thread::spawn(move || handle(stream, &shared));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/resource", port),
        shared,
    }
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if data.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(data).ok()
}

fn parse_request(raw: &str) -> RecordedRequest {
    let mut lines = raw.split("\r\n");
    let request_line = lines.next().unwrap_or("").to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    RecordedRequest {
        request_line,
        headers,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        304 => "Not Modified",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(mut stream: TcpStream, shared: &Mutex<Shared>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let raw = match read_head(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let request = parse_request(&raw);

    let (body, opts) = {
        let mut guard = shared.lock().unwrap();
        guard.requests.push(request.clone());
        (guard.body.clone(), guard.opts.clone())
    };

    if let Some(delay) = opts.delay {
        thread::sleep(delay);
    }

    if let Some(location) = &opts.redirect_to {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            location
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut extra = String::new();
    if let Some(etag) = &opts.etag {
        extra.push_str(&format!("ETag: {}\r\n", etag));
    }

    let not_modified = opts.status == 200
        && opts.honor_if_none_match
        && opts.etag.is_some()
        && request.header("if-none-match").first().copied() == opts.etag.as_deref();
    if not_modified {
        let response = format!(
            "HTTP/1.1 304 Not Modified\r\n{}Connection: close\r\n\r\n",
            extra
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if let Some(ct) = &opts.content_type {
        extra.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        opts.status,
        reason(opts.status),
        body.len(),
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}
