//! Minimal HTTP/1.1 server answering HEAD with a fixed status, for probe tests.
//!
//! Can also redirect, or accept connections and never answer (to exercise
//! probe timeouts).

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct StatusServerOptions {
    /// Status line code returned to HEAD (default 200).
    pub status: Option<u16>,
    /// `Location` header, for redirect statuses.
    pub location: Option<String>,
    /// Read the request but never respond.
    pub stall: bool,
}

pub struct StatusServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/stream".
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl StatusServer {
    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn start(status: u16) -> StatusServer {
    start_with_options(StatusServerOptions {
        status: Some(status),
        ..Default::default()
    })
}

/// Starts the server on a background thread; it runs until the process exits.
pub fn start_with_options(opts: StatusServerOptions) -> StatusServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &opts));
        }
    });
    StatusServer {
        url: format!("http://127.0.0.1:{}/stream", port),
        hits,
    }
}

/// URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/stream", port)
}

fn handle(mut stream: TcpStream, opts: &StatusServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 4096];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    if opts.stall {
        thread::sleep(Duration::from_secs(30));
        return;
    }
    let status = opts.status.unwrap_or(200);
    let location = opts
        .location
        .as_deref()
        .map(|l| format!("Location: {}\r\n", l))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        location
    );
    let _ = stream.write_all(response.as_bytes());
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
