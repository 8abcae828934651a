//! Validation daemon: a long-running server accepting validation requests
//! over a network binding instead of a one-shot batch.
//!
//! Concurrency model: a bounded pool of worker threads, each handling one
//! inbound request at a time, fed by a blocking accept loop. `start` blocks
//! until the listener fails; there are no timeouts and no cancellation.
//!
//! The wire protocol is a minimal HTTP/1.1 subset: `POST /` with a
//! `Content-Length` body validates the body as a document and answers the
//! JSON report; `GET /` answers a small status page when the GUI is enabled.
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, info, warn};

use crate::api;
use crate::core::params::DaemonParams;
use crate::error::{Error, Result};
use crate::io::Scenarios;

const STATUS_PAGE: &str = "<!DOCTYPE html>\
<html><head><title>doccheck daemon</title></head>\
<body><h1>doccheck daemon</h1>\
<p>POST an XML document to / to validate it.</p>\
</body></html>";

pub struct Daemon {
    params: DaemonParams,
}

impl Daemon {
    pub fn new(params: DaemonParams) -> Self {
        Self { params }
    }

    pub fn set_gui_enabled(&mut self, enabled: bool) {
        self.params.gui_enabled = enabled;
    }

    pub fn params(&self) -> &DaemonParams {
        &self.params
    }

    /// Bind and serve. Blocks until the listener fails; the daemon owns the
    /// process lifecycle from here on.
    pub fn start(&self, scenarios: Scenarios) -> Result<()> {
        let listener = TcpListener::bind((self.params.host.as_str(), self.params.port))?;
        info!(
            "Daemon listening on {}:{} with {} worker(s)",
            self.params.host, self.params.port, self.params.workers
        );
        self.serve(listener, Arc::new(scenarios))
    }

    fn serve(&self, listener: TcpListener, scenarios: Arc<Scenarios>) -> Result<()> {
        let (sender, receiver) = mpsc::channel::<TcpStream>();
        let receiver = Arc::new(Mutex::new(receiver));
        for id in 0..self.params.workers.max(1) {
            let receiver = Arc::clone(&receiver);
            let scenarios = Arc::clone(&scenarios);
            let gui_enabled = self.params.gui_enabled;
            thread::spawn(move || {
                loop {
                    let stream = {
                        let Ok(guard) = receiver.lock() else { break };
                        guard.recv()
                    };
                    let Ok(mut stream) = stream else { break };
                    debug!("Worker {} handling validation request", id);
                    if let Err(e) = handle_connection(&mut stream, &scenarios, gui_enabled) {
                        warn!("Error handling validation request: {}", e);
                    }
                }
            });
        }
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if sender.send(stream).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Failed to accept connection: {}", e),
            }
        }
        Ok(())
    }
}

struct Request {
    method: String,
    path: String,
    body: String,
}

fn handle_connection<S: Read + Write>(
    stream: &mut S,
    scenarios: &Scenarios,
    gui_enabled: bool,
) -> Result<()> {
    let request = read_request(stream)?;
    let response = match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/") => {
            let report = api::validate_content(scenarios, "request", request.body);
            http_response(
                "200 OK",
                "application/json",
                &serde_json::to_string_pretty(&report)?,
            )
        }
        ("GET", "/") if gui_enabled => http_response("200 OK", "text/html", STATUS_PAGE),
        ("GET", _) => http_response("404 Not Found", "text/plain", "not found"),
        _ => http_response("405 Method Not Allowed", "text/plain", "method not allowed"),
    };
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}

fn read_request<S: Read>(stream: &mut S) -> Result<Request> {
    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    if method.is_empty() || path.is_empty() {
        return Err(Error::Daemon("malformed request line".to_string()));
    }

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        let n = reader.read_line(&mut header)?;
        if n == 0 || header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::Daemon("invalid Content-Length".to_string()))?;
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    let body = String::from_utf8(body).map_err(Error::daemon)?;
    Ok(Request { method, path, body })
}

fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
