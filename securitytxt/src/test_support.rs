//! Test doubles shared by the unit tests

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Mutex;

use url::Url;

use crate::error::FetchError;
use crate::fetch::{FetchResponse, Fetcher};

/// One canned HTTP response
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
}

impl Route {
    pub fn new(path: &'static str, status: u16, body: &'static str) -> Self {
        Self { path, status, body }
    }
}

/// Start a throwaway HTTP/1.1 server on 127.0.0.1
///
/// Unknown paths answer 404. Returns the base URL without a trailing slash.
/// The server thread lives until the test process exits.
pub fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };

            let mut request_line = String::new();
            let mut reader = BufReader::new(&mut stream);
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            // Drain headers
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" || header == "\n" => break,
                    Ok(_) => {}
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = routes
                .iter()
                .find(|route| route.path == path)
                .map(|route| (route.status, route.body))
                .unwrap_or((404, "not found"));

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}", addr)
}

/// In-memory fetcher keyed by full URL, recording every request
#[derive(Debug, Default)]
pub struct MapFetcher {
    responses: HashMap<String, Result<FetchResponse, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`
    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Ok(FetchResponse::new(status, body)));
        self
    }

    /// Fail `url` with a transport error
    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Err(FetchError::Transport {
                location: url.to_string(),
                message: message.to_string(),
            }),
        );
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Fetcher for MapFetcher {
    fn fetch(&self, location: &Url) -> Result<FetchResponse, FetchError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(location.to_string());

        self.responses
            .get(location.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(FetchResponse::new(404, "")))
    }
}
