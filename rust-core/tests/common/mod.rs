#![allow(dead_code)]

use eeg_bandstream::acquisition::{AcquisitionError, Pulled, StreamSource};
use eeg_bandstream::config::AcquisitionConfig;
use eeg_bandstream::{Acquisition, Sample};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const SAMPLE_RATE: f64 = 256.0;
pub const START_TIME: f64 = 1_700_000_000.0;

/// Finite in-memory stream; closes after the last sample
pub struct VecSource {
    samples: VecDeque<Sample>,
}

impl VecSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }
}

impl StreamSource for VecSource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn channel_count(&self) -> usize {
        5
    }

    fn nominal_rate(&self) -> f64 {
        SAMPLE_RATE
    }

    fn pull(&mut self, _timeout: Duration) -> Result<Pulled, AcquisitionError> {
        Ok(match self.samples.pop_front() {
            Some(sample) => Pulled::Sample(sample),
            None => Pulled::Closed,
        })
    }
}

pub fn acquisition() -> Acquisition {
    Acquisition::new(AcquisitionConfig::default(), Arc::new(AtomicBool::new(false)))
}

/// Five-channel samples with `f(n)` on AF7 and AF8, zeros elsewhere
pub fn frontal_samples(count: usize, f: impl Fn(usize) -> f64) -> Vec<Sample> {
    (0..count)
        .map(|n| {
            let v = f(n);
            Sample::new(
                vec![0.0, v, v, 0.0, 0.0],
                START_TIME + n as f64 / SAMPLE_RATE,
            )
        })
        .collect()
}

/// One request as seen by [`StatusServer`]
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

/// Minimal HTTP/1.1 responder answering one connection per scripted status
pub struct StatusServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StatusServer {
    pub fn start(statuses: Vec<u16>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = received.clone();
        thread::spawn(move || {
            for status in statuses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let Some(request) = read_request(&stream) else {
                    continue;
                };
                log.lock().unwrap().push(request);
                respond(stream, status);
            }
        });

        Self { addr, received }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

fn read_request(stream: &TcpStream) -> Option<ReceivedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut headers = Vec::new();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let (name, value) = (name.trim().to_string(), value.trim().to_string());
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(ReceivedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn respond(mut stream: TcpStream, status: u16) {
    let reply = format!("status {}", status);
    let response = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
