//! JSON-over-HTTP delivery
//!
//! One blocking POST per record. Success means exactly the configured status
//! code; anything else, including network errors, is a failed delivery.

use super::{RecordSink, TelemetryError};
use crate::config::Credentials;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

/// Longest response body quoted in a failure message
const MAX_ERROR_BODY: usize = 512;

/// Status expected from a plain ingest endpoint
pub const STATUS_OK: u16 = 200;

/// Status expected from a document index on creation
pub const STATUS_CREATED: u16 = 201;

/// Posts serialized records to a fixed URL
pub struct JsonPoster {
    client: Client,
    url: String,
    credentials: Option<Credentials>,
    expected_status: StatusCode,
}

impl JsonPoster {
    /// # Arguments
    /// * `url` - Target endpoint
    /// * `expected_status` - Status code that counts as delivered
    /// * `timeout` - Whole-request timeout
    pub fn new(
        url: impl Into<String>,
        expected_status: u16,
        timeout: Duration,
    ) -> Result<Self, TelemetryError> {
        let expected_status = StatusCode::from_u16(expected_status)
            .map_err(|e| TelemetryError::Client(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelemetryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            credentials: None,
            expected_status,
        })
    }

    /// Send HTTP basic auth with every request
    pub fn with_basic_auth(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one record as JSON
    pub fn post<R: Serialize + ?Sized>(&self, record: &R) -> Result<(), TelemetryError> {
        let mut request = self.client.post(&self.url).json(record);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().map_err(|source| TelemetryError::Transport {
            url: self.url.clone(),
            source,
        })?;

        let status = response.status();
        if status == self.expected_status {
            return Ok(());
        }

        let mut body = response.text().unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(TelemetryError::Status {
            url: self.url.clone(),
            status: status.as_u16(),
            expected: self.expected_status.as_u16(),
            body,
        })
    }
}

impl<R: Serialize> RecordSink<R> for JsonPoster {
    fn deliver(&mut self, record: &R) -> Result<(), TelemetryError> {
        self.post(record)
    }
}
