//! Immutable view of a response received from the host.

use crate::error::{HarnessError, HarnessResult};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decoded-body view as a tree of scalar, sequence and mapping nodes.
    pub fn json_value(&self) -> HarnessResult<serde_json::Value> {
        self.json()
    }

    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HarnessError::from_parse_error(e, "response body as JSON"))
    }
}
