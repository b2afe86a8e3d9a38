//! HTTP client adapter for the host under test.

use crate::config::HostConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::request::Request;
use crate::response::Response;
use log::{debug, trace};
use reqwest::header::CONTENT_TYPE;

/// Thin wrapper over a shared `reqwest::Client` bound to one host.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(host: &HostConfig) -> HarnessResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(host.request_timeout())
            .build()
            .map_err(|e| HarnessError::from_reqwest_error(e, "client construction"))?;
        Ok(Self {
            http,
            base_url: host.base_url(),
        })
    }

    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs `request`, surfacing transport failures and non-2xx answers as errors.
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method(), endpoint = %request.endpoint()))]
    pub async fn perform_request(&self, request: &Request) -> HarnessResult<Response> {
        let context = format!("{} {}", request.method(), request.endpoint());
        let url = format!("{}{}", self.base_url, request.endpoint());

        let mut builder = self.http.request(request.method().into(), url.as_str());
        if !request.parameters().is_empty() {
            builder = builder.query(request.parameters());
        }
        if let Some(entity) = request.entity() {
            builder = builder
                .header(CONTENT_TYPE, entity.content_type.as_str())
                .body(entity.content.clone());
        }

        let reply = builder
            .send()
            .await
            .map_err(|e| HarnessError::from_reqwest_error(e, &context))?;

        let status = reply.status();
        let headers = reply.headers().clone();
        let body = reply
            .bytes()
            .await
            .map_err(|e| HarnessError::from_reqwest_error(e, &context))?;
        trace!("{context} -> {status} ({} bytes)", body.len());

        if !status.is_success() {
            debug!("{context} answered {status}");
            return Err(HarnessError::ErrorResponse {
                method: request.method().to_string(),
                endpoint: request.endpoint().to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Response::new(status.as_u16(), headers, body.to_vec()))
    }
}
