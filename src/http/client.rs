use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::FlowError;

use super::request::RequestInput;
use super::response::HttpResponse;

/// Seam between the steps and the network.
pub trait Transport {
    fn send(
        &self,
        request: RequestInput,
    ) -> impl Future<Output = Result<HttpResponse, FlowError>> + Send;
}

/// reqwest-backed transport with one fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, FlowError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FlowError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestInput) -> Result<HttpResponse, FlowError> {
        let method: reqwest::Method = request.method.into();
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| FlowError::Transport(format!("Invalid URL `{}`: {e}", request.url)))?;

        let mut req_builder = self.client.request(method, url);
        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }
        if let Some(token) = &request.bearer_token {
            req_builder = req_builder.bearer_auth(token);
        }

        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let started = Instant::now();
        let response = req_builder
            .send()
            .await
            .map_err(|e| FlowError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::Transport(format!("Failed to read response: {e}")))?;
        let duration_ms = started.elapsed().as_millis();

        tracing::info!(
            method = %request.method,
            url = %request.url,
            status,
            duration_ms = duration_ms as u64,
            "response received"
        );

        Ok(HttpResponse { status, body })
    }
}
