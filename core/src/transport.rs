//! The network seam.
//!
//! Managers hand a plain `HttpRequest` to a `Transport` and get a plain
//! `HttpResponse` back. A transport must return non-2xx responses as values;
//! only a failure to obtain any response at all is an `Err`.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data for the managers to classify. Request headers,
/// `content-type` included, are forwarded exactly as built.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    base_url: String,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, url = %url, "sending request");

        let result = match request.method {
            HttpMethod::Get => decorate(self.agent.get(&url), &request).call(),
            HttpMethod::Delete => decorate(self.agent.delete(&url), &request).call(),
            HttpMethod::Post => {
                let builder = decorate(self.agent.post(&url), &request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = decorate(self.agent.put(&url), &request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(method = %request.method, url = %url, status, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
