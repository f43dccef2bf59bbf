//! Blocking `Transport` backed by `ureq`.

use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes requests with a shared `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` and
/// `max_redirects(0)` so 3xx/4xx/5xx responses come back as data and status
/// interpretation stays with `TemplateClient`. One call, one request.
/// Timeouts are ureq's defaults.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let url = path.as_str();

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), &headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let transport = UreqTransport::new();
        let request = HttpRequest {
            method: HttpMethod::Get,
            // Port 9 (discard) on loopback is closed on any sane test host.
            path: "http://127.0.0.1:9/v3/templates".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = transport.execute(request).unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
    }
}
