//! Stateless HTTP request builder and response parser for the templates API.
//!
//! # Design
//! `TemplateClient` holds the API key and base URL and nothing else. Each
//! operation has a `build_*` method that produces an `HttpRequest`; responses
//! are consumed by one of the `parse_*` methods, chosen by what the operation
//! returns. No I/O happens here.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Template, TemplateVersion};

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// Synchronous, stateless client for the templates API.
#[derive(Clone)]
pub struct TemplateClient {
    api_key: String,
    base_url: String,
}

// Keeps the API key out of logs and panic messages.
impl fmt::Debug for TemplateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TemplateClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- templates ---

    pub fn build_create_template(&self, template: Option<&Template>) -> Result<HttpRequest, ApiError> {
        let body = encode_body(template)?;
        Ok(self.request(HttpMethod::Post, self.templates_url(), Some(body)))
    }

    pub fn build_get_all_templates(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.templates_url(), None)
    }

    pub fn build_get_template(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.template_url(id), None)
    }

    pub fn build_update_template(
        &self,
        id: &str,
        template: Option<&Template>,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode_body(template)?;
        Ok(self.request(HttpMethod::Patch, self.template_url(id), Some(body)))
    }

    pub fn build_delete_template(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.template_url(id), None)
    }

    // --- versions ---

    /// The owning template is taken from `version.template.id`.
    pub fn build_create_template_version(
        &self,
        version: Option<&TemplateVersion>,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode_body(version)?;
        let template_id = version
            .and_then(TemplateVersion::template_id)
            .ok_or(ApiError::MissingTemplateId)?;
        let path = format!("{}/versions", self.template_url(template_id));
        Ok(self.request(HttpMethod::Post, path, Some(body)))
    }

    pub fn build_update_template_version(
        &self,
        id: &str,
        version: Option<&TemplateVersion>,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode_body(version)?;
        let template_id = version
            .and_then(TemplateVersion::template_id)
            .ok_or(ApiError::MissingTemplateId)?;
        Ok(self.request(HttpMethod::Patch, self.version_url(template_id, id), Some(body)))
    }

    pub fn build_get_template_version(&self, template_id: &str, version_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.version_url(template_id, version_id), None)
    }

    pub fn build_delete_template_version(&self, template_id: &str, version_id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.version_url(template_id, version_id), None)
    }

    pub fn build_activate_template_version(&self, template_id: &str, version_id: &str) -> HttpRequest {
        let path = format!("{}/activate", self.version_url(template_id, version_id));
        self.request(HttpMethod::Post, path, None)
    }

    // --- responses ---

    pub fn parse_template(&self, response: HttpResponse) -> Result<Template, ApiError> {
        decode(response)
    }

    pub fn parse_template_version(&self, response: HttpResponse) -> Result<TemplateVersion, ApiError> {
        decode(response)
    }

    /// For operations whose success body carries nothing of interest.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    /// `true` when the listing call succeeded. The listing itself is dropped.
    pub fn parse_reachability(&self, response: HttpResponse) -> bool {
        check_status(&response).is_ok()
    }

    fn templates_url(&self) -> String {
        format!("{}/v3/templates", self.base_url)
    }

    /// Ids are inserted verbatim; one containing `/`, `?` or `#` addresses a
    /// different endpoint.
    fn template_url(&self, id: &str) -> String {
        format!("{}/v3/templates/{id}", self.base_url)
    }

    /// Same verbatim insertion as `template_url`.
    fn version_url(&self, template_id: &str, version_id: &str) -> String {
        format!("{}/v3/templates/{template_id}/versions/{version_id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), format!("Bearer {}", self.api_key))];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }
}

fn encode_body<T: Serialize>(body: Option<&T>) -> Result<String, ApiError> {
    let body = body.ok_or_else(|| ApiError::SerializationError("request body is missing".to_string()))?;
    serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| {
        warn!(error = %e, "response body did not match the expected shape");
        ApiError::DeserializationError(e.to_string())
    })
}

/// Any status of 300 or above becomes an `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "templates API returned an error status");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
