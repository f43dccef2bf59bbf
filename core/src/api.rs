//! Executing client: one method per templates API operation.
//!
//! Each method builds a request with `TemplateClient`, runs it through the
//! configured `Transport`, and parses the response. Failures are returned as
//! they occur; nothing is retried.

use tracing::debug;

use crate::client::TemplateClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{Template, TemplateVersion};

#[derive(Debug, Clone)]
pub struct SendGridClient<T = UreqTransport> {
    client: TemplateClient,
    transport: T,
}

impl SendGridClient<UreqTransport> {
    /// Client for the public API host using a default `ureq` agent.
    pub fn new(api_key: &str) -> Self {
        Self::with_transport(TemplateClient::new(api_key), UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(
            TemplateClient::with_base_url(&config.api_key, &config.base_url),
            UreqTransport::new(),
        )
    }
}

impl<T: Transport> SendGridClient<T> {
    pub fn with_transport(client: TemplateClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn template_client(&self) -> &TemplateClient {
        &self.client
    }

    /// Checks that the API key can list templates.
    pub fn validate(&self) -> Result<bool, ApiError> {
        self.get_all_templates()
    }

    pub fn create_template(&self, template: Option<&Template>) -> Result<Template, ApiError> {
        let request = self.client.build_create_template(template)?;
        self.client.parse_template(self.send(request)?)
    }

    /// `Ok(false)` when the API answers with an error status; only transport
    /// failures become `Err`.
    pub fn get_all_templates(&self) -> Result<bool, ApiError> {
        let request = self.client.build_get_all_templates();
        Ok(self.client.parse_reachability(self.send(request)?))
    }

    pub fn get_template(&self, id: &str) -> Result<Template, ApiError> {
        let request = self.client.build_get_template(id);
        self.client.parse_template(self.send(request)?)
    }

    pub fn update_template(&self, id: &str, template: Option<&Template>) -> Result<(), ApiError> {
        let request = self.client.build_update_template(id, template)?;
        self.client.parse_empty(self.send(request)?)
    }

    pub fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_template(id);
        self.client.parse_empty(self.send(request)?)
    }

    pub fn create_template_version(
        &self,
        version: Option<&TemplateVersion>,
    ) -> Result<TemplateVersion, ApiError> {
        let request = self.client.build_create_template_version(version)?;
        self.client.parse_template_version(self.send(request)?)
    }

    pub fn update_template_version(
        &self,
        id: &str,
        version: Option<&TemplateVersion>,
    ) -> Result<(), ApiError> {
        let request = self.client.build_update_template_version(id, version)?;
        self.client.parse_empty(self.send(request)?)
    }

    pub fn get_template_version(
        &self,
        template_id: &str,
        version_id: &str,
    ) -> Result<TemplateVersion, ApiError> {
        let request = self.client.build_get_template_version(template_id, version_id);
        self.client.parse_template_version(self.send(request)?)
    }

    pub fn delete_template_version(&self, template_id: &str, version_id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_template_version(template_id, version_id);
        self.client.parse_empty(self.send(request)?)
    }

    pub fn activate_template_version(
        &self,
        template_id: &str,
        version_id: &str,
    ) -> Result<TemplateVersion, ApiError> {
        let request = self.client.build_activate_template_version(template_id, version_id);
        self.client.parse_template_version(self.send(request)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending templates API request");
        let response = self.transport.execute(request)?;
        debug!(
            status = response.status,
            body_len = response.body.len(),
            "received templates API response"
        );
        Ok(response)
    }
}
