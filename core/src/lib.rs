//! Blocking client for the SendGrid transactional templates API.
//!
//! # Overview
//! CRUD over templates and template versions under `/v3/templates`. Every
//! operation maps to exactly one HTTP request; any status of 300 or above is
//! an error carrying the status and raw body.
//!
//! # Design
//! - `TemplateClient` is stateless: it holds the API key and base URL, builds
//!   `HttpRequest` values (`build_*`) and parses `HttpResponse` values
//!   (`parse_*`) without touching the network.
//! - `SendGridClient` pairs a `TemplateClient` with a `Transport` and exposes
//!   the operations as single calls. `UreqTransport` is the default.
//! - No retries, pagination, or caching; errors reach the caller unmodified.
//!
//! ```no_run
//! use sendgrid_templates::{SendGridClient, Template};
//!
//! let client = SendGridClient::new("SG.xxxx");
//! let created = client.create_template(Some(&Template::named("welcome")))?;
//! println!("created {:?}", created.id);
//! # Ok::<(), sendgrid_templates::ApiError>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::SendGridClient;
pub use client::{TemplateClient, DEFAULT_BASE_URL};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{Template, TemplateVersion};
