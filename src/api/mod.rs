//! REST client for the project-management backend.
//!
//! Resource conventions, for a resource `X`:
//!
//! | Operation        | Request                          |
//! |------------------|----------------------------------|
//! | list             | `GET /{Xs}?projectId=&...`       |
//! | get              | `GET /{Xs}/{id}`                 |
//! | create           | `POST /{Xs}`                     |
//! | update           | `PUT /{Xs}/{id}`                 |
//! | delete           | `DELETE /{Xs}/{id}`              |
//! | named transition | `PUT /{Xs}/{id}/{action}`        |
//! | sub-resources    | `GET|POST /{Xs}/{id}/{sub}`      |
//!
//! # Security Note - Logging
//!
//! The bearer token is held in a `SecretBox` and the `Authorization` header is
//! built through [`RedactedHeader`], whose `Debug` and `Display` print
//! `[REDACTED]`. Request logging only records method, path and status.

pub mod assistant;
pub mod error;
pub mod memory;
pub mod service;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, Response, multipart};
use secrecy::{ExposeSecret, SecretBox};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiConfig, Backend, Config};
use crate::domain::{Attachment, Record};
use crate::error::{Result, SiteworkError};

pub use assistant::{Assistant, AssistantSession, CannedAssistant, ChatMessage, Role};
pub use memory::InMemoryService;
pub use service::{CollectionService, ListQuery, RestService};

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| SiteworkError::Config("API token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client bound to one backend base URL
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<SecretBox<String>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Create a client from the `api` section of the configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SiteworkError::Config(format!("invalid api.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SiteworkError::Config(format!(
                "api.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            token: config
                .token
                .clone()
                .filter(|t| !t.is_empty())
                .map(|t| SecretBox::new(Box::new(t))),
        })
    }

    /// Create a client for `base_url` with default timeouts and no token
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretBox::new(Box::new(token.into())));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for the given path segments below the base URL. Segments are
    /// percent-encoded, so ids cannot escape their position in the path.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SiteworkError::Config("api.base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn display_path(segments: &[&str]) -> String {
        format!("/{}", segments.join("/"))
    }

    /// Send a request and map transport errors and non-2xx statuses to
    /// `RequestFailed`.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<RequestBody>,
    ) -> Result<Response> {
        let path = Self::display_path(segments);
        let mut request = self.client.request(method.clone(), self.url(segments)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            let auth = RedactedHeader::bearer(token.expose_secret());
            request = request.header(header::AUTHORIZATION, auth.as_header_value()?);
        }
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Multipart(form)) => request.multipart(form),
            None => request,
        };

        debug!(%method, %path, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| error::transport_error(method.as_str(), &path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%method, %path, status = status.as_u16(), "request failed");
            return Err(error::response_error(method.as_str(), &path, status, &body));
        }
        debug!(%method, %path, status = status.as_u16(), "request succeeded");
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<RequestBody>,
    ) -> Result<T> {
        let path = Self::display_path(segments);
        let response = self.send(method.clone(), segments, query, body).await?;
        response.json().await.map_err(|e| {
            SiteworkError::request_failed(method.as_str(), path, None, format!("invalid response body: {e}"))
        })
    }

    /// `GET /{Xs}?projectId=&...`
    pub async fn list<R: Record>(&self, query: &ListQuery) -> Result<Vec<R>> {
        self.json(Method::GET, &[R::RESOURCE], &query.to_pairs(), None)
            .await
    }

    /// `GET /{Xs}/{id}`
    pub async fn get<R: Record>(&self, id: &str) -> Result<R> {
        self.json(Method::GET, &[R::RESOURCE, id], &[], None).await
    }

    /// `POST /{Xs}`
    pub async fn create<R: Record>(&self, draft: &impl Serialize) -> Result<R> {
        let body = RequestBody::json(draft)?;
        self.json(Method::POST, &[R::RESOURCE], &[], Some(body)).await
    }

    /// `PUT /{Xs}/{id}`
    pub async fn update<R: Record>(&self, id: &str, draft: &impl Serialize) -> Result<R> {
        let body = RequestBody::json(draft)?;
        self.json(Method::PUT, &[R::RESOURCE, id], &[], Some(body))
            .await
    }

    /// `DELETE /{Xs}/{id}`
    pub async fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &[R::RESOURCE, id], &[], None)
            .await?;
        Ok(())
    }

    /// `PUT /{Xs}/{id}/{action}`
    pub async fn transition<R: Record>(&self, id: &str, action: &str) -> Result<R> {
        self.json(Method::PUT, &[R::RESOURCE, id, action], &[], None)
            .await
    }

    /// `GET /{Xs}/{id}/{sub}`: attachments, comments, line items, reviews, versions
    pub async fn list_sub<R: Record, T: DeserializeOwned>(&self, id: &str, sub: &str) -> Result<Vec<T>> {
        self.json(Method::GET, &[R::RESOURCE, id, sub], &[], None)
            .await
    }

    /// `POST /{Xs}/{id}/{sub}`
    pub async fn create_sub<R: Record, T: DeserializeOwned>(
        &self,
        id: &str,
        sub: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let body = RequestBody::json(body)?;
        self.json(Method::POST, &[R::RESOURCE, id, sub], &[], Some(body))
            .await
    }

    /// `POST /{Xs}/{id}/attachments` as `multipart/form-data` with a `file` part
    pub async fn upload<R: Record>(
        &self,
        id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        self.json(
            Method::POST,
            &[R::RESOURCE, id, "attachments"],
            &[],
            Some(RequestBody::Multipart(form)),
        )
        .await
    }

    /// `GET /{Xs}/{id}/download` as raw bytes
    pub async fn download<R: Record>(&self, id: &str) -> Result<Vec<u8>> {
        let segments = [R::RESOURCE, id, "download"];
        let path = Self::display_path(&segments);
        let response = self.send(Method::GET, &segments, &[], None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| error::transport_error("GET", &path, e))?;
        Ok(bytes.to_vec())
    }

    /// `POST /assistant/messages`
    pub async fn post_assistant(&self, request: &assistant::AssistantRequest) -> Result<assistant::AssistantReply> {
        let body = RequestBody::json(request)?;
        self.json(Method::POST, &["assistant", "messages"], &[], Some(body))
            .await
    }
}

enum RequestBody {
    Json(serde_json::Value),
    Multipart(multipart::Form),
}

impl RequestBody {
    fn json(value: &impl Serialize) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

/// The backend selected by configuration, handing out per-entity services
#[derive(Clone)]
pub enum Connection {
    Rest(Arc<ApiClient>),
    Mock,
}

impl Connection {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Rest => Ok(Connection::Rest(Arc::new(ApiClient::from_config(&config.api)?))),
            Backend::Mock => Ok(Connection::Mock),
        }
    }

    /// Service for records of type `R`. Mock services start from the seed
    /// data on every call.
    pub fn service<R: Record>(&self) -> Arc<dyn CollectionService<R>> {
        match self {
            Connection::Rest(client) => Arc::new(RestService::new(client.clone())),
            Connection::Mock => Arc::new(InMemoryService::<R>::seeded()),
        }
    }

    /// REST client, for sub-resources and files the mock backend does not serve
    pub fn client(&self) -> Result<&Arc<ApiClient>> {
        match self {
            Connection::Rest(client) => Ok(client),
            Connection::Mock => Err(SiteworkError::Config(
                "files and comments require the rest backend".to_string(),
            )),
        }
    }

    pub fn assistant(&self) -> Arc<dyn Assistant> {
        match self {
            Connection::Rest(client) => client.clone(),
            Connection::Mock => Arc::new(CannedAssistant),
        }
    }
}
