//! HTTP client core.
//!
//! The transport is abstracted behind [`HttpTransport`] so the same
//! client logic runs against browser `fetch` in production and against
//! an in-memory mock in tests. [`ApiClient`] owns everything above the
//! transport: URL joining, bearer attachment, body serialization,
//! tolerant error parsing, and the centralized 401 hook.

use std::fmt;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result, extract_message};
use crate::session::SessionStore;

#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

// =========================================================
// Wire-level request / response
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    /// Form field name (`image`, `images[]`).
    pub name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HttpBody {
    #[default]
    Empty,
    Json(Value),
    /// Multipart payload. The transport owns the boundary, so no
    /// content-type header may be set for these requests.
    Multipart(Vec<MultipartPart>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: HttpBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw transport response: status plus unparsed body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: no HTTP response was obtained.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

/// The pluggable seam between the client and the network.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> std::result::Result<RawResponse, TransportError>;
}

// =========================================================
// Query string helper
// =========================================================

/// Serialize flat key/value filter pairs, percent-encoded, skipping
/// absent and empty values. Pair order is the caller's order.
pub fn build_query_string<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        match value {
            Some(v) if !v.is_empty() => {
                serializer.append_pair(key, &v);
            }
            _ => {}
        }
    }
    serializer.finish()
}

// =========================================================
// Request options
// =========================================================

/// Per-call knobs for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: HttpBody,
    /// Attach the bearer token when one exists. Defaults to true; must
    /// be false for anonymous endpoints.
    pub include_auth: bool,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            body: HttpBody::Empty,
            include_auth: true,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json(method: HttpMethod, body: Value) -> Self {
        Self {
            method,
            body: HttpBody::Json(body),
            ..Self::default()
        }
    }

    pub fn multipart(parts: Vec<MultipartPart>) -> Self {
        Self {
            method: HttpMethod::Post,
            body: HttpBody::Multipart(parts),
            ..Self::default()
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.include_auth = false;
        self
    }
}

// =========================================================
// API client
// =========================================================

/// Hook invoked once per 401 response to a request that carried the
/// bearer, before the error propagates. Typically clears the session;
/// never navigates (guards own redirects). 401s on anonymous calls do
/// not fire it.
pub type UnauthorizedHook = Rc<dyn Fn()>;

/// The one place requests are built and responses classified. Cheap to
/// clone; clones share the transport and session.
#[derive(Clone)]
pub struct ApiClient {
    config: Rc<ApiConfig>,
    session: SessionStore,
    transport: Rc<dyn HttpTransport>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: SessionStore, transport: Rc<dyn HttpTransport>) -> Self {
        Self {
            config: Rc::new(config),
            session,
            transport,
            on_unauthorized: None,
        }
    }

    /// Install the centralized 401 hook.
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issue a request and classify the response.
    ///
    /// - 2xx with an empty body maps to `{"success": true}`.
    /// - 2xx with a JSON body is returned verbatim for the services to
    ///   normalize.
    /// - non-2xx throws [`ApiError`] with `status` set and the best
    ///   available server message; the body is parsed tolerantly (a
    ///   non-JSON or empty error body is fine).
    /// - transport failures throw with `status == None`.
    pub async fn request(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        let mut req = HttpRequest::new(self.config.url(endpoint), opts.method);

        let mut bearer_attached = false;
        if opts.include_auth {
            if let Some(token) = self.session.token() {
                req = req.with_header("Authorization", &format!("Bearer {token}"));
                bearer_attached = true;
            }
        }

        match &opts.body {
            HttpBody::Json(_) => {
                req = req.with_header("Content-Type", "application/json");
            }
            // Multipart: the transport sets the boundary; adding a
            // content-type here would break it.
            HttpBody::Multipart(_) | HttpBody::Empty => {}
        }
        for (key, value) in &opts.headers {
            req = req.with_header(key, value);
        }
        req.body = opts.body;

        tracing::debug!(method = req.method.as_str(), url = %req.url, "dispatching request");

        let response = match self.transport.send(req).await {
            Ok(response) => response,
            Err(e) => return Err(ApiError::network(e.message)),
        };

        if !response.ok() {
            return Err(self.classify_failure(response, bearer_attached));
        }

        let body = response.body.trim();
        if body.is_empty() {
            return Ok(json!({ "success": true }));
        }
        serde_json::from_str(body)
            .map_err(|e| ApiError::decode(format!("invalid JSON in success response: {e}")))
    }

    fn classify_failure(&self, response: RawResponse, bearer_attached: bool) -> ApiError {
        let parsed: Option<Value> = serde_json::from_str(response.body.trim()).ok();
        let message = parsed
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| format!("Request failed with status {}", response.status));
        let details = parsed.filter(Value::is_object);

        // A 401 only proves the session is stale when the request
        // actually carried the bearer. A rejected anonymous call (a
        // wrong-password login, say) must not touch the stored session.
        if response.status == 401 && bearer_attached {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }

        ApiError::http(response.status, message, details)
    }
}

// =========================================================
// Test transport
// =========================================================
