#![warn(missing_docs)]
//! HTTP transport collaborator for `text-core`.
//!
//! The contract with the core is deliberately small: deliver a completed
//! response (status, header map, body) or an error string, exactly once,
//! either as a synchronous return value or through a single callback
//! invocation. A negative status signals transport-level failure, with the
//! error string in place of a body. The connection timeout is fixed and
//! owned by the transport; there is no retry, caching, backpressure, or
//! cancellation.
//!
//! Response bodies are delivered as a [`TextBuffer`] when the content type
//! matches `text/*` (decoded per its `charset` parameter, UTF-8 by
//! default), and as raw bytes otherwise.

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use text_core::TextBuffer;
use text_core_encoding::Encoding;

/// Request methods supported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// PATCH
    Patch,
}

/// Cache disposition carried on a request, mapped onto `Cache-Control`
/// request headers (the transport itself keeps no cache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Let protocol semantics decide.
    #[default]
    ProtocolDefault,
    /// Bypass any intermediary cache.
    IgnoreLocalCache,
    /// Accept stale cached data when an intermediary has it.
    PreferCache,
    /// Only accept cached data; never go to the origin.
    CacheOnly,
}

/// A request body: raw bytes or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Sent as-is.
    Bytes(Vec<u8>),
    /// Sent as UTF-8.
    Text(TextBuffer),
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL.
    pub url: String,
    /// Request method.
    pub method: Method,
    /// Additional request headers, in order.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<RequestBody>,
    /// Cache disposition.
    pub cache_policy: CachePolicy,
}

impl Request {
    /// A GET request for `url` with no extra headers.
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Get,
            headers: Vec::new(),
            body: None,
            cache_policy: CachePolicy::default(),
        }
    }
}

/// A response body, selected by content-type sniff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Non-text payload, delivered raw.
    Bytes(Vec<u8>),
    /// `text/*` payload, decoded per its charset parameter.
    Text(TextBuffer),
}

/// A completed response. Delivered exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status, or a negative value for a transport-level failure.
    pub status: i32,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Response payload.
    pub body: ResponseBody,
}

/// Transport errors.
#[derive(Debug)]
pub enum HttpError {
    /// The request never produced an HTTP response.
    Transport(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// A blocking HTTP client with a fixed connection timeout.
///
/// HTTP status codes are always delivered as responses, never mapped to
/// transport errors, so a 404 is a `Response { status: 404, .. }` rather
/// than an `Err`.
pub struct Client {
    agent: ureq::Agent,
}

impl Client {
    /// Timeout applied when none is given.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// A client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// A client with an explicit overall timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    /// Performs `request`, blocking until the single delivery occurs.
    pub fn fetch(&self, request: &Request) -> Result<Response, HttpError> {
        let body_bytes: Vec<u8> = match &request.body {
            None => Vec::new(),
            Some(RequestBody::Bytes(bytes)) => bytes.clone(),
            Some(RequestBody::Text(text)) => text.to_string_lossy().into_bytes(),
        };
        let response = match request.method {
            Method::Get | Method::Head | Method::Delete => {
                let mut builder = match request.method {
                    Method::Get => self.agent.get(&request.url),
                    Method::Head => self.agent.head(&request.url),
                    _ => self.agent.delete(&request.url),
                };
                for (name, value) in request_headers(request) {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            Method::Post | Method::Put | Method::Patch => {
                let mut builder = match request.method {
                    Method::Post => self.agent.post(&request.url),
                    Method::Put => self.agent.put(&request.url),
                    _ => self.agent.patch(&request.url),
                };
                for (name, value) in request_headers(request) {
                    builder = builder.header(name, value);
                }
                builder.send(&body_bytes[..])
            }
        }
        .map_err(|err| HttpError::Transport(err.to_string()))?;
        read_response(response)
    }

    /// Performs `request` and hands the outcome to `callback`, invoked
    /// exactly once: transport failures arrive as a response with a negative
    /// status and the error string as a text body.
    pub fn fetch_with_callback(&self, request: &Request, callback: impl FnOnce(Response)) {
        match self.fetch(request) {
            Ok(response) => callback(response),
            Err(HttpError::Transport(message)) => callback(Response {
                status: -1,
                headers: HashMap::new(),
                body: ResponseBody::Text(TextBuffer::from_str(&message)),
            }),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// The effective request headers: the cache-policy header, if any, followed
/// by the caller's own.
fn request_headers(request: &Request) -> impl Iterator<Item = (&str, &str)> {
    let cache = cache_control_header(request.cache_policy).map(|v| ("Cache-Control", v));
    cache
        .into_iter()
        .chain(request.headers.iter().map(|(name, value)| (name.as_str(), value.as_str())))
}

fn cache_control_header(policy: CachePolicy) -> Option<&'static str> {
    match policy {
        CachePolicy::ProtocolDefault => None,
        CachePolicy::IgnoreLocalCache => Some("no-cache"),
        CachePolicy::PreferCache => Some("max-stale"),
        CachePolicy::CacheOnly => Some("only-if-cached"),
    }
}

fn read_response(response: ureq::http::Response<ureq::Body>) -> Result<Response, HttpError> {
    let status = response.status().as_u16() as i32;
    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        headers.insert(
            name.as_str().to_string(),
            value.to_str().unwrap_or_default().to_string(),
        );
    }
    let mut reader = response.into_body().into_reader();
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| HttpError::Transport(err.to_string()))?;
    let body = match headers.get("content-type").and_then(|ct| text_encoding(ct)) {
        Some(encoding) => match text_core_encoding::decode(&bytes, encoding, true) {
            Ok(buffer) => ResponseBody::Text(buffer),
            Err(_) => ResponseBody::Bytes(bytes),
        },
        None => ResponseBody::Bytes(bytes),
    };
    Ok(Response { status, headers, body })
}

/// For a `text/*` content type, the encoding named by its `charset`
/// parameter (UTF-8 when absent or unrecognized); `None` for anything else.
fn text_encoding(content_type: &str) -> Option<Encoding> {
    let lowered = content_type.trim().to_ascii_lowercase();
    if !lowered.starts_with("text/") {
        return None;
    }
    for param in lowered.split(';').skip(1) {
        if let Some(charset) = param.trim().strip_prefix("charset=") {
            let charset = charset.trim_matches('"');
            return Some(Encoding::from_name(charset).unwrap_or(Encoding::Utf8));
        }
    }
    Some(Encoding::Utf8)
}
