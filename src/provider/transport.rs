use std::fmt;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, COOKIE, ORIGIN, REFERER};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::error::Result;
use crate::models::{BackendConfig, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error from server: {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("server-side error: {message}")]
    Server { message: String },

    #[error("client has not set a CSRF token")]
    MissingCsrf,

    #[error("invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not decode server response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// JSON request/response plumbing, with credentials already attached.
pub trait Transport {
    fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        (**self).execute(method, path, body)
    }
}

/// Typed wrapper around [`Transport::execute`].
pub fn request<T, I, O>(transport: &T, method: Method, path: &str, input: Option<&I>) -> Result<O>
where
    T: Transport + ?Sized,
    I: Serialize + ?Sized,
    O: DeserializeOwned,
{
    let body = input.map(serde_json::to_value).transpose()?;
    let value = transport.execute(method, path, body.as_ref())?;
    serde_json::from_value(value).map_err(|e| TransportError::Decode(e).into())
}

pub fn graphql<T, V, O>(transport: &T, operation: &str, query: &str, variables: Option<&V>) -> Result<O>
where
    T: Transport + ?Sized,
    V: Serialize + ?Sized,
    O: DeserializeOwned,
{
    let body = json!({
        "operationName": operation,
        "query": query,
        "variables": variables,
    });
    request(transport, Method::Post, "/graphql", Some(&body))
}

/// Blocking HTTP client bound to one platform's base URL.
pub struct HttpTransport {
    client: Client,
    base: Url,
    csrf_token: String,
    csrf_header: String,
    cookies: String,
}

impl HttpTransport {
    pub fn new(platform: Platform, config: &BackendConfig) -> std::result::Result<Self, TransportError> {
        let base = Url::parse(platform.base_url()).map_err(|e| TransportError::InvalidPath {
            path: platform.base_url().to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(concat!("coderound/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            csrf_token: config.csrf.clone(),
            csrf_header: config.csrf_header(platform).to_string(),
            cookies: format!(
                "csrftoken={}; {}={}",
                config.csrf,
                platform.session_cookie(),
                config.session
            ),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        if self.csrf_token.is_empty() {
            return Err(TransportError::MissingCsrf);
        }

        let url = self.base.join(path).map_err(|e| TransportError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let origin = self.base.origin().ascii_serialization();

        let builder = match method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        let mut builder = builder
            .header(ACCEPT, "application/json")
            .header(REFERER, url.as_str())
            .header(ORIGIN, origin.as_str())
            .header(COOKIE, self.cookies.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(self.csrf_header.as_str(), self.csrf_token.as_str());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending request");
        let response = builder.send()?;
        let status = response.status();
        let text = response.text()?;
        debug!(%method, %url, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
