//! Request options and per-request context.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Extracted route parameters (e.g., `:id` from `products/:id`).
pub type RouteParams = HashMap<String, String>;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "PATCH" => Some(Method::Patch),
            "DELETE" => Some(Method::Delete),
            "HEAD" => Some(Method::Head),
            "OPTIONS" => Some(Method::Options),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller would have sent over the network.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Raw request body, usually JSON.
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body as a string.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_string(value)?);
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed as JSON. A missing or malformed body reads as `{}`.
    pub fn json_body(&self) -> Value {
        let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) else {
            return Value::Object(Default::default());
        };
        match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "malformed request body, treating as empty");
                Value::Object(Default::default())
            }
        }
    }
}

/// Split a request path into its routing key and query parameters.
///
/// The routing key has any leading `/`, the API prefix and trailing `/`
/// removed: `/api/products/?page=2` gives `products` and `{page: 2}`.
pub fn split_target(path: &str, api_prefix: &str) -> (String, QueryParams) {
    let path = path.split('#').next().unwrap_or_default();
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path, ""),
    };

    let mut key = path.trim_start_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if !prefix.is_empty() {
        if key == prefix {
            key = "";
        } else if let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            key = rest;
        }
    }
    let key = key.trim_end_matches('/').to_string();

    let params = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (key, params)
}

/// Everything a handler needs to know about the matched request.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    /// Routing key the request matched on.
    pub path: String,
    pub params: RouteParams,
    pub query: QueryParams,
    body: Value,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            query: HashMap::new(),
            body: Value::Object(Default::default()),
        }
    }

    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Parse a route parameter.
    pub fn param_as<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.param(name).and_then(|v| v.parse().ok())
    }

    /// Get a non-blank query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Parse a query parameter.
    pub fn query_as<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.query_param(name).and_then(|v| v.parse().ok())
    }

    /// A boolean query flag (`true`/`false`, `1`/`0`, `yes`/`no`).
    pub fn query_flag(&self, name: &str) -> Option<bool> {
        match self.query_param(name)?.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    /// The parsed JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The body as a typed input.
    ///
    /// Fields of the wrong shape are dropped one at a time, so they take the
    /// input type's defaults while the well-formed fields are kept. A body
    /// that isn't an object gives `T::default()`.
    pub fn body_as<T: DeserializeOwned + Default>(&self) -> T {
        let error = match T::deserialize(&self.body) {
            Ok(value) => return value,
            Err(e) => e,
        };
        warn!(error = %error, path = %self.path, "request body has unexpected shape");

        let Value::Object(fields) = &self.body else {
            return T::default();
        };

        let mut kept = Map::new();
        for (name, value) in fields {
            kept.insert(name.clone(), value.clone());
            if T::deserialize(&Value::Object(kept.clone())).is_err() {
                debug!(field = %name, path = %self.path, "ignoring malformed body field");
                kept.remove(name);
            }
        }

        T::deserialize(&Value::Object(kept)).unwrap_or_default()
    }
}
