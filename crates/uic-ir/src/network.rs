//! `NetworkSchema`, `Endpoint`, `Interceptor` (§3.1).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// HTTP method for an `Endpoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

/// How responses for an `Endpoint` are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Never cache; always refetch.
    NoCache,
    /// Serve from cache, refresh in the background.
    StaleWhileRevalidate,
    /// Serve from cache until explicitly invalidated.
    CacheFirst,
    /// Always hit the network; fall back to cache on failure.
    NetworkFirst,
}

/// Retry policy shared by endpoints and the schema-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts.
    pub max_attempts: u32,
    /// Base backoff in milliseconds.
    pub backoff_ms: u64,
    /// Backoff multiplier applied per attempt.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            backoff_ms: 0,
            backoff_factor: 1.0,
        }
    }
}

/// Whether and how an endpoint requires authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AuthRequirement {
    /// No authentication required.
    None,
    /// A bearer token is attached from the schema-wide auth config.
    Bearer,
    /// A named header carries a credential (e.g. API key).
    Header {
        /// Header name.
        name: String,
    },
}

/// One network endpoint (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Unique id within the `NetworkSchema`.
    pub id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path, relative to the schema's `base_url`, may contain `:param` segments.
    pub path: String,
    /// Declared path parameter names.
    pub path_params: Vec<String>,
    /// Declared query parameter names.
    pub query_params: Vec<String>,
    /// Request body schema, as an opaque JSON Schema-shaped value.
    pub body_schema: Option<serde_json::Value>,
    /// Response schema, as an opaque JSON Schema-shaped value.
    pub response_schema: Option<serde_json::Value>,
    /// Cache strategy for this endpoint's responses.
    pub cache_strategy: CacheStrategy,
    /// Retry policy, overriding the schema-wide default when present.
    pub retry: Option<RetryConfig>,
    /// Authentication requirement.
    pub auth: AuthRequirement,
}

/// When an `Interceptor` runs in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptorPhase {
    /// Before a request is sent.
    Request,
    /// After a response is received.
    Response,
    /// When a request or response fails.
    Error,
}

/// A pipeline interceptor (§3.1, §4.3 Network).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interceptor {
    /// Unique id within the `NetworkSchema`.
    pub id: String,
    /// Which phase this interceptor runs in.
    pub phase: InterceptorPhase,
    /// Interceptors with a higher priority run first within the same phase.
    pub priority: i32,
    /// Designator of the interceptor's handler function.
    pub handler: String,
}

/// Schema-wide authentication configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Designator of a function producing the current bearer token, if any.
    pub token_provider: Option<String>,
}

/// Schema-wide cache configuration defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default cache strategy for endpoints that don't override it.
    pub default_strategy: Option<CacheStrategy>,
}

/// The network side-table of an IR (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSchema {
    /// Base URL all endpoint paths are relative to.
    pub base_url: String,
    /// Default request timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// Default headers applied to every request.
    pub default_headers: IndexMap<String, String>,
    /// Declared endpoints.
    pub endpoints: Vec<Endpoint>,
    /// Declared interceptors.
    pub interceptors: Vec<Interceptor>,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Schema-wide default retry policy.
    pub retry: RetryConfig,
    /// Schema-wide cache configuration.
    pub cache: CacheConfig,
}

impl NetworkSchema {
    /// Interceptors active for a phase, ordered by descending priority.
    pub fn interceptors_for_phase(&self, phase: InterceptorPhase) -> Vec<&Interceptor> {
        let mut interceptors: Vec<&Interceptor> = self
            .interceptors
            .iter()
            .filter(|i| i.phase == phase)
            .collect();
        interceptors.sort_by(|a, b| b.priority.cmp(&a.priority));
        interceptors
    }
}
