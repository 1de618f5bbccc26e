//! Network bridge (§4.3 "Network").
//!
//! Lifts a `NetworkSchema`'s interceptors into an ordered pipeline and
//! describes each endpoint's emitted call-site shape, independent of the
//! target dialect's concrete syntax.

use uic_ir::{CacheStrategy, Endpoint, InterceptorPhase, NetworkSchema, RetryConfig};

/// One endpoint's emission descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointEmission {
    /// Endpoint id.
    pub id: String,
    /// Designator of the generated call-site function.
    pub call_site_name: String,
    /// Effective cache strategy (endpoint override, or schema default).
    pub cache_strategy: CacheStrategy,
    /// Effective retry policy (endpoint override, or schema default).
    pub retry: RetryConfig,
}

/// The full network emission plan for one schema: an ordered interceptor
/// pipeline plus one descriptor per endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEmissionPlan {
    /// Interceptor ids to run, in phase-then-priority order, keyed by phase.
    pub request_pipeline: Vec<String>,
    /// Interceptor ids to run on response.
    pub response_pipeline: Vec<String>,
    /// Interceptor ids to run on error.
    pub error_pipeline: Vec<String>,
    /// Endpoint descriptors, in declaration order.
    pub endpoints: Vec<EndpointEmission>,
}

fn call_site_name(endpoint: &Endpoint) -> String {
    let method = format!("{:?}", endpoint.method).to_lowercase();
    let path_slug: String = endpoint
        .path
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{method}{path_slug}")
}

/// Build the network emission plan for `schema`. Interceptor pipelines are
/// flattened to handler-function designators lifted to module init, per
/// §4.3; endpoint-level retry/cache overrides fall back to the schema-wide
/// defaults.
pub fn build_emission_plan(schema: &NetworkSchema) -> NetworkEmissionPlan {
    let pipeline_for = |phase: InterceptorPhase| -> Vec<String> {
        schema
            .interceptors_for_phase(phase)
            .into_iter()
            .map(|i| i.handler.clone())
            .collect()
    };

    let endpoints = schema
        .endpoints
        .iter()
        .map(|endpoint| EndpointEmission {
            id: endpoint.id.clone(),
            call_site_name: call_site_name(endpoint),
            cache_strategy: endpoint.cache_strategy,
            retry: endpoint.retry.unwrap_or(schema.retry),
        })
        .collect();

    NetworkEmissionPlan {
        request_pipeline: pipeline_for(InterceptorPhase::Request),
        response_pipeline: pipeline_for(InterceptorPhase::Response),
        error_pipeline: pipeline_for(InterceptorPhase::Error),
        endpoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::{AuthConfig, AuthRequirement, CacheConfig, HttpMethod, Interceptor};

    fn schema() -> NetworkSchema {
        NetworkSchema {
            base_url: "https://api.example.com".into(),
            default_timeout_ms: 5000,
            default_headers: Default::default(),
            endpoints: vec![Endpoint {
                id: "get-user".into(),
                method: HttpMethod::Get,
                path: "/users/:id".into(),
                path_params: vec!["id".into()],
                query_params: vec![],
                body_schema: None,
                response_schema: None,
                cache_strategy: CacheStrategy::CacheFirst,
                retry: None,
                auth: AuthRequirement::Bearer,
            }],
            interceptors: vec![
                Interceptor {
                    id: "auth-header".into(),
                    phase: InterceptorPhase::Request,
                    priority: 10,
                    handler: "attachAuthHeader".into(),
                },
                Interceptor {
                    id: "logging".into(),
                    phase: InterceptorPhase::Request,
                    priority: 0,
                    handler: "logRequest".into(),
                },
            ],
            auth: AuthConfig::default(),
            retry: RetryConfig {
                max_attempts: 3,
                backoff_ms: 200,
                backoff_factor: 2.0,
            },
            cache: CacheConfig::default(),
        }
    }

    #[test]
    fn request_pipeline_is_priority_ordered() {
        let plan = build_emission_plan(&schema());
        assert_eq!(plan.request_pipeline, vec!["attachAuthHeader", "logRequest"]);
    }

    #[test]
    fn endpoint_without_override_uses_schema_retry() {
        let plan = build_emission_plan(&schema());
        assert_eq!(plan.endpoints[0].retry.max_attempts, 3);
        assert_eq!(plan.endpoints[0].call_site_name, "get_users__id");
    }
}
