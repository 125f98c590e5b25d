use doh_ecs_domain::config::EcsConfig;
use doh_ecs_domain::{DomainError, JsonQuery, SubnetPolicy};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::{UpstreamResolver, UpstreamResponse};

/// Forwards an `application/dns-json` query, filling in
/// `edns_client_subnet` from the caller's address.
pub struct ForwardJsonQueryUseCase {
    upstream: Arc<dyn UpstreamResolver>,
    subnet_policy: Option<SubnetPolicy>,
}

impl ForwardJsonQueryUseCase {
    pub fn new(upstream: Arc<dyn UpstreamResolver>, ecs: &EcsConfig) -> Self {
        Self {
            upstream,
            subnet_policy: ecs.enabled.then(|| ecs.subnet_policy()),
        }
    }

    #[instrument(skip(self, query), fields(params = query.params.len()))]
    pub async fn execute(&self, query: &JsonQuery) -> Result<UpstreamResponse, DomainError> {
        let mut query = query.clone();

        let subnet = match (&self.subnet_policy, query.client_ip.as_deref()) {
            (Some(policy), Some(ip)) => policy.derive(ip),
            _ => None,
        };
        if let Some(subnet) = subnet {
            debug!(
                name = query.param("name").unwrap_or_default(),
                subnet = %subnet,
                "Setting edns_client_subnet on JSON query"
            );
            query.set_param(JsonQuery::CLIENT_SUBNET_PARAM, subnet.to_string());
        }

        self.upstream.send_json(&query.params).await
    }
}
