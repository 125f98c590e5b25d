use doh_ecs_domain::config::EcsConfig;
use doh_ecs_domain::{
    ClientSubnet, DnsMessage, DohRequest, DomainError, EcsInjector, RecordType, SubnetPolicy,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::{UpstreamResolver, UpstreamResponse};

/// Rewrites a wire-format query with the caller's subnet and forwards it.
pub struct ForwardDnsMessageUseCase {
    upstream: Arc<dyn UpstreamResolver>,
    subnet_policy: Option<SubnetPolicy>,
    injector: EcsInjector,
}

impl ForwardDnsMessageUseCase {
    pub fn new(upstream: Arc<dyn UpstreamResolver>, ecs: &EcsConfig) -> Self {
        Self {
            upstream,
            subnet_policy: ecs.enabled.then(|| ecs.subnet_policy()),
            injector: ecs.injector(),
        }
    }

    #[instrument(skip(self, request), fields(method = %request.method, len = request.message.len()))]
    pub async fn execute(&self, request: &DohRequest) -> Result<UpstreamResponse, DomainError> {
        let message = DnsMessage::decode(&request.message)?;
        let subnet = self.subnet_for(request.client_ip.as_deref());

        if let Some(question) = message.questions.first() {
            debug!(
                qname = %question.name,
                qtype = %RecordType::name_of(question.qtype),
                subnet = ?subnet.as_ref().map(ToString::to_string),
                "Forwarding DNS query"
            );
        }

        // Without a subnet the caller's bytes go out untouched.
        let outgoing = match subnet {
            Some(ref subnet) => self.injector.apply(&message, Some(subnet))?.encode()?,
            None => request.message.clone(),
        };

        self.upstream.send_message(&outgoing, request.method).await
    }

    fn subnet_for(&self, client_ip: Option<&str>) -> Option<ClientSubnet> {
        self.subnet_policy.as_ref()?.derive(client_ip?)
    }
}
