use doh_ecs_application::ports::UpstreamResolver;
use doh_ecs_application::use_cases::{ForwardDnsMessageUseCase, ForwardJsonQueryUseCase};
use doh_ecs_domain::Config;
use doh_ecs_infrastructure::dns::transport::HttpsUpstream;
use std::sync::Arc;

pub struct UseCases {
    pub forward_message: Arc<ForwardDnsMessageUseCase>,
    pub forward_json: Arc<ForwardJsonQueryUseCase>,
}

impl UseCases {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let upstream: Arc<dyn UpstreamResolver> =
            Arc::new(HttpsUpstream::from_config(&config.upstream)?);

        Ok(Self {
            forward_message: Arc::new(ForwardDnsMessageUseCase::new(
                upstream.clone(),
                &config.ecs,
            )),
            forward_json: Arc::new(ForwardJsonQueryUseCase::new(upstream, &config.ecs)),
        })
    }
}
