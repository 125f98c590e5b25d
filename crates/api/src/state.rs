use doh_ecs_application::use_cases::{ForwardDnsMessageUseCase, ForwardJsonQueryUseCase};
use doh_ecs_domain::config::RoutingConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub forward_message: Arc<ForwardDnsMessageUseCase>,
    pub forward_json: Arc<ForwardJsonQueryUseCase>,
    pub routing: Arc<RoutingConfig>,
    /// Header carrying the caller's address, e.g. `CF-Connecting-IP`.
    pub client_ip_header: Arc<str>,
}
