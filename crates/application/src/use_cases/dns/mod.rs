mod forward_dns_message;
mod forward_json_query;

pub use forward_dns_message::ForwardDnsMessageUseCase;
pub use forward_json_query::ForwardJsonQueryUseCase;
