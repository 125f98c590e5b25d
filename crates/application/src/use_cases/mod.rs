pub mod dns;

pub use dns::{ForwardDnsMessageUseCase, ForwardJsonQueryUseCase};
