pub mod ecs;
pub mod errors;
pub mod logging;
pub mod root;
pub mod routing;
pub mod server;
pub mod upstream;

pub use ecs::EcsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use routing::RoutingConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
