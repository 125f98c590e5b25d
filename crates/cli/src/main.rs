use clap::Parser;
use doh_ecs_api::AppState;
use doh_ecs_domain::CliOverrides;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "doh-ecs")]
#[command(version)]
#[command(about = "DNS-over-HTTPS forwarding proxy that adds EDNS Client Subnet")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream DoH endpoint, used for both wire-format and JSON queries
    #[arg(short = 'u', long, value_name = "URL")]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Forward queries without adding a client subnet
    #[arg(long)]
    no_ecs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind,
        upstream_url: cli.upstream,
        log_level: cli.log_level,
        disable_ecs: cli.no_ecs,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting doh-ecs v{}", env!("CARGO_PKG_VERSION"));
    info!(
        upstream = %config.upstream.url,
        ecs_enabled = config.ecs.enabled,
        ipv4_prefix = config.ecs.ipv4_prefix,
        ipv6_prefix = config.ecs.ipv6_prefix,
        path_prefix = %config.routing.path_prefix,
        "Configuration loaded"
    );

    let use_cases = di::UseCases::new(&config)?;

    let app_state = AppState {
        forward_message: use_cases.forward_message,
        forward_json: use_cases.forward_json,
        routing: Arc::new(config.routing.clone()),
        client_ip_header: Arc::from(config.ecs.client_ip_header.as_str()),
    };

    server::start_web_server(&config.server.listen_addr(), app_state).await?;

    info!("Server shutdown complete");
    Ok(())
}
