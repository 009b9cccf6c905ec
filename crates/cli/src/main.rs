use clap::Parser;
use dnsproxy_domain::CliOverrides;
use dnsproxy_infrastructure::dns::DnsServerHandler;
use dnsproxy_jobs::JobRunner;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dnsproxy")]
#[command(version)]
#[command(about = "Forwarding DNS proxy with a hosts file, failover and response caching")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (ip:port) for both UDP and TCP
    #[arg(short = 'l', long, value_name = "ADDR")]
    listen: Option<String>,

    /// Hosts file path (empty string disables the hosts file)
    #[arg(long, value_name = "FILE")]
    hosts: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen_address: cli.listen,
        hosts_path: cli.hosts,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dnsproxy v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;
    let shutdown = CancellationToken::new();

    let mut runner = JobRunner::new().with_shutdown_token(shutdown.clone());
    if let Some(job) = dns_services.hosts_reload_job(&config) {
        runner = runner.with_hosts_reload(job);
    }
    let job_handles = runner.start();

    let handler = Arc::new(DnsServerHandler::new(dns_services.handler_use_case.clone()));
    let dns_server = server::DnsServer::bind(config.listen_addr()?, handler)?;
    let server_task = tokio::spawn(dns_server.run(shutdown.clone()));

    bootstrap::shutdown_signal().await;
    info!("Shutdown signal received, stopping");
    shutdown.cancel();

    if let Err(e) = server_task.await {
        error!(error = %e, "DNS server task failed");
    }
    for handle in job_handles {
        let _ = handle.await;
    }

    info!("Server shutdown complete");
    Ok(())
}
