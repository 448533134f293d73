use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

mod cli;

use cli::{Cli, Commands};
use unifi_mcp::config::{Config, TransportKind};
use unifi_mcp::mcp::{McpServer, serve_http, serve_stdio};
use unifi_mcp::tools::{Dispatcher, ToolContext, standard_registry};
use unifi_mcp::unifi::ReqwestBackend;

/// How long runtime teardown waits on blocking-pool work. A stdin read
/// parked there only returns on the next line or EOF.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn setup_logging(cli: &Cli, config: &Config) -> Result<()> {
    let filter = if cli.is_verbose() {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filter);

    // stdout belongs to the stdio transport
    match &config.log_file {
        Some(log_file) => {
            if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir).context("Failed to create log directory")?;
            }
            let target = Box::new(
                fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log_file)
                    .context("Failed to open log file")?,
            );
            builder.target(env_logger::Target::Pipe(target));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();

    if let Some(log_file) = &config.log_file {
        info!("Logging initialized, writing to: {}", log_file.display());
    }
    Ok(())
}

fn apply_cli_overrides(cli: &Cli, config: &mut Config) -> Option<String> {
    let warning = cli.transport.as_deref().and_then(|t| config.set_transport(t));
    if let Some(addr) = &cli.http_addr {
        config.server.http_addr = addr.clone();
    }
    warning
}

fn list_tools(config: &Config) -> Result<()> {
    let registry = standard_registry(config.unifi.network_tools).context("Failed to build tool registry")?;

    println!("{} ({})", "Registered tools".green().bold(), registry.len());
    for tool in registry.list() {
        println!("  {} - {}", tool.name.cyan(), tool.description);
    }
    if !config.unifi.network_tools {
        println!("{}", "Network tools disabled (UNIFI_NETWORK_TOOLS=false)".yellow());
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    config.validate()?;

    let client_config = config.client_config();
    info!("Connecting to UniFi controller at {}", client_config.base_url);
    if client_config.skip_tls_verify {
        warn!("TLS certificate verification is disabled");
    }

    let cancel = CancellationToken::new();
    let backend = Arc::new(ReqwestBackend::new(&client_config).context("Failed to create HTTP backend")?);
    let context = Arc::new(ToolContext::new(&client_config, backend, cancel.clone()));
    let registry = standard_registry(config.unifi.network_tools).context("Failed to build tool registry")?;
    info!("Registered {} tools", registry.len());

    let dispatcher = Arc::new(Dispatcher::new(registry, context));
    let server = Arc::new(McpServer::new(dispatcher));

    info!("Starting UniFi MCP server ({} transport)", config.server.transport);
    let mut transport = match config.server.transport {
        TransportKind::Stdio => tokio::spawn(serve_stdio(server, cancel.clone())),
        TransportKind::Http => {
            let addr = config.listen_addr();
            let token = cancel.clone();
            tokio::spawn(async move { serve_http(&addr, server, token).await })
        }
    };

    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutting down UniFi MCP server...");
        }
        result = &mut transport => {
            cancel.cancel();
            return finish(result);
        }
    }

    cancel.cancel();
    match tokio::time::timeout(client_config.timeout, transport).await {
        Ok(result) => finish(result),
        Err(_) => {
            warn!("Transport did not stop within {:?}", client_config.timeout);
            Ok(())
        }
    }
}

fn finish(result: std::result::Result<unifi_mcp::Result<()>, JoinError>) -> Result<()> {
    result.context("Transport task failed")?.context("Transport error")?;
    info!("UniFi MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn run_server(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(serve(config));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    result
}

fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let mut warnings = config.apply_env();
    warnings.extend(apply_cli_overrides(&cli, &mut config));

    setup_logging(&cli, &config).context("Failed to setup logging")?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Tools => list_tools(&config),
        Commands::Serve => run_server(config),
    }
}
