//! Burrow DNS Resolver
//!
//! An iterative stub resolver: starting from a single root server it
//! follows referrals and aliases itself instead of asking an upstream
//! recursive resolver, and drives lookups from an interactive prompt.

use anyhow::{Context, Result};
use burrow_resolver::{Resolver, ResolverConfig, UdpTransport};
use clap::Parser;
use console::style;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod repl;

/// Burrow DNS Resolver - iterative resolution from the root down
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root server IP to start every resolution walk from
    #[arg(value_name = "ROOT_SERVER")]
    root_server: IpAddr,

    /// Receive timeout per attempt, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Start with verbose query/response tracing enabled
    #[arg(long)]
    trace: bool,
}

/// Parse log level from string
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn init_logging(cli_level: &str) {
    let level = parse_log_level(cli_level);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the startup banner
fn print_banner(root_server: IpAddr, timeout: Duration) {
    if !console::user_attended() {
        return;
    }

    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!(
        "  {} {}",
        style("Burrow DNS Resolver").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!("  {}", style("Iterative resolution from the root down").dim());
    println!();
    println!("  {} {}", style("Root server:").green(), root_server);
    println!("  {} {:?}", style("Timeout:").green(), timeout);
    println!();
    println!("  Type {} for a list of commands.", style("help").bold());
    println!();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = ResolverConfig {
        timeout: Duration::from_millis(cli.timeout),
        ..ResolverConfig::default()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let transport = runtime
        .block_on(UdpTransport::bind(config.timeout))
        .context("failed to bind UDP socket")?;

    let resolver = Resolver::new(Arc::new(transport), cli.root_server, config.clone());
    resolver.set_verbose(cli.trace);

    print_banner(cli.root_server, config.timeout);

    repl::run(&runtime, &resolver)
}
