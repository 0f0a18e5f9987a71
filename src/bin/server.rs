//! jigctl Server Binary
//!
//! Serves the jig command set over UDP, backed by the simulated jig.

use clap::Parser;
use jigctl::config::ConfigBuilder;
use jigctl::hardware::{self, SimulatedJig};
use jigctl::{jig_commands, Config, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// jigctl Server
#[derive(Parser, Debug)]
#[command(name = "jigctl-server")]
#[command(about = "UDP command server for the BTL test jig (simulated hardware)")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long)]
    listen: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jigctl=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("jigctl Server v{}", jigctl::VERSION);

    let base = match args.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let mut builder = ConfigBuilder::from_config(base);
    if let Some(listen) = args.listen {
        builder = builder.listen_addr(listen);
    }
    let config = builder.build();

    let table = jig_commands(hardware::shared(SimulatedJig::new()));
    tracing::info!("Commands: {}", table.names().join(", "));

    let server = match Server::bind(&config, table) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // Runs until the process is terminated (Ctrl+C)
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
