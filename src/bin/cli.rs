//! jigctl CLI Client
//!
//! Interactive prompt (or one-shot command) for talking to the jig.

use std::path::Path;

use clap::Parser;
use jigctl::config::{ConfigBuilder, DEFAULT_JIG_IP, DEFAULT_PORT};
use jigctl::{Client, Config, Value};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{fmt, EnvFilter};

/// jigctl CLI
#[derive(Parser, Debug)]
#[command(name = "jigctl-cli")]
#[command(about = "Communicate with the Teensy 4.1 board on the BTL test jig")]
struct Args {
    /// Jig IP address [default: 192.168.1.177]
    #[arg(long)]
    ip_address: Option<String>,

    /// Jig UDP port [default: 8888]
    #[arg(long)]
    port: Option<u16>,

    /// Reply timeout in milliseconds (overrides the config file)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Send this command once and exit instead of starting the prompt
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() {
    // Keep log lines out of the prompt unless asked for
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let base = match args.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut builder = match (args.ip_address, args.port) {
        (None, None) => ConfigBuilder::from_config(base),
        (ip, port) => {
            let (base_ip, base_port) = split_addr(&base.server_addr);
            let addr = format!(
                "{}:{}",
                ip.unwrap_or(base_ip),
                port.unwrap_or(base_port)
            );
            ConfigBuilder::from_config(base).server_addr(addr)
        }
    };
    if let Some(ms) = args.timeout_ms {
        builder = builder.recv_timeout_ms(ms);
    }
    let config = builder.build();

    let client = match Client::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if !args.command.is_empty() {
        let command = args.command.join(" ");
        match client.query(&command) {
            Ok(value) => println!("{}", render(&value)),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = repl(&client, &config) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Read commands until end of input, printing each reply or error
fn repl(client: &Client, config: &Config) -> Result<(), ReadlineError> {
    let editor_config = rustyline::Config::builder()
        .max_history_size(config.history_len)?
        .auto_add_history(false)
        .build();
    let mut rl = DefaultEditor::with_config(editor_config)?;

    let history = config.history_file.as_deref();
    if let Some(path) = history {
        load_history(&mut rl, path);
    }

    tracing::info!(
        "talking to {} (timeout {:?})",
        client.server_addr(),
        client.timeout()
    );

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match client.query(&line) {
                    Ok(value) => println!("{}", render(&value)),
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(err) => {
                if let Some(path) = history {
                    save_history(&mut rl, path);
                }
                return Err(err);
            }
        }
    }

    if let Some(path) = history {
        save_history(&mut rl, path);
    }
    Ok(())
}

/// Host and port of a configured address, falling back to the jig defaults
fn split_addr(addr: &str) -> (String, u16) {
    match addr.rsplit_once(':') {
        Some((host, port)) => (
            host.to_string(),
            port.parse().unwrap_or(DEFAULT_PORT),
        ),
        None => (DEFAULT_JIG_IP.to_string(), DEFAULT_PORT),
    }
}

/// Text replies are trimmed for display; numbers print as-is
fn render(value: &Value) -> String {
    match value {
        Value::Text(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn load_history(rl: &mut DefaultEditor, path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = rl.load_history(path) {
        tracing::warn!("could not load history from {}: {}", path.display(), e);
    }
}

fn save_history(rl: &mut DefaultEditor, path: &Path) {
    if let Err(e) = rl.save_history(path) {
        tracing::warn!("could not save history to {}: {}", path.display(), e);
    }
}
