//! # wgtag Binary
//!
//! Parses a WireGuard configuration tree once and prints the extracted peer
//! tags as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Scan the default root (/etc/wireguard)
//! wgtag
//!
//! # Scan another root, one device only
//! wgtag --root ./wireguard --device wg0
//!
//! # Use a config file, verbose JSON logs
//! wgtag --config /etc/wgtag/config.toml -v --json
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;
use wgtag::ConfigParser;
use wgtag_common::config::{load_config, WgtagConfig};

/// wgtag - WireGuard peer tag extractor
#[derive(Parser, Debug)]
#[command(name = "wgtag")]
#[command(version)]
#[command(about = "Extract peer tags from WireGuard configuration files")]
#[command(long_about = None)]
struct Args {
    /// Path to a wgtag TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// WireGuard configuration root (overrides parser.root).
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Print only this device's peers.
    #[arg(short, long)]
    device: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("wgtag failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => load_config(path),
        None => Ok(WgtagConfig::default()),
    };

    // Logging comes up before the config error is reported.
    let level = match &loaded {
        Ok(config) => config.shared.log_level.as_tracing_level(),
        Err(_) => Level::INFO,
    };
    setup_tracing(&args, level);

    let mut config = loaded?;
    if let Some(root) = args.root.clone() {
        config.parser.root = root;
    }

    info!(
        "{} v{} scanning {:?}",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION"),
        config.parser.root
    );

    let mut parser = ConfigParser::new(config.parser)?;
    parser.parse()?;
    for (device, peers) in parser.tags().iter() {
        debug!("{}: {} tagged peers", device, peers.len());
    }

    let output = match &args.device {
        Some(device) => {
            let peers = parser
                .tags()
                .device(device)
                .ok_or_else(|| format!("device {device:?} not found under {:?}", parser.root()))?;
            serde_json::to_string_pretty(peers)?
        }
        None => serde_json::to_string_pretty(parser.tags())?,
    };
    println!("{output}");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, default_level: Level) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        default_level
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout carries only the JSON result.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
