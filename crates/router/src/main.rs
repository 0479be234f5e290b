//! Bidroute Binary
//!
//! Dry-run routing of one OpenRTB request against an empty in-memory
//! performance store. Prints the routing decision as JSON.

use anyhow::Context;
use bidroute_classifier::BidRequest;
use bidroute_clock::SystemClock;
use bidroute_performance::InMemoryPerformanceStore;
use bidroute_router::{BidRouter, RouterSources, load_config, load_default_config};
use log::{error, info};
use std::sync::Arc;

fn print_help() {
    eprintln!(
        r#"Bidroute - partner selection dry run

USAGE:
    bidroute [OPTIONS] <REQUEST_JSON> <BIDDER>...

OPTIONS:
    --config <PATH>     Load router configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter

EXAMPLES:
    bidroute request.json rubicon appnexus pubmatic openx
    RUST_LOG=debug bidroute --config router.json request.json rubicon sovrn
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    if positional.len() < 2 {
        print_help();
        std::process::exit(1);
    }
    let request_path = positional.remove(0);
    let candidates = positional;

    let config = match &config_path {
        Some(path) => {
            info!("[ROUTER] Loading config from {}", path);
            load_config(path).with_context(|| format!("loading {}", path))?
        }
        None => load_default_config().context("loading embedded config")?,
    };

    let raw = std::fs::read_to_string(&request_path)
        .with_context(|| format!("reading {}", request_path))?;
    let request = BidRequest::from_json_lossy(&raw);

    let clock = Arc::new(SystemClock::new());
    let store = Arc::new(InMemoryPerformanceStore::new(clock.clone()));
    let router = match BidRouter::new(config, clock, RouterSources::in_memory(store)) {
        Ok(router) => router,
        Err(e) => {
            error!("[ROUTER] Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let decision = router.route(&request, &candidates).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
