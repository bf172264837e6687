//! Options Analytics Binary
//!
//! Loads a chain snapshot, runs the configured analytics and prints a JSON
//! report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin options-analytics -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `OPTIONS_ANALYTICS_CONFIG`: config path when no argument is given
//!   (default: config.yaml)
//! - `RUST_LOG`: log filter; overrides `observability.logging.level`

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use options_analytics::OptionsChain;
use options_analytics::config::load_config;
use options_analytics::export::{export_json, read_records};
use options_analytics::report::build_report;
use options_analytics::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("OPTIONS_ANALYTICS_CONFIG").ok())
        .unwrap_or_else(|| "config.yaml".to_string());

    let config = load_config(Some(&config_path))?;
    init_tracing(&config.observability.logging)?;
    let analytics = &config.analytics;

    tracing::info!(config = %config_path, chain = %analytics.chain_path, "Starting options analytics");

    let records = read_records(&analytics.chain_path)
        .with_context(|| format!("loading chain snapshot '{}'", analytics.chain_path))?;
    let as_of = analytics.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let mut chain = OptionsChain::from_records_as_of(&records, as_of)?;
    if let Some(symbol) = &analytics.symbol {
        chain = chain.with_symbol(symbol.clone());
    }
    if let Some(price) = analytics.last_price {
        chain.set_last_price(price)?;
    }

    let report = build_report(&chain, analytics)?;
    export_json(&report, analytics.output_path.as_deref().map(Path::new))
        .context("writing report")?;

    Ok(())
}
