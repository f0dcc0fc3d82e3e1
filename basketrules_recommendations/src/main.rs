use anyhow::Context;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use basketrules_recommendations::app_config::Settings;
use basketrules_recommendations::pipeline::Pipeline;

fn init_telemetry() -> anyhow::Result<()> {
    let app_name = "basketrules";

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Structured logs go to stderr, reports are written to files
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stderr);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")
}

fn main() -> anyhow::Result<()> {
    init_telemetry()?;

    let settings = Settings::load().context("Failed to load settings")?;
    let summary = Pipeline::new(settings).run()?;

    tracing::info!(
        transactions = summary.transactions,
        skipped_lines = summary.skipped_lines,
        frequent_itemsets = summary.frequent_itemsets,
        rules = summary.rules,
        customers_with_recommendations = summary.customers_with_recommendations,
        "Done"
    );
    Ok(())
}
