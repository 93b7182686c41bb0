//! Pantry CLI - resolve OCR lines read from stdin.
//!
//! Usage: `pantry [config.yaml] < lines.txt`
//!
//! Each input line is scanned against the vocabulary; newly matched
//! candidates are resolved and printed as one JSON object per line. Logs go
//! to stderr (`RUST_LOG` filter, `PANTRY_LOG_FORMAT=json` for JSON output).

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use pantry::{CountingMetrics, Pantry, PantryBuilder, PantryConfig, RawToken, ScanSession};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if std::env::var("PANTRY_LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config() -> anyhow::Result<PantryConfig> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => PantryConfig::from_file(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PantryConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config()?;
    let metrics = Arc::new(CountingMetrics::default());
    let pantry: Pantry = PantryBuilder::from_config(&config)?
        .metrics(metrics.clone())
        .build()?;

    let mut session = ScanSession::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (line_index, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        let matches = pantry.scan_line(&RawToken::new(line.as_str(), line_index), &mut session);
        if matches.is_empty() {
            continue;
        }
        let result = pantry.resolve_matches(&matches).await;
        let record = json!({
            "line": line_index,
            "matches": matches,
            "ingredients": result.ingredients,
            "dropped": result.dropped,
        });
        writeln!(out, "{record}")?;
    }
    out.flush()?;

    tracing::info!(
        lines = session.lines_processed(),
        batches = metrics.batches(),
        resolved = metrics.resolved(),
        dropped = metrics.dropped(),
        duplicates = metrics.duplicates(),
        dropped_terms = ?metrics.dropped_terms(),
        "scan_summary"
    );
    Ok(())
}
