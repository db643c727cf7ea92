//! Operator CLI that resolves a single reel or post link.
//!
//! Builds the same strategy chain as the server from environment
//! configuration, so it is the quickest way to check whether upstream
//! markup changes broke a strategy.
//!
//! # Usage
//!
//! ```bash
//! # Resolve with the configured chain
//! cargo run --bin resolve -- https://www.instagram.com/reel/C1a2B3c4D5e/
//!
//! # Try only the scraper with a short deadline
//! cargo run --bin resolve -- https://www.instagram.com/p/C1a2B3c4D5e/ \
//!     --strategies scrape --timeout 5
//! ```
//!
//! Exits with status 0 when the link resolved and 1 otherwise.

use reel_resolver::config::Config;
use reel_resolver::domain::{Attempt, Resolution, StrategyOutcome};
use reel_resolver::server::build_resolver;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Resolve a reel or post link to its direct media URL.
#[derive(Parser)]
#[command(name = "resolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reel or post link
    url: String,

    /// Per-strategy deadline in seconds (overrides STRATEGY_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Comma-separated strategy order (overrides STRATEGY_ORDER)
    #[arg(short, long, value_delimiter = ',')]
    strategies: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to read configuration")?;
    if let Some(timeout) = cli.timeout {
        config.strategy_timeout_secs = timeout;
    }
    if let Some(strategies) = cli.strategies {
        config.strategy_order = strategies
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    config.validate()?;

    let resolver = build_resolver(&config)?;

    println!("{} {}", "🔎 Resolving".bright_blue().bold(), cli.url.cyan());
    println!(
        "  Chain: {} ({}s per attempt)",
        resolver.strategy_names().join(" -> ").bright_white(),
        config.strategy_timeout_secs
    );
    println!();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    match resolver.resolve_with_cancellation(&cli.url, cancel).await {
        Ok(Resolution::Resolved {
            asset_url,
            strategy,
        }) => {
            println!(
                "{} via {}",
                "✅ Resolved".green().bold(),
                strategy.bright_cyan()
            );
            println!("  {}", asset_url.bright_yellow());
            Ok(ExitCode::SUCCESS)
        }
        Ok(Resolution::Exhausted { attempts }) => {
            println!("{}", "❌ No strategy found a media URL".red().bold());
            println!();
            print_attempts(&attempts);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            println!("{} {}", "❌".red(), e.to_string().red());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints one row per attempt.
///
/// ```text
///   #   Strategy           Outcome     Reason
///   ───────────────────────────────────────────────────────────
///   1   structured_query   failed      upstream returned HTTP 500
///   2   scrape             not_found
/// ```
fn print_attempts(attempts: &[Attempt]) {
    println!(
        "  {:<3} {:<18} {:<11} {}",
        "#".bright_white().bold(),
        "Strategy".bright_white().bold(),
        "Outcome".bright_white().bold(),
        "Reason".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for (index, attempt) in attempts.iter().enumerate() {
        let (outcome, reason) = match &attempt.outcome {
            StrategyOutcome::Failed(failure) => {
                (attempt.outcome.kind().red(), failure.to_string())
            }
            other => (other.kind().yellow(), String::new()),
        };

        println!(
            "  {:<3} {:<18} {:<11} {}",
            (index + 1).to_string().bright_black(),
            attempt.strategy.cyan(),
            outcome,
            reason.bright_black()
        );
    }
    println!();
}
