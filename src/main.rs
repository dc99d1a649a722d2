//! TTL Cache Shell - drive a bounded in-memory cache from stdin
//!
//! Reads one command per line and writes one JSON response per line.
//! Cache policy comes from `TTL_CACHE_*` environment variables.

use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::shell::Shell;
use ttl_cache::CacheConfig;

/// Main entry point for the cache shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber, logging to stderr
/// 2. Load configuration from environment variables
/// 3. Build the cache and run commands until end of input or `quit`
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CacheConfig::from_env().context("failed to load cache configuration")?;
    info!(
        max = ?config.max,
        ttl = ?config.ttl,
        update_age_on_get = config.update_age_on_get,
        no_update_ttl = config.no_update_ttl,
        no_dispose_on_set = config.no_dispose_on_set,
        "configuration loaded"
    );

    let mut shell = Shell::new(config).context("failed to build cache")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell.run(stdin.lock(), stdout.lock())?;

    info!("shell exited");
    Ok(())
}
