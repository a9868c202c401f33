//! post-sync entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; config errors are reported by the command itself
    let rust_log = std::env::var("RUST_LOG").ok();
    let configured = AppConfig::load(cli.config.as_deref())
        .ok()
        .map(|config| config.general.log_level);
    let directive = resolve_log_filter(
        cli.log_level.as_deref(),
        rust_log.as_deref(),
        configured.as_deref(),
    );
    init_logging(directive)?;

    // Execute command
    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.config).await,
        Commands::Users(args) => commands::users::execute(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args, cli.config).await,
        Commands::Doctor(args) => commands::doctor::execute(args, cli.config).await,
    }
}

/// Pick the filter directive: `--log-level`, then `RUST_LOG`, then config, then `info`
fn resolve_log_filter<'a>(
    flag: Option<&'a str>,
    rust_log: Option<&'a str>,
    configured: Option<&'a str>,
) -> &'a str {
    [flag, rust_log, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or("info")
}

fn init_logging(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_everything() {
        assert_eq!(
            resolve_log_filter(Some("trace"), Some("warn"), Some("debug")),
            "trace"
        );
    }

    #[test]
    fn test_rust_log_wins_over_config() {
        assert_eq!(resolve_log_filter(None, Some("warn"), Some("debug")), "warn");
    }

    #[test]
    fn test_config_used_without_flag_or_env() {
        assert_eq!(resolve_log_filter(None, None, Some("debug")), "debug");
    }

    #[test]
    fn test_defaults_to_info() {
        assert_eq!(resolve_log_filter(None, None, None), "info");
        assert_eq!(resolve_log_filter(None, Some("  "), None), "info");
    }
}
