//! chia-tools: administration utilities for a chia installation.

mod cmd;
mod context;

use std::path::PathBuf;

use anyhow::Context;
use chia_tools_config::{resolve_chia_root, Settings};
use chia_tools_utils::{init_logging, LogFormat};
use clap::Parser;

use crate::cmd::coins::CoinsAction;
use crate::cmd::config::ConfigAction;
use crate::cmd::data::DataAction;
use crate::cmd::debug::DebugArgs;
use crate::cmd::network::NetworkAction;
use crate::context::CommandContext;

#[derive(Parser)]
#[command(
    name = "chia-tools",
    version,
    about = "Utilities for administering a chia installation"
)]
struct Cli {
    /// Chia root directory. Defaults to `~/.chia/mainnet`.
    #[arg(long, env = "CHIA_ROOT", global = true)]
    chia_root: Option<PathBuf>,

    /// Path to config.yaml. Defaults to `<chia root>/config/config.yaml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, env = "CHIA_TOOLS_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CHIA_TOOLS_LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,

    /// Path to a TOML settings file. File values are the base; flags and
    /// env vars override them.
    #[arg(long, env = "CHIA_TOOLS_SETTINGS", global = true)]
    settings: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, global = true)]
    assume_yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Edit config.yaml and manage trusted peers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Switch and inspect networks.
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },
    /// Print a support report.
    Debug(DebugArgs),
    /// Wallet coin management.
    Coins {
        #[command(subcommand)]
        action: CoinsAction,
    },
    /// Data layer utilities.
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
}

/// Settings from the file (if any) with flag and env overrides applied.
fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::from_toml_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        settings.log_format = format;
    }
    Ok(settings)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    init_logging(settings.log_format, &settings.log_level);

    let chia_root = resolve_chia_root(cli.chia_root.as_deref())?;
    tracing::debug!(chia_root = %chia_root.display(), "resolved chia root");

    let mut ctx = CommandContext::new(chia_root, cli.config, settings);
    ctx.confirm.assume_yes = cli.assume_yes;

    match cli.command {
        Command::Config { action } => cmd::config::run(&ctx, action).await,
        Command::Network { action } => cmd::network::run(&ctx, action).await,
        Command::Debug(args) => cmd::debug::run(&ctx, args).await,
        Command::Coins { action } => cmd::coins::run(&ctx, action).await,
        Command::Data { action } => cmd::data::run(&ctx, action).await,
    }
}
