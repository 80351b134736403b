pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::Level;
use xfinds_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "xfinds",
    about = "xfinds offer comparison CLI",
    long_about = "Rank agent offers, inspect cart groups and suggest cheaper agent \
                  assignments from a catalog snapshot.",
    after_help = "Examples:\n  xfinds rank --product retro-sneaker\n  \
                  xfinds suggest --cart cart.json\n  xfinds config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding agents.json and products.json")]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to an xfinds.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level: trace, debug, info, warn or error")]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        value_parser = parse_log_format,
        help = "Log format: compact, pretty or json"
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank every agent offer for a product")]
    Rank {
        #[arg(long, help = "Product slug or id")]
        product: String,
    },
    #[command(about = "Show the score breakdown of one agent's offer for a product")]
    Score {
        #[arg(long, help = "Product slug or id")]
        product: String,
        #[arg(long, help = "Agent id")]
        agent: String,
    },
    #[command(about = "Group a saved cart by agent with per-agent and grand totals")]
    Cart {
        #[arg(long, help = "Cart JSON file, defaults to catalog.cart_path")]
        cart: Option<PathBuf>,
    },
    #[command(about = "Suggest agent switches that lower the cart total")]
    Suggest {
        #[arg(long, help = "Cart JSON file, defaults to catalog.cart_path")]
        cart: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let cart_path = match &cli.command {
        Command::Cart { cart } | Command::Suggest { cart } => cart.clone(),
        _ => None,
    };
    let options = LoadOptions {
        config_path: cli.config,
        require_file: false,
        overrides: ConfigOverrides {
            data_dir: cli.data_dir,
            cart_path,
            log_level: cli.log_level,
            log_format: cli.log_format,
        },
    };

    // Validation failures are reported by the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("{error:#}");
        }
    }

    let result = match cli.command {
        Command::Rank { product } => commands::rank::run(&options, &product),
        Command::Score { product, agent } => commands::score::run(&options, &product, &agent),
        Command::Cart { .. } => commands::cart::run(&options),
        Command::Suggest { .. } => commands::suggest::run(&options),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|error| error.to_string())
}

/// Logs go to stderr so stdout carries only the command envelope.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let initialized = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    initialized.map_err(|error| anyhow!("failed to initialize logging: {error}"))
}
