pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use storefront_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront terminal shop",
    long_about = "Browse a product catalog, manage a shopping cart, and inspect storefront configuration.",
    after_help = "Examples:\n  storefront shop\n  storefront catalog --json\n  storefront --catalog products.toml doctor"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Read settings from this TOML file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Load products from this TOML file")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, value_name = "SYMBOL", help = "Currency symbol for prices")]
    currency: Option<String>,
    #[arg(long, global = true, value_name = "LEVEL", help = "Log level written to stderr")]
    log_level: Option<String>,
    #[arg(long, global = true, value_name = "FORMAT", help = "Log format: compact, pretty or json")]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive shopping session (default)")]
    Shop,
    #[command(about = "List the products in the catalog")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog loading and page rendering")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl GlobalArgs {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                currency_symbol: self.currency.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

fn init_logging(config: &AppConfig) {
    use storefront_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
    if let Err(error) = installed {
        eprintln!("logging already initialized: {error}");
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.global.load_options();

    // Config errors are reported by the command itself.
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command.unwrap_or(Command::Shop) {
        Command::Shop => match commands::shop::run(options) {
            Ok(_) => commands::CommandResult::plain(0, ""),
            Err(error) => {
                commands::CommandResult::failure("shop", "session", format!("{error:#}"), 1)
            }
        },
        Command::Catalog { json } => commands::catalog::run(options, json),
        Command::Config => commands::CommandResult::plain(0, commands::config::run(options)),
        Command::Doctor { json } => {
            commands::CommandResult::plain(0, commands::doctor::run(options, json))
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
