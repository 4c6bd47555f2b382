//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rekl_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "rekl")]
#[command(version)]
#[command(about = "Terminal console for sending CW")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Key an audio sidetone instead of a serial port
    #[arg(long, conflicts_with = "port")]
    beep: bool,

    /// Serial device whose DTR line keys the transmitter
    #[arg(long, value_name = "PATH")]
    port: Option<PathBuf>,

    /// Config file to load (default: ${REKL_HOME}/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::paths::config_path);

    // default to the console
    let Some(command) = cli.command else {
        return commands::console::run(&commands::console::ConsoleOptions {
            config_path,
            beep: cli.beep,
            port: cli.port,
        });
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
        },
    }
}
