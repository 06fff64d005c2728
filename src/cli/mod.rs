//! CLI subcommand definitions.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `start` (default) -- run the HTTP service
//! - `config show|path` -- inspect configuration
//! - `version` -- print version info

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vidgrab: YouTube download HTTP service backed by yt-dlp.
#[derive(Parser, Debug)]
#[command(
    name = "vidgrab",
    version = env!("CARGO_PKG_VERSION"),
    about = "HTTP service that fetches YouTube metadata and downloads media via yt-dlp"
)]
pub struct Cli {
    /// Path to the configuration file (default: platform config dir).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service (default when no subcommand is given).
    Start,

    /// Inspect configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the fully loaded configuration as JSON.
    Show,

    /// Print the configuration file path.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_start() {
        let cli = Cli::parse_from(["vidgrab"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["vidgrab", "config", "show", "--config", "/tmp/c.json5"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json5")));
    }
}
