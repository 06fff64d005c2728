use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use vidgrab::cli::{Cli, Command, ConfigCommand};
use vidgrab::config::{self, AppConfig};
use vidgrab::extractor::{MediaExtractor, YtDlpExtractor};
use vidgrab::logging;
use vidgrab::server::{self, AppState};
use vidgrab::store::DownloadStore;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Command::Start) {
        Command::Start => run_server(config),
        Command::Config(ConfigCommand::Show) => match serde_json::to_string_pretty(&config) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to render config: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Config(ConfigCommand::Path) => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("vidgrab {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}

fn run_server(config: AppConfig) -> ExitCode {
    logging::init(&config.logging);

    let store = match DownloadStore::open(&config.download_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "error: failed to open download directory {}: {e}",
                config.download_dir.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let mut ytdlp = YtDlpExtractor::new(config.ytdlp_bin.as_str(), store.root().to_path_buf());
    if let Some(location) = &config.ffmpeg_location {
        ytdlp = ytdlp.with_ffmpeg_location(location.clone());
    }
    let extractor: Arc<dyn MediaExtractor> = Arc::new(ytdlp);

    let state = AppState {
        config: Arc::new(config),
        store,
        extractor,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server::serve(state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
