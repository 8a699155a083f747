#[macro_use]
extern crate tracing;

use std::env;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use thumbstrip::cli::{Cli, Sub};
use thumbstrip::layout::Options;
use thumbstrip::utils::{default_config_path, expand_home};
use thumbstrip_config::Config;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "thumbstrip=debug,thumbstrip_config=debug,info";

fn main() -> anyhow::Result<()> {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    let _client = tracy_client::Client::start();

    match cli.subcommand {
        Sub::Layout(args) => {
            let config = load_config(args.config.clone())?;
            let options = Options::from_config(&config);
            println!("{}", thumbstrip::cli::layout(&args, &options)?);
        }
        Sub::Validate { config } => {
            load_config(config)?;
            info!("config is valid");
        }
    }

    Ok(())
}

/// Loads the config from the explicit path, `$THUMBSTRIP_CONFIG` or the default location.
///
/// Only a missing file at the default location falls back to the built-in defaults.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.or_else(|| env::var_os("THUMBSTRIP_CONFIG").map(PathBuf::from));

    let result = match path {
        Some(path) => {
            let path = expand_home(&path)?.unwrap_or(path);
            Config::load(&path)
        }
        None => match default_config_path() {
            Some(path) => Config::load_or_default(&path),
            None => {
                warn!("error retrieving home directory, using the default config");
                Ok(Config::default())
            }
        },
    };

    // Debug formatting renders the full miette diagnostic.
    result.map_err(|err| anyhow!("{err:?}"))
}
