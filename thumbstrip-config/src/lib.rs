#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use miette::{Context, IntoDiagnostic};

pub mod debug;
pub mod thumbnails;
pub mod utils;

pub use crate::debug::DebugConfig;
pub use crate::thumbnails::{Indicator, Thumbnails};
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub thumbnails: Thumbnails,
    #[knuffel(child, default)]
    pub debug: DebugConfig,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }

    /// Loads the config at `path`, or the built-in defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> miette::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("no config at {path:?}, using defaults");
            Ok(Self::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}
