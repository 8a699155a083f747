use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::{ProjectDirs, UserDirs};

pub mod geometry;
pub mod id;
pub mod idle;
pub mod subscriptions;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}

/// `$XDG_CONFIG_HOME/thumbstrip/config.kdl`, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = ProjectDirs::from("", "", "thumbstrip")?
        .config_dir()
        .to_owned();
    path.push("config.kdl");
    Some(path)
}

pub fn expand_home(path: &Path) -> anyhow::Result<Option<PathBuf>> {
    if let Ok(rest) = path.strip_prefix("~") {
        let dirs = UserDirs::new().context("error retrieving home directory")?;
        Ok(Some([dirs.home_dir(), rest].iter().collect()))
    } else {
        Ok(None)
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
