//! Configuration loading from deadres.toml.
//!
//! Every key is optional; unset keys fall back to builder defaults and
//! command-line flags override whatever is set here.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::category::CategorySet;
use crate::error::DeadresError;

/// Config file name looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "deadres.toml";

/// Main configuration structure for deadres.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DeadresConfig {
    /// Path to the generated R.java, relative to the project root.
    pub declarations: Option<PathBuf>,
    /// Program source root (default `src`).
    pub source_dir: Option<PathBuf>,
    /// Resource markup root (default `res`).
    pub resource_dir: Option<PathBuf>,
    /// Application manifest path.
    pub manifest: Option<PathBuf>,
    /// Program source file suffix (default `.java`).
    pub source_suffix: Option<String>,
    /// Markup file suffix (default `.xml`).
    pub markup_suffix: Option<String>,
    /// Project packaging kind; only `apk` is analysed.
    pub packaging: Option<String>,
    /// Recognized resource categories, in markup prefix order.
    pub categories: Option<CategorySet>,
    /// Regular expressions over `R.<category>.<name>` to leave out of the report.
    pub ignore: Option<Vec<String>>,
    /// Extra directory names pruned during scanning.
    pub exclude_dirs: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl DeadresConfig {
    /// True when `[output] format = "json"`.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from deadres.toml if it exists.
///
/// An unreadable or invalid file is a [`DeadresError::Config`].
pub fn load_config(root: &Path) -> Result<Option<DeadresConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| DeadresError::config(&path, format!("failed to read: {}", e)))?;
    let cfg = toml::from_str(&content)
        .map_err(|e| DeadresError::config(&path, format!("invalid configuration: {}", e)))?;
    Ok(Some(cfg))
}
