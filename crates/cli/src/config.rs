//! Settings resolution: flag > environment > config file > default.
//!
//! Flags and environment variables are merged by clap (`env` attr on
//! the reconcile/lookup arguments); this module loads the optional TOML
//! config file and folds everything into the explicit structs the
//! engine takes at call time.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use partsync_core::config::{
    ReconcileConfig, DEFAULT_CONCURRENCY, DEFAULT_WEIGHT_TOLERANCE_PCT,
};

use crate::exit_codes::EXIT_USAGE;
use crate::CliError;

const CONFIG_FILENAME: &str = "partsync.toml";

/// Optional config file contents. Every field is optional; anything
/// unset falls through to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub concurrency: Option<usize>,
    pub weight_tolerance_pct: Option<f64>,
}

impl FileConfig {
    /// Load the config file: an explicit `--config` path must exist and
    /// parse; otherwise `./partsync.toml`, then the user config dir,
    /// are tried and silently skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let local = PathBuf::from(CONFIG_FILENAME);
        if local.exists() {
            return Self::read(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("partsync").join(CONFIG_FILENAME);
            if user.exists() {
                return Self::read(&user);
            }
        }

        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::io(format!("cannot read config {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|e| CliError {
            code: EXIT_USAGE,
            message: format!("invalid config {}: {e}", path.display()),
            hint: None,
        })
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug)]
pub struct Settings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub reconcile: ReconcileConfig,
}

/// Fold flag/env values (already merged by clap) with the config file
/// and defaults, then validate.
pub fn resolve(
    base_url: Option<String>,
    api_token: Option<String>,
    concurrency: Option<usize>,
    weight_tolerance_pct: Option<f64>,
    file: &FileConfig,
) -> Result<Settings, CliError> {
    let base_url = base_url
        .or_else(|| file.base_url.clone())
        .ok_or_else(|| {
            CliError::args("no product data service configured").with_hint(
                "pass --base-url, set PARTSYNC_BASE_URL, or add base_url to partsync.toml",
            )
        })?;

    let reconcile = ReconcileConfig {
        concurrency: concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY),
        weight_tolerance_pct: weight_tolerance_pct
            .or(file.weight_tolerance_pct)
            .unwrap_or(DEFAULT_WEIGHT_TOLERANCE_PCT),
    };
    reconcile
        .validate()
        .map_err(|e| CliError::args(e.to_string()))?;

    Ok(Settings {
        base_url,
        api_token: api_token
            .or_else(|| file.api_token.clone())
            .filter(|t| !t.trim().is_empty()),
        reconcile,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
