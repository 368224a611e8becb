//! User configuration (`config.toml` in the platform config directory).
//!
//! ```toml
//! log_level = "info"
//! combine_separator = " "
//! percent_skip = 2
//! header_sheet = "Data"
//! ```
//!
//! Problems with the file never stop the CLI: they are reported as warnings
//! and the defaults are used instead.

use directories::ProjectDirs;
use exgrid_core::OperationDefaults;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,
    pub combine_separator: String,
    pub percent_skip: usize,
    /// Sheet used when neither `--sheet` nor a recipe names one
    pub header_sheet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = OperationDefaults::default();
        Config {
            log_level: None,
            combine_separator: defaults.combine_separator,
            percent_skip: defaults.percent_skip,
            header_sheet: None,
        }
    }
}

impl Config {
    pub fn operation_defaults(&self) -> OperationDefaults {
        OperationDefaults {
            combine_separator: self.combine_separator.clone(),
            percent_skip: self.percent_skip,
        }
    }
}

/// Load the config from `config_file`, or from the user config directory.
/// Returns the config plus any warnings to show the user.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(err);
            (Config::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(format!(
            "Ignoring {}: config file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<Config>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "exgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
