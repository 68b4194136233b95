//! Sheet configuration loaded from TOML.
//!
//! ```toml
//! [limits]
//! max_rows = 1000
//! max_cols = 26
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SheetError};
use tabula_engine::Position;

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;
const CONFIG_FILE_NAME: &str = "sheet.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    pub limits: Limits,
}

/// Addressable area of a sheet. Values above the codec bounds are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_rows: i32,
    pub max_cols: i32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_rows: Position::MAX_ROWS,
            max_cols: Position::MAX_COLS,
        }
    }
}

impl Limits {
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_valid()
            && pos.row < self.max_rows.min(Position::MAX_ROWS)
            && pos.col < self.max_cols.min(Position::MAX_COLS)
    }
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<SheetConfig> {
        toml::from_str::<SheetConfig>(content).map_err(|e| SheetError::Config(e.to_string()))
    }

    /// Load configuration from `path`, or from the per-user config dir when
    /// no path is given. Problems are reported as warnings and defaults are
    /// used in their place.
    pub fn load(path: Option<&Path>) -> (SheetConfig, Vec<String>) {
        let mut warnings = Vec::new();
        let config_path = path.map(Path::to_path_buf).or_else(user_config_path);

        let Some(path_buf) = config_path else {
            return (SheetConfig::default(), warnings);
        };
        if !path_buf.exists() {
            if path.is_some() {
                warnings.push(format!("Config file not found: {}", path_buf.display()));
            }
            return (SheetConfig::default(), warnings);
        }

        let config = match read_config(&path_buf) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(format!("Failed to load {}: {}", path_buf.display(), err));
                SheetConfig::default()
            }
        };
        (config, warnings)
    }
}

fn read_config(path: &Path) -> Result<SheetConfig> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(SheetError::Config(format!(
            "file too large ({} bytes, max {})",
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        )));
    }
    let content = std::fs::read_to_string(path)?;
    SheetConfig::from_toml_str(&content)
}

fn user_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "tabula")?;
    let mut path = dirs.config_dir().to_path_buf();
    path.push(CONFIG_FILE_NAME);
    Some(path)
}
