//! Run configuration.
//!
//! A [`Config`] gathers every tunable of a run. It is read from JSON, and
//! any field left out takes its default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discover::DEFAULT_EXTENSION;
use crate::error::{Error, Result};
use crate::parser::ParseOptions;
use crate::render::{OverlayOptions, TrendOptions};

/// Full configuration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Corpus root, if not given on the command line
    pub input_dir: Option<PathBuf>,

    /// Directory receiving images and tables
    pub output_dir: PathBuf,

    /// Extension of layout records, without the dot
    pub extension: String,

    /// Parsing and validation
    pub parse: ParseOptions,

    /// Overlay rendering
    pub overlay: OverlayOptions,

    /// Trend aggregation, chart and CSV
    pub trends: TrendOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: PathBuf::from("output"),
            extension: DEFAULT_EXTENSION.to_string(),
            parse: ParseOptions::default(),
            overlay: OverlayOptions::default(),
            trends: TrendOptions::default(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Error::InvalidConfig("extension must not be empty".into()));
        }
        if let Some([w, h]) = self.parse.fallback_page_size {
            if !(w > 0.0 && h > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "fallback page size must be positive, got {}x{}",
                    w, h
                )));
            }
        }
        self.overlay.validate()?;
        self.trends.validate()
    }
}
