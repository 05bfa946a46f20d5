use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::views::ViewParams;

/// Name of the optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "carbon-dash.json";

/// Dashboard settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Dataset opened at startup if it exists.
    pub dataset_path: Option<PathBuf>,
    pub top_n: usize,
    pub histogram_bins: usize,
    /// Countries preselected in the comparison chart.
    pub default_countries: Vec<String>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            dataset_path: Some(PathBuf::from("carbon_data.parquet")),
            top_n: 10,
            histogram_bins: 20,
            default_countries: vec![
                "China".to_string(),
                "United States".to_string(),
                "India".to_string(),
            ],
        }
    }
}

impl DashConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load `carbon-dash.json` from `dir` if present, otherwise defaults.
    /// A malformed file is logged and ignored.
    pub fn discover(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Using settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            top_n: self.top_n,
            histogram_bins: self.histogram_bins,
        }
    }
}
