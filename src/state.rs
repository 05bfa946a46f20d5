use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::SeriesColors;
use crate::config::DashConfig;
use crate::data::filter::{validate_countries, RegionFilter, Selection};
use crate::data::model::EmissionsDataset;
use crate::data::views::DashboardViews;
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashConfig,

    /// Loaded dataset (None until a file is loaded). Replaced, never mutated.
    pub dataset: Option<Arc<EmissionsDataset>>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current year/region choice.
    pub selection: Option<Selection>,

    /// Countries in the comparison chart, in the order they were picked.
    pub comparison: Vec<String>,

    /// Text typed into the comparison picker's search box.
    pub country_search: String,

    /// Views for the current selection (cached until a selection changes).
    pub views: Option<DashboardViews>,

    pub series_colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashConfig) -> Self {
        Self {
            config,
            dataset: None,
            source: None,
            selection: None,
            comparison: Vec::new(),
            country_search: String::new(),
            views: None,
            series_colors: SeriesColors::default(),
            status_message: None,
        }
    }

    /// Load a file and, on success, replace the current dataset.
    /// On failure the previous dataset stays and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset selections to their defaults.
    pub fn set_dataset(&mut self, dataset: EmissionsDataset, source: PathBuf) {
        self.comparison = self
            .config
            .default_countries
            .iter()
            .filter(|c| {
                let present = dataset.has_country(c);
                if !present {
                    log::warn!("Default comparison country '{c}' is not in the dataset");
                }
                present
            })
            .cloned()
            .collect();
        self.country_search.clear();
        self.series_colors = SeriesColors::new(&self.comparison);

        self.status_message = None;
        self.selection = match Selection::default_for(&dataset) {
            Ok(sel) => Some(sel),
            Err(e) => {
                log::warn!("{e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        };

        self.dataset = Some(Arc::new(dataset));
        self.source = Some(source);
        self.recompute();
    }

    pub fn select_year(&mut self, year: i32) {
        let region = self
            .selection
            .as_ref()
            .map(|s| s.region().clone())
            .unwrap_or_default();
        self.apply_selection(year, region);
    }

    pub fn select_region(&mut self, region: RegionFilter) {
        let Some(year) = self.selection.as_ref().map(Selection::year) else {
            return;
        };
        self.apply_selection(year, region);
    }

    fn apply_selection(&mut self, year: i32, region: RegionFilter) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match Selection::new(ds, year, region) {
            Ok(sel) => {
                if self.selection.as_ref() != Some(&sel) {
                    self.selection = Some(sel);
                    self.recompute();
                }
            }
            Err(e) => self.reject(e),
        }
    }

    /// Add the country to the comparison if absent, remove it otherwise.
    pub fn toggle_country(&mut self, country: &str) {
        let mut picked = self.comparison.clone();
        if let Some(pos) = picked.iter().position(|c| c == country) {
            picked.remove(pos);
        } else {
            picked.push(country.to_string());
        }
        self.set_comparison(picked);
    }

    pub fn clear_comparison(&mut self) {
        self.set_comparison(Vec::new());
    }

    fn set_comparison(&mut self, countries: Vec<String>) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match validate_countries(ds, &countries) {
            Ok(valid) => {
                self.comparison = valid;
                self.series_colors = SeriesColors::new(&self.comparison);
                self.recompute();
            }
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, e: SelectionError) {
        log::warn!("Rejected selection: {e}");
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Loaded record count and, once views exist, how many match the filters.
    pub fn record_counts(&self) -> Option<(usize, Option<usize>)> {
        let ds = self.dataset.as_ref()?;
        Some((ds.len(), self.views.as_ref().map(|v| v.rows.len())))
    }

    /// Recompute every view from the dataset and current selections.
    pub fn recompute(&mut self) {
        self.views = match (&self.dataset, &self.selection) {
            (Some(ds), Some(sel)) => Some(DashboardViews::compute(
                ds,
                sel,
                &self.comparison,
                self.config.view_params(),
            )),
            _ => None,
        };
    }
}
