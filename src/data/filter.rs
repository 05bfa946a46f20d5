use std::fmt;

use super::model::{EmissionsDataset, EmissionsRecord};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Selection types: validated user choices
// ---------------------------------------------------------------------------

/// Region control value. `All` is the "no region predicate" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    pub fn matches(&self, record: &EmissionsRecord) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => record.region == *region,
        }
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => write!(f, "All"),
            RegionFilter::Only(region) => write!(f, "{region}"),
        }
    }
}

/// A year/region pair checked against the dataset it will be applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    year: i32,
    region: RegionFilter,
}

impl Selection {
    /// Validate a year and region against the dataset's known values.
    pub fn new(
        dataset: &EmissionsDataset,
        year: i32,
        region: RegionFilter,
    ) -> Result<Self, SelectionError> {
        if dataset.is_empty() {
            return Err(SelectionError::EmptyDataset);
        }
        if !dataset.has_year(year) {
            return Err(SelectionError::UnknownYear(year));
        }
        if let RegionFilter::Only(name) = &region {
            if !dataset.has_region(name) {
                return Err(SelectionError::UnknownRegion(name.clone()));
            }
        }
        Ok(Self { year, region })
    }

    /// The first option of each control: newest year, all regions.
    pub fn default_for(dataset: &EmissionsDataset) -> Result<Self, SelectionError> {
        let year = *dataset.years.first().ok_or(SelectionError::EmptyDataset)?;
        Self::new(dataset, year, RegionFilter::All)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn region(&self) -> &RegionFilter {
        &self.region
    }

    pub fn matches(&self, record: &EmissionsRecord) -> bool {
        record.year == self.year && self.region.matches(record)
    }
}

/// Validate a list of comparison countries, keeping the caller's order.
pub fn validate_countries(
    dataset: &EmissionsDataset,
    countries: &[String],
) -> Result<Vec<String>, SelectionError> {
    countries
        .iter()
        .map(|c| {
            if dataset.has_country(c) {
                Ok(c.clone())
            } else {
                Err(SelectionError::UnknownCountry(c.clone()))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that match the selection, in dataset order.
/// No match yields an empty vector.
pub fn filtered_indices(dataset: &EmissionsDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
