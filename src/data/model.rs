use std::collections::{BTreeSet, HashSet};

// ---------------------------------------------------------------------------
// Column names as they appear in persisted tables
// ---------------------------------------------------------------------------

pub const COL_COUNTRY: &str = "Country";
pub const COL_REGION: &str = "Region";
pub const COL_YEAR: &str = "Year";
pub const COL_KILOTONS: &str = "Kilotons of Co2";
pub const COL_PER_CAPITA: &str = "Metric Tons Per Capita";

// ---------------------------------------------------------------------------
// EmissionsRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single country/year observation.
///
/// Numeric cells that were missing in the input are stored as `NaN`;
/// aggregations skip them.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionsRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    /// Kilotons of CO2.
    pub kilotons: f64,
    /// Metric tons of CO2 per capita.
    pub per_capita: f64,
}

impl EmissionsRecord {
    pub fn new(
        country: impl Into<String>,
        region: impl Into<String>,
        year: i32,
        kilotons: f64,
        per_capita: f64,
    ) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
            year,
            kilotons,
            per_capita,
        }
    }
}

// ---------------------------------------------------------------------------
// EmissionsDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed option lists for the
/// selection controls. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct EmissionsDataset {
    /// All records, in file order.
    pub records: Vec<EmissionsRecord>,
    /// Distinct years, newest first.
    pub years: Vec<i32>,
    /// Distinct regions in first-encounter order.
    pub regions: Vec<String>,
    /// Distinct countries in first-encounter order.
    pub countries: Vec<String>,
}

impl EmissionsDataset {
    /// Build option indices from the loaded records.
    pub fn from_records(records: Vec<EmissionsRecord>) -> Self {
        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut regions = Vec::new();
        let mut countries = Vec::new();
        {
            let mut seen_regions: HashSet<&str> = HashSet::new();
            let mut seen_countries: HashSet<&str> = HashSet::new();

            for rec in &records {
                years.insert(rec.year);
                if seen_regions.insert(&rec.region) {
                    regions.push(rec.region.clone());
                }
                if seen_countries.insert(&rec.country) {
                    countries.push(rec.country.clone());
                }
            }
        }

        EmissionsDataset {
            years: years.into_iter().rev().collect(),
            regions,
            countries,
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }

    /// Borrow the records at the given row indices.
    pub fn rows<'a>(&'a self, indices: &[usize]) -> Vec<&'a EmissionsRecord> {
        indices
            .iter()
            .filter_map(|&i| self.records.get(i))
            .collect()
    }
}
