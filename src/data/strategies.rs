//! proptest strategies for generated datasets.

use proptest::prelude::*;

use super::model::{EmissionsDataset, EmissionsRecord};

const COUNTRIES: &[&str] = &["China", "India", "Chile", "Kenya", "Norway", "Peru"];
const REGIONS: &[&str] = &["Asia", "Americas", "Africa", "Europe"];

/// Per-capita values mix finite numbers with missing (NaN) and infinite cells.
fn arb_per_capita() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.0..40.0f64,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

pub fn arb_record() -> impl Strategy<Value = EmissionsRecord> {
    (
        prop::sample::select(COUNTRIES),
        prop::sample::select(REGIONS),
        2000i32..2006,
        0.0..1.0e6f64,
        arb_per_capita(),
    )
        .prop_map(|(country, region, year, kilotons, per_capita)| {
            EmissionsRecord::new(country, region, year, kilotons, per_capita)
        })
}

pub fn arb_dataset() -> impl Strategy<Value = EmissionsDataset> {
    prop::collection::vec(arb_record(), 1..60).prop_map(EmissionsDataset::from_records)
}

/// Loose equality for sums accumulated in a different order.
pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
