//! Descriptive aggregations over emissions records.
//!
//! Every function is pure and works on borrowed records. `NaN` cells are
//! skipped: a sum of nothing is `0.0`, a mean of nothing is `None`. The
//! histogram also drops infinite values, since they have no bucket.

use std::collections::{BTreeMap, HashSet};

use super::model::{EmissionsDataset, EmissionsRecord};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Headline numbers for a subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    /// Sum of kilotons of CO2.
    pub total_emissions: f64,
    /// Mean metric tons per capita; `None` when there is nothing to average.
    pub avg_per_capita: Option<f64>,
    pub distinct_countries: usize,
}

/// Summed kilotons for one group key (a country or a region).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub kilotons: f64,
}

/// One equal-width histogram bucket. `upper` is exclusive except for the
/// last bucket of a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Kilotons per year for one country, ordered by year.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    pub points: Vec<(i32, f64)>,
}

/// Column to group by in [`group_totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKey {
    #[default]
    Region,
    Country,
}

impl GroupKey {
    fn of<'a>(&self, record: &'a EmissionsRecord) -> &'a str {
        match self {
            GroupKey::Region => &record.region,
            GroupKey::Country => &record.country,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

fn nan_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| !v.is_nan()).sum()
}

pub fn summary_stats(subset: &[&EmissionsRecord]) -> SummaryStats {
    let total_emissions = nan_sum(subset.iter().map(|r| r.kilotons));

    let (sum, n) = subset
        .iter()
        .map(|r| r.per_capita)
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    let avg_per_capita = (n > 0).then(|| sum / n as f64);

    let distinct_countries = subset
        .iter()
        .map(|r| r.country.as_str())
        .collect::<HashSet<_>>()
        .len();

    SummaryStats {
        total_emissions,
        avg_per_capita,
        distinct_countries,
    }
}

/// Sum kilotons per key, sorted descending by total. Groups with equal
/// totals stay in ascending key order.
pub fn group_totals(subset: &[&EmissionsRecord], key: GroupKey) -> Vec<GroupTotal> {
    let mut by_key: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in subset {
        let total = by_key.entry(key.of(rec)).or_insert(0.0);
        if !rec.kilotons.is_nan() {
            *total += rec.kilotons;
        }
    }

    let mut totals: Vec<GroupTotal> = by_key
        .into_iter()
        .map(|(k, kilotons)| GroupTotal {
            key: k.to_string(),
            kilotons,
        })
        .collect();
    // Stable sort keeps key order among ties.
    totals.sort_by(|a, b| b.kilotons.total_cmp(&a.kilotons));
    totals
}

/// The `n` countries with the largest summed kilotons.
pub fn top_n(subset: &[&EmissionsRecord], n: usize) -> Vec<GroupTotal> {
    let mut totals = group_totals(subset, GroupKey::Country);
    totals.truncate(n);
    totals
}

/// Count per-capita values into `bins` equal-width buckets spanning the
/// observed range. Only finite values are counted (`NaN` and `±inf` are
/// dropped). No finite values or zero bins gives no buckets.
pub fn per_capita_histogram(subset: &[&EmissionsRecord], bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = subset
        .iter()
        .map(|r| r.per_capita)
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = lo + i as f64 * width;
            let upper = if i + 1 == bins { hi } else { lower + width };
            HistogramBin {
                lower,
                upper,
                count,
            }
        })
        .collect()
}

/// Kilotons summed per year across the whole dataset, oldest year first.
pub fn global_trend(dataset: &EmissionsDataset) -> Vec<(i32, f64)> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for rec in &dataset.records {
        let total = by_year.entry(rec.year).or_insert(0.0);
        if !rec.kilotons.is_nan() {
            *total += rec.kilotons;
        }
    }
    by_year.into_iter().collect()
}

/// Year-ordered kilotons for each requested country, in request order.
/// A country with no records gets an empty series.
pub fn country_time_series(dataset: &EmissionsDataset, countries: &[String]) -> Vec<CountrySeries> {
    countries
        .iter()
        .map(|country| {
            let mut points: Vec<(i32, f64)> = dataset
                .records
                .iter()
                .filter(|r| r.country == *country)
                .map(|r| (r.year, r.kilotons))
                .collect();
            points.sort_by_key(|&(year, _)| year);
            CountrySeries {
                country: country.clone(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn records() -> Vec<EmissionsRecord> {
        vec![
            EmissionsRecord::new("China", "Asia", 2020, 10_000.0, 7.0),
            EmissionsRecord::new("India", "Asia", 2020, 3_000.0, 2.0),
            EmissionsRecord::new("USA", "Americas", 2020, 5_000.0, 15.0),
        ]
    }

    fn refs(records: &[EmissionsRecord]) -> Vec<&EmissionsRecord> {
        records.iter().collect()
    }

    #[test]
    fn summary_of_three_countries() {
        let recs = records();
        let stats = summary_stats(&refs(&recs));
        assert!((stats.total_emissions - 18_000.0).abs() < EPS);
        assert!((stats.avg_per_capita.unwrap() - 8.0).abs() < EPS);
        assert_eq!(stats.distinct_countries, 3);
    }

    #[test]
    fn summary_of_empty_subset() {
        let stats = summary_stats(&[]);
        assert_eq!(stats.total_emissions, 0.0);
        assert_eq!(stats.avg_per_capita, None);
        assert_eq!(stats.distinct_countries, 0);
    }

    #[test]
    fn summary_skips_nan_cells() {
        let recs = vec![
            EmissionsRecord::new("A", "R", 2000, f64::NAN, 4.0),
            EmissionsRecord::new("B", "R", 2000, 10.0, f64::NAN),
        ];
        let stats = summary_stats(&refs(&recs));
        assert!((stats.total_emissions - 10.0).abs() < EPS);
        assert_eq!(stats.avg_per_capita, Some(4.0));
        assert_eq!(stats.distinct_countries, 2);
    }

    #[test]
    fn top_two_of_example() {
        let recs = records();
        let top = top_n(&refs(&recs), 2);
        assert_eq!(
            top,
            vec![
                GroupTotal {
                    key: "China".into(),
                    kilotons: 10_000.0,
                },
                GroupTotal {
                    key: "USA".into(),
                    kilotons: 5_000.0,
                },
            ]
        );
    }

    #[test]
    fn top_n_sums_repeated_countries_and_is_bounded() {
        let mut recs = Vec::new();
        for i in 0..15 {
            recs.push(EmissionsRecord::new(format!("C{i}"), "R", 2000, i as f64, 1.0));
        }
        recs.push(EmissionsRecord::new("C0", "R", 2000, 100.0, 1.0));
        let subset = refs(&recs);
        let top = top_n(&subset, 10);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].key, "C0");
        assert!((top[0].kilotons - 100.0).abs() < EPS);
        assert!(top.windows(2).all(|w| w[0].kilotons >= w[1].kilotons));
        for g in &top {
            assert!(recs.iter().any(|r| r.country == g.key));
        }
    }

    #[test]
    fn ties_break_in_ascending_key_order() {
        let recs = vec![
            EmissionsRecord::new("B", "Zeta", 2000, 5.0, 1.0),
            EmissionsRecord::new("A", "Alpha", 2000, 5.0, 1.0),
            EmissionsRecord::new("C", "Zeta", 2000, 0.0, 1.0),
        ];
        let subset = refs(&recs);

        let top: Vec<String> = top_n(&subset, 1).into_iter().map(|g| g.key).collect();
        assert_eq!(top, vec!["A"]);

        let regions: Vec<String> = group_totals(&subset, GroupKey::Region)
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(regions, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn region_totals_preserve_grand_total() {
        let recs = records();
        let subset = refs(&recs);
        let totals = group_totals(&subset, GroupKey::Region);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].key, "Asia");
        assert!((totals[0].kilotons - 13_000.0).abs() < EPS);
        let sum: f64 = totals.iter().map(|g| g.kilotons).sum();
        assert!((sum - summary_stats(&subset).total_emissions).abs() < EPS);
    }

    #[test]
    fn histogram_spans_observed_range() {
        let recs = records();
        let hist = per_capita_histogram(&refs(&recs), 20);

        assert_eq!(hist.len(), 20);
        assert!((hist[0].lower - 2.0).abs() < EPS);
        assert!((hist[19].upper - 15.0).abs() < EPS);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 3);
        // max value lands in the closed last bucket
        assert_eq!(hist[19].count, 1);
        assert_eq!(hist[0].count, 1);
    }

    #[test]
    fn histogram_of_constant_values_widens_range() {
        let recs = vec![
            EmissionsRecord::new("A", "R", 2000, 1.0, 3.0),
            EmissionsRecord::new("B", "R", 2000, 1.0, 3.0),
        ];
        let hist = per_capita_histogram(&refs(&recs), 4);
        assert_eq!(hist.len(), 4);
        assert!((hist[0].lower - 2.5).abs() < EPS);
        assert!((hist[3].upper - 3.5).abs() < EPS);
        assert_eq!(hist[2].count, 2);
    }

    #[test]
    fn histogram_ignores_infinite_values() {
        let recs = vec![
            EmissionsRecord::new("A", "R", 2000, 1.0, 1.0),
            EmissionsRecord::new("B", "R", 2000, 1.0, f64::INFINITY),
            EmissionsRecord::new("C", "R", 2000, 1.0, f64::NAN),
            EmissionsRecord::new("D", "R", 2000, 1.0, 3.0),
        ];
        let hist = per_capita_histogram(&refs(&recs), 2);
        assert_eq!(hist.len(), 2);
        assert!((hist[1].upper - 3.0).abs() < EPS);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_of_nothing_is_empty() {
        assert!(per_capita_histogram(&[], 20).is_empty());
        let recs = records();
        assert!(per_capita_histogram(&refs(&recs), 0).is_empty());
    }

    #[test]
    fn global_trend_is_year_ordered_and_complete() {
        let ds = EmissionsDataset::from_records(vec![
            EmissionsRecord::new("A", "R", 2001, 2.0, 1.0),
            EmissionsRecord::new("B", "R", 1999, 1.0, 1.0),
            EmissionsRecord::new("C", "R", 2001, 3.0, 1.0),
            EmissionsRecord::new("A", "R", 2000, 4.0, 1.0),
        ]);
        let trend = global_trend(&ds);
        assert_eq!(trend, vec![(1999, 1.0), (2000, 4.0), (2001, 5.0)]);

        let dataset_total: f64 = ds.records.iter().map(|r| r.kilotons).sum();
        let trend_total: f64 = trend.iter().map(|(_, v)| v).sum();
        assert!((dataset_total - trend_total).abs() < EPS);
    }

    #[test]
    fn country_series_sorted_by_year_with_empty_for_unknown() {
        let ds = EmissionsDataset::from_records(vec![
            EmissionsRecord::new("India", "Asia", 2020, 3.0, 1.0),
            EmissionsRecord::new("India", "Asia", 2018, 1.0, 1.0),
            EmissionsRecord::new("China", "Asia", 2019, 9.0, 1.0),
            EmissionsRecord::new("India", "Asia", 2019, 2.0, 1.0),
        ]);
        let series = country_time_series(&ds, &["India".to_string(), "Atlantis".to_string()]);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].country, "India");
        assert_eq!(series[0].points, vec![(2018, 1.0), (2019, 2.0), (2020, 3.0)]);
        assert_eq!(series[1].country, "Atlantis");
        assert!(series[1].points.is_empty());
    }

    mod properties {
        use super::*;
        use crate::data::strategies::{arb_dataset, arb_record, close};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_top_n_is_bounded_ranked_subset(
                rows in prop::collection::vec(arb_record(), 0..40),
                n in 0usize..8,
            ) {
                let subset = refs(&rows);
                let top = top_n(&subset, n);
                prop_assert!(top.len() <= n);
                for pair in top.windows(2) {
                    prop_assert!(pair[0].kilotons >= pair[1].kilotons);
                }
                for g in &top {
                    prop_assert!(rows.iter().any(|r| r.country == g.key));
                }
            }

            #[test]
            fn prop_group_totals_preserve_total(
                rows in prop::collection::vec(arb_record(), 0..40),
            ) {
                let subset = refs(&rows);
                let total = summary_stats(&subset).total_emissions;
                for key in [GroupKey::Region, GroupKey::Country] {
                    let grouped: f64 = group_totals(&subset, key)
                        .iter()
                        .map(|g| g.kilotons)
                        .sum();
                    prop_assert!(close(grouped, total), "{} vs {}", grouped, total);
                }
            }

            #[test]
            fn prop_global_trend_ordered_and_complete(ds in arb_dataset()) {
                let trend = global_trend(&ds);
                for pair in trend.windows(2) {
                    prop_assert!(pair[0].0 < pair[1].0);
                }
                prop_assert_eq!(trend.len(), ds.years.len());
                let total: f64 = ds.records.iter().map(|r| r.kilotons).sum();
                let trend_total: f64 = trend.iter().map(|(_, kt)| kt).sum();
                prop_assert!(close(trend_total, total), "{} vs {}", trend_total, total);
            }

            #[test]
            fn prop_histogram_counts_every_finite_value(
                rows in prop::collection::vec(arb_record(), 0..40),
                bins in 1usize..30,
            ) {
                let subset = refs(&rows);
                let finite = rows.iter().filter(|r| r.per_capita.is_finite()).count();
                let hist = per_capita_histogram(&subset, bins);
                let counted: usize = hist.iter().map(|b| b.count).sum();
                prop_assert_eq!(counted, finite);
                if finite > 0 {
                    prop_assert_eq!(hist.len(), bins);
                }
            }
        }
    }
}
