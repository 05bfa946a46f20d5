use super::aggregate::{
    country_time_series, global_trend, group_totals, per_capita_histogram, summary_stats, top_n,
    CountrySeries, GroupKey, GroupTotal, HistogramBin, SummaryStats,
};
use super::filter::{filtered_indices, Selection};
use super::model::EmissionsDataset;

/// Sizes of the ranked and bucketed views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewParams {
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 20,
        }
    }
}

/// Everything the dashboard body renders, computed in one pass for a
/// selection. Owns its data so it can outlive the borrow of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    /// Year the views were computed for (used in section titles).
    pub year: i32,
    /// Row indices of the filtered subset.
    pub rows: Vec<usize>,
    pub stats: SummaryStats,
    pub top_emitters: Vec<GroupTotal>,
    pub region_totals: Vec<GroupTotal>,
    pub per_capita: Vec<HistogramBin>,
    pub global_trend: Vec<(i32, f64)>,
    pub comparison: Vec<CountrySeries>,
}

impl DashboardViews {
    pub fn compute(
        dataset: &EmissionsDataset,
        selection: &Selection,
        countries: &[String],
        params: ViewParams,
    ) -> Self {
        let rows = filtered_indices(dataset, selection);
        let subset = dataset.rows(&rows);

        log::debug!(
            "recomputing views: year={} region={} rows={} countries={}",
            selection.year(),
            selection.region(),
            rows.len(),
            countries.len()
        );

        DashboardViews {
            year: selection.year(),
            stats: summary_stats(&subset),
            top_emitters: top_n(&subset, params.top_n),
            region_totals: group_totals(&subset, GroupKey::Region),
            per_capita: per_capita_histogram(&subset, params.histogram_bins),
            global_trend: global_trend(dataset),
            comparison: country_time_series(dataset, countries),
            rows,
        }
    }
}
