use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{
    EmissionsDataset, COL_COUNTRY, COL_KILOTONS, COL_PER_CAPITA, COL_REGION, COL_YEAR,
};
use crate::data::views::DashboardViews;
use crate::format;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the filtered records.
pub fn filtered_table(ui: &mut Ui, dataset: &EmissionsDataset, views: &DashboardViews) {
    if views.rows.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    ui.push_id("filtered_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(260.0)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto().at_least(50.0))
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for name in [COL_COUNTRY, COL_REGION, COL_YEAR, COL_KILOTONS, COL_PER_CAPITA] {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, views.rows.len(), |mut row| {
                    let Some(rec) = views
                        .rows
                        .get(row.index())
                        .and_then(|&i| dataset.records.get(i))
                    else {
                        return;
                    };
                    row.col(|ui| {
                        ui.label(rec.country.as_str());
                    });
                    row.col(|ui| {
                        ui.label(rec.region.as_str());
                    });
                    row.col(|ui| {
                        ui.label(rec.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format::thousands(rec.kilotons));
                    });
                    row.col(|ui| {
                        ui.label(format::two_decimals(Some(rec.per_capita)));
                    });
                });
            });
    });
}

/// The three headline numbers, side by side.
pub fn key_metrics(ui: &mut Ui, views: &DashboardViews) {
    let stats = &views.stats;
    ui.columns(3, |cols| {
        metric(
            &mut cols[0],
            "Total Emissions (Kilotons)",
            format::thousands(stats.total_emissions),
        );
        metric(
            &mut cols[1],
            "Average Per Capita",
            format::two_decimals(stats.avg_per_capita),
        );
        metric(
            &mut cols[2],
            "Number of Countries",
            stats.distinct_countries.to_string(),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(egui::RichText::new(value).size(26.0).strong());
    });
}
