use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

pub const TITLE: &str = "Global Carbon Emissions Analysis";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarbonDashApp {
    pub state: AppState,
}

impl CarbonDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CarbonDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard body ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.separator();
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
}

/// Every section of the dashboard body, top to bottom.
fn dashboard(ui: &mut Ui, state: &mut AppState) {
    {
        let (Some(dataset), Some(views)) = (&state.dataset, &state.views) else {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("Open a file to explore emissions  (File → Open…)");
            });
            return;
        };

        section(ui, "Filtered Data");
        table::filtered_table(ui, dataset, views);

        section(ui, "Key Metrics");
        table::key_metrics(ui, views);

        section(
            ui,
            &format!("Top {} Emitting Countries in {}", state.config.top_n, views.year),
        );
        plot::totals_bar_chart(ui, "top_emitters", &views.top_emitters);

        section(ui, "Emissions by Region");
        plot::totals_bar_chart(ui, "region_totals", &views.region_totals);

        section(ui, "Per Capita Emissions Distribution");
        plot::per_capita_histogram(ui, &views.per_capita);

        section(ui, "Global Emissions Trend");
        plot::global_trend(ui, &views.global_trend);
    }

    section(ui, "Country Comparison");
    panels::country_picker(ui, state);
    if let Some(views) = &state.views {
        plot::country_comparison(ui, &views.comparison, &state.series_colors);
    }
}
