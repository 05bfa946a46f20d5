use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::RegionFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: Year and Region selectors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(selection)) = (state.dataset.clone(), state.selection.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong("Select Year");
    let mut year = selection.year();
    egui::ComboBox::from_id_salt("select_year")
        .selected_text(year.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for &y in &dataset.years {
                ui.selectable_value(&mut year, y, y.to_string());
            }
        });
    if year != selection.year() {
        state.select_year(year);
    }

    ui.add_space(8.0);
    ui.strong("Select Region");
    let mut region = selection.region().clone();
    egui::ComboBox::from_id_salt("select_region")
        .selected_text(region.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut region, RegionFilter::All, "All");
            for r in &dataset.regions {
                ui.selectable_value(&mut region, RegionFilter::Only(r.clone()), r.as_str());
            }
        });
    if &region != selection.region() {
        state.select_region(region);
    }

    ui.separator();
    if let Some(views) = &state.views {
        ui.label(format!("{} of {} records match", views.rows.len(), dataset.len()));
    }
}

// ---------------------------------------------------------------------------
// Country comparison picker
// ---------------------------------------------------------------------------

/// Multi-select of countries for the comparison chart, with a search box.
pub fn country_picker(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };

    let header = format!(
        "Select countries to compare  ({}/{})",
        state.comparison.len(),
        dataset.countries.len()
    );

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("country_picker")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Search");
                ui.text_edit_singleline(&mut state.country_search);
                if ui.small_button("Clear").clicked() {
                    state.clear_comparison();
                }
            });

            let needle = state.country_search.to_lowercase();
            let mut toggled: Option<String> = None;

            ScrollArea::vertical()
                .id_salt("country_list")
                .max_height(180.0)
                .show(ui, |ui: &mut Ui| {
                    for country in &dataset.countries {
                        if !needle.is_empty() && !country.to_lowercase().contains(&needle) {
                            continue;
                        }
                        let mut checked = state.comparison.contains(country);
                        let mut text = RichText::new(country);
                        if checked {
                            text = text.color(state.series_colors.color_for(country));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            toggled = Some(country.clone());
                        }
                    }
                });

            if let Some(country) = toggled {
                state.toggle_country(&country);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some((loaded, matching)), Some(src)) = (state.record_counts(), &state.source) {
            let name = src
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = match matching {
                Some(matching) => format!("{name}: {loaded} records loaded, {matching} match"),
                None => format!("{name}: {loaded} records loaded"),
            };
            ui.label(text);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open emissions data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
