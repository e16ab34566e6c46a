use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{legend_entries, tier_color};
use crate::data::cache::FileSource;
use crate::state::{AppState, ViewNotice};

use super::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Control panel");
    ui.separator();

    let dataset = state.dataset();
    let Some((min_year, max_year)) = dataset.year_range() else {
        ui.label("No data loaded.");
        return;
    };

    // ---- Year ----
    ui.strong("Select a year");
    let mut year = state.selected_year.unwrap_or(max_year);
    if ui
        .add(egui::Slider::new(&mut year, min_year..=max_year))
        .changed()
    {
        state.set_year(year);
    }
    ui.separator();

    // ---- Group ----
    ui.strong("Country group");
    let groups: Vec<String> = state.groups.names().map(str::to_string).collect();
    let current_group = state.selected_group.clone();
    egui::ComboBox::from_id_salt("country_group")
        .selected_text(&current_group)
        .show_ui(ui, |ui: &mut Ui| {
            for name in &groups {
                if ui
                    .selectable_label(current_group == *name, name.as_str())
                    .clicked()
                {
                    state.set_group(name);
                }
            }
        });
    ui.separator();

    // ---- Countries ----
    let members = state.group_members();
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!(
            "Countries  ({}/{})",
            state.selected_countries.len(),
            members.len()
        ));
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height((ui.available_height() - 140.0).max(100.0))
        .show(ui, |ui: &mut Ui| {
            for country in &members {
                let mut checked = state.selected_countries.contains(country);
                let tier = dataset.income_index.tier_of(country);
                let text = RichText::new(country.as_str()).color(tier_color(tier));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });
    ui.separator();

    // ---- Legend ----
    ui.strong("Income level");
    for (label, color) in legend_entries() {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("⏺").color(color));
            ui.label(label);
        });
    }
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Title, summary line, then either a notice or chart + table.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let year = state
        .selected_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "–".to_string());
    ui.heading(format!("Economic model map ({year})"));
    ui.label(format!(
        "Showing {} countries for the selected year.",
        state.view.len()
    ));
    ui.add_space(4.0);

    match state.view_notice() {
        Some(notice @ ViewNotice::LoadFailed(_)) => {
            ui.label(RichText::new(notice.text()).color(Color32::RED));
        }
        Some(notice @ ViewNotice::NoData) => {
            ui.label(RichText::new(notice.text()).color(Color32::from_rgb(200, 140, 0)));
        }
        None => {
            let plot_height = (ui.available_height() * 0.6).max(200.0);
            plot::balance_plot(ui, &state.view, plot_height);
            ui.label(
                RichText::new(
                    "Each point is a country's position for the selected year. \
                     Use the slider in the side panel to change the year.",
                )
                .italics(),
            );
            ui.separator();
            table::selection_table(ui, &state.view);
        }
    }
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
            if ui.button("Reload").clicked() {
                log::info!("Reloading {}", state.source_name());
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        let dataset = state.dataset();
        ui.label(format!(
            "{} records, {} countries loaded, {} visible",
            dataset.len(),
            dataset.countries.len(),
            state.view.len()
        ));

        if let Some(msg) = state.status_message() {
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
        .set_title("Open macroeconomic data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "parquet", "pq", "json"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_source(FileSource::new(path));
    }
}
