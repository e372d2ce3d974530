use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{write_csv, write_summary_json};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – loading options, columns and series filters
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    ui.label("Pattern");
    ui.text_edit_singleline(&mut state.pattern);
    ui.label("Treatment (empty: from path)");
    ui.text_edit_singleline(&mut state.treatment);
    ui.checkbox(&mut state.series_trials, "Number trials by file");
    if ui
        .add_enabled(state.root.is_some(), egui::Button::new("Reload"))
        .clicked()
    {
        reload(state);
    }
    ui.add_space(8.0);

    ui.heading("Columns");
    ui.separator();

    let columns: Vec<String> = match &state.table {
        Some(table) => table.column_names().to_vec(),
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    let mut changed = false;
    changed |= column_combo(ui, "x_column", "x", &columns, &mut state.x_column);
    changed |= column_combo(ui, "y_column", "y", &columns, &mut state.y_column);

    let mut series_column = state.series_column.clone();
    if column_combo(ui, "series_column", "Series", &columns, &mut series_column) {
        state.set_series_column(series_column);
    } else if changed {
        state.refresh();
    }
    ui.add_space(8.0);

    let Some(series_col) = state.series_column.clone() else {
        return;
    };
    let Some(all_values) = state.table.as_ref().map(|t| t.unique_values(&series_col)) else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let n_selected = state.filters.get(&series_col).map_or(0, |s| s.len());
            ui.strong(format!("{series_col}  ({n_selected}/{})", all_values.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            for val in &all_values {
                let mut checked = state
                    .filters
                    .get(&series_col)
                    .is_some_and(|s| s.contains(val));

                let mut text = RichText::new(val.to_string());
                if let Some(palette) = &state.palette {
                    text = text.color(palette.color_for(val));
                }

                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_series(val);
                }
            }
        });
}

/// Column picker with a "(none)" entry. Returns whether the choice changed.
fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    current: &mut Option<String>,
) -> bool {
    let before = current.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.as_deref().unwrap_or("(none)"))
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(current, None, "(none)");
                for col in columns {
                    ui.selectable_value(current, Some(col.clone()), col);
                }
            });
    });
    *current != before
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Export table…"))
                .clicked()
            {
                export_dialog(state, "table.csv", "CSV", "csv", export_table);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.series.is_empty(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state, "summary.json", "JSON", "json", export_summary);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows from {} files, {} series",
                table.len(),
                state.file_count,
                state.series.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_band, "Confidence band")
            .clicked()
        {
            state.show_band = !state.show_band;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open trial data folder")
        .pick_folder();

    if let Some(path) = folder {
        open_folder(state, &path);
    }
}

/// Load `path` into the state, reporting failures in the status line.
pub fn open_folder(state: &mut AppState, path: &Path) {
    match state.load_folder(path) {
        Ok(()) => log::info!("Loaded {} files from {}", state.file_count, path.display()),
        Err(e) => report(state, "load folder", &e),
    }
}

fn reload(state: &mut AppState) {
    if let Err(e) = state.reload() {
        report(state, "reload", &e);
    }
}

fn export_dialog(
    state: &mut AppState,
    default_name: &str,
    filter_name: &str,
    extension: &str,
    export: fn(&AppState, &Path) -> Result<()>,
) {
    let file = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter(filter_name, &[extension])
        .save_file();

    if let Some(path) = file {
        match export(state, &path) {
            Ok(()) => log::info!("Exported {}", path.display()),
            Err(e) => report(state, "export", &e),
        }
    }
}

fn export_table(state: &AppState, path: &Path) -> Result<()> {
    let table = state.table.as_ref().context("no data loaded")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, BufWriter::new(file))
}

fn export_summary(state: &AppState, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_summary_json(
        state.series.iter().map(|s| (s.name.as_str(), s.rows.as_slice())),
        BufWriter::new(file),
    )
}

fn report(state: &mut AppState, action: &str, e: &anyhow::Error) {
    log::error!("Failed to {action}: {e:#}");
    state.status_message = Some(format!("Error: {e:#}"));
}
