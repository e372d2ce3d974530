use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TrialsApp {
    pub state: AppState,
}

impl TrialsApp {
    /// Start with `folder` already loaded, if given.
    pub fn with_folder(folder: Option<&std::path::Path>) -> Self {
        let mut app = Self::default();
        if let Some(folder) = folder {
            panels::open_folder(&mut app.state, folder);
        }
        app
    }
}

impl eframe::App for TrialsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: files, columns, series ----
        egui::SidePanel::left("options_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trials_plot(ui, &self.state);
        });
    }
}
