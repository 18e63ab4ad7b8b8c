use std::collections::BTreeMap;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{ChartKind, ViewerState};

// ---------------------------------------------------------------------------
// Left side panel – aggregates and legend
// ---------------------------------------------------------------------------

/// Render the left summary panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Summary");
    ui.label(format!("{} rows after cleaning", state.rows));
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Legend for the coloured scatter plots ----
            if let Some(colors) = state.legend() {
                ui.strong(&colors.column);
                for label in colors.labels() {
                    ui.colored_label(colors.egui_color(label), format!("● {label}"));
                }
                ui.separator();
            }

            group_section(ui, "Average Price by Brand", &state.analysis.avg_price_by_brand);
            group_section(ui, "Average RAM by Brand", &state.analysis.avg_ram_by_brand);

            egui::CollapsingHeader::new(RichText::new("Summary Statistics").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for s in &state.analysis.summary {
                        let fmt = |v: Option<f64>| v.map_or_else(|| "NaN".into(), |x| format!("{x:.2}"));
                        ui.label(RichText::new(&s.column).strong());
                        ui.label(format!(
                            "count {}  mean {}  std {}",
                            s.count,
                            fmt(s.mean),
                            fmt(s.std)
                        ));
                        ui.label(format!(
                            "min {}  25% {}  50% {}  75% {}  max {}",
                            fmt(s.min),
                            fmt(s.q25),
                            fmt(s.median),
                            fmt(s.q75),
                            fmt(s.max)
                        ));
                        ui.add_space(4.0);
                    }
                });
        });
}

fn group_section(ui: &mut Ui, title: &str, groups: &BTreeMap<String, f64>) {
    egui::CollapsingHeader::new(RichText::new(format!("{title}  ({})", groups.len())).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if groups.is_empty() {
                ui.label("No groups.");
            }
            for (key, value) in groups {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(key);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.monospace(format!("{value:.2}"));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar – chart selector
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    ui.horizontal(|ui: &mut Ui| {
        for kind in ChartKind::ALL {
            ui.selectable_value(&mut state.selected, kind, kind.title());
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
