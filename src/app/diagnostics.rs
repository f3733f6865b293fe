//! Diagnostics overlay: frame rate, field and reveal state

use eframe::egui;

use crate::theme::colors;

use super::PortfolioApp;

/// Format a pixel distance with one decimal only when it is small
fn format_px(px: f32) -> String {
    if px >= 100.0 {
        format!("{px:.0}px")
    } else {
        format!("{px:.1}px")
    }
}

impl PortfolioApp {
    pub(crate) fn draw_diagnostics(&self, ctx: &egui::Context) {
        let stats = self.field.last_stats();
        let running = self.field.is_running();
        let (indicator, status, status_color) = if running {
            ("●", "Field running", egui::Color32::from_rgb(60, 160, 90))
        } else {
            ("○", "Field idle", colors::TEXT_MUTED)
        };
        let title = egui::RichText::new(format!("{indicator} {status}")).color(status_color);

        egui::Area::new(egui::Id::new("diagnostics_area"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 56.0))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 230))
                    .stroke(egui::Stroke::new(1.0, colors::BORDER))
                    .corner_radius(4.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_min_width(220.0);
                        egui::CollapsingHeader::new(title)
                            .default_open(true)
                            .show(ui, |ui| {
                                let line = |ui: &mut egui::Ui, text: String| {
                                    ui.label(
                                        egui::RichText::new(text)
                                            .monospace()
                                            .size(12.0)
                                            .color(colors::TEXT_SECONDARY),
                                    );
                                };
                                line(ui, format!("{:.0} fps", self.fps_counter.fps()));
                                line(ui, format!("frame {}", self.frames.frames()));
                                line(ui, format!("{} nodes", stats.nodes));
                                line(ui, format!("{} edges", stats.edges));
                                line(ui, format!("link {}", format_px(stats.connection_distance)));
                                line(
                                    ui,
                                    format!(
                                        "{} reveals{}",
                                        self.reveals.len(),
                                        if self.reveals.is_animating() { ", animating" } else { "" }
                                    ),
                                );
                                line(ui, format!("lang {}", self.language()));
                                line(ui, format!("max nodes {}", self.config.field.max_nodes));
                            });
                    });
            });
    }
}
