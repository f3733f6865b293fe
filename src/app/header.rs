//! Navigation bar: section links, language toggle, diagnostics switch

use std::collections::VecDeque;

use eframe::egui::{self, RichText};

use crate::core::Language;
use crate::theme::colors;

use super::content;
use super::{PortfolioApp, Section};

impl PortfolioApp {
    pub(crate) fn render_nav(&mut self, ctx: &egui::Context) {
        let language = self.language();
        let mut chosen_language = None;

        egui::TopBottomPanel::top("nav")
            .frame(
                egui::Frame::new()
                    .fill(colors::BG_SECTION)
                    .inner_margin(12.0)
                    .stroke(egui::Stroke::new(1.0, colors::BORDER)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(content::OWNER)
                            .strong()
                            .size(16.0)
                            .color(colors::TEXT_PRIMARY),
                    );
                    ui.add_space(24.0);

                    for section in Section::ALL {
                        let text = RichText::new(section.label().get(language)).color(colors::TEXT_SECONDARY);
                        if ui.selectable_label(false, text).clicked() {
                            self.scroll_target = Some(section);
                        }
                    }

                    // RIGHT: language toggle, then diagnostics
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let fx = RichText::new("fx").monospace().color(if self.show_diagnostics {
                            colors::ACCENT
                        } else {
                            colors::TEXT_MUTED
                        });
                        if ui
                            .selectable_label(self.show_diagnostics, fx)
                            .on_hover_text("Diagnostics")
                            .clicked()
                        {
                            self.show_diagnostics = !self.show_diagnostics;
                        }
                        ui.add_space(12.0);

                        // Right-to-left, so EN is added first
                        for (lang, label) in [(Language::En, "EN"), (Language::It, "IT")] {
                            let color = if language == lang {
                                colors::ACCENT
                            } else {
                                colors::TEXT_MUTED
                            };
                            if ui
                                .selectable_label(language == lang, RichText::new(label).color(color))
                                .clicked()
                            {
                                chosen_language = Some(lang);
                            }
                        }
                    });
                });
            });

        if let Some(lang) = chosen_language {
            self.set_language(lang);
        }
    }
}

/// Rolling frames-per-second over the last 60 frames
pub struct FpsCounter {
    frames: VecDeque<f64>,
}

const FPS_WINDOW: usize = 60;

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(FPS_WINDOW + 1),
        }
    }

    /// Record a frame at `now` seconds
    pub fn tick(&mut self, now: f64) {
        self.frames.push_back(now);
        if self.frames.len() > FPS_WINDOW {
            self.frames.pop_front();
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
