//! Light theme: off-white page, deep teal accent

use egui::Color32;

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PAGE: Color32 = Color32::from_rgb(247, 249, 250);     // #f7f9fa
    pub const BG_SECTION: Color32 = Color32::from_rgb(255, 255, 255);  // skills / contact
    pub const BG_FOOTER: Color32 = Color32::from_rgb(31, 31, 31);      // #1f1f1f
    pub const BG_CHIP: Color32 = Color32::from_rgb(230, 247, 255);     // #e6f7ff

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(31, 31, 31);   // #1f1f1f
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(51, 56, 63); // #33383f
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 146, 153);
    pub const TEXT_ON_DARK: Color32 = Color32::from_rgb(156, 163, 175);

    // === Accent ===
    pub const ACCENT: Color32 = Color32::from_rgb(0, 112, 160);        // #0070a0

    // === Lines & Borders ===
    pub const BORDER: Color32 = Color32::from_rgb(222, 229, 235);      // #dee5eb
    pub const BORDER_STRONG: Color32 = Color32::from_rgb(194, 205, 216);
}

pub fn light_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::light();

    visuals.panel_fill = BG_PAGE;
    visuals.window_fill = BG_SECTION;
    visuals.extreme_bg_color = BG_SECTION;
    visuals.faint_bg_color = BG_CHIP;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_SECTION;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_PAGE;
    visuals.widgets.inactive.weak_bg_fill = BG_PAGE;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER_STRONG);

    visuals.widgets.hovered.bg_fill = BG_CHIP;
    visuals.widgets.hovered.weak_bg_fill = BG_CHIP;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, ACCENT);

    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = egui::Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = ACCENT;

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
