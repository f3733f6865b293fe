//! Page layout helpers: full-width sections, a centered content column,
//! fixed-size card grids, and drawing content under a reveal style

use eframe::egui::{self, Align, Layout, Rect, Ui, UiBuilder};

use crate::core::RevealStyle;

pub const CONTENT_MAX_WIDTH: f32 = 1120.0;
pub const SECTION_PADDING: f32 = 96.0;
pub const GRID_GAP: f32 = 16.0;

/// Full-width band with a background fill. Returns the band rect in screen
/// coordinates and the content's return value.
pub fn section<R>(ui: &mut Ui, fill: egui::Color32, add_contents: impl FnOnce(&mut Ui) -> R) -> (Rect, R) {
    let background = ui.painter().add(egui::Shape::Noop);
    let top = ui.cursor().top();
    ui.add_space(SECTION_PADDING);
    let inner = centered(ui, add_contents);
    ui.add_space(SECTION_PADDING);
    let rect = Rect::from_x_y_ranges(ui.max_rect().x_range(), top..=ui.cursor().top());
    ui.painter().set(background, egui::Shape::rect_filled(rect, 0.0, fill));
    (rect, inner)
}

/// Content column at most `CONTENT_MAX_WIDTH` wide, centered horizontally
pub fn centered<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    let available = ui.available_width();
    let width = (available - 48.0).clamp(0.0, CONTENT_MAX_WIDTH);
    let margin = ((available - width) / 2.0).max(0.0);
    ui.horizontal(|ui| {
        ui.add_space(margin);
        ui.vertical(|ui| {
            ui.set_width(width);
            add_contents(ui)
        })
        .inner
    })
    .inner
}

/// Draw `add_contents` offset and faded by `style`, while the parent
/// layout advances as if it were drawn in place. Returns the untransformed
/// rect, which is what triggers are measured against.
pub fn revealed<R>(
    ui: &mut Ui,
    style: Option<RevealStyle>,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> (Rect, R) {
    let style = style.unwrap_or(RevealStyle::VISIBLE);
    let offset = egui::vec2(style.x, style.y);
    let origin = ui.cursor().min;
    let slot = Rect::from_min_max(
        origin,
        egui::pos2(origin.x + ui.available_width(), ui.max_rect().bottom().max(origin.y)),
    );

    let mut child = ui.new_child(
        UiBuilder::new()
            .max_rect(slot.translate(offset))
            .layout(Layout::top_down(Align::Center)),
    );
    child.multiply_opacity(style.opacity);
    let inner = add_contents(&mut child);

    let natural = child.min_rect().translate(-offset);
    ui.advance_cursor_after_rect(natural);
    (natural, inner)
}

/// Card rect under a reveal transform. Scale shrinks about the center;
/// rotations foreshorten the matching axis.
pub fn transformed_rect(slot: Rect, style: &RevealStyle) -> Rect {
    let squash_y = style.rotate_x.to_radians().cos().abs();
    let squash_x = style.rotate_y.to_radians().cos().abs();
    let size = egui::vec2(
        slot.width() * style.scale * squash_x,
        slot.height() * style.scale * squash_y,
    );
    Rect::from_center_size(slot.center() + egui::vec2(style.x, style.y), size.max(egui::Vec2::ZERO))
}

/// Column count for a card grid of minimum card width `min_card`
pub fn columns_for(width: f32, min_card: f32, max_columns: usize) -> usize {
    let fit = ((width + GRID_GAP) / (min_card + GRID_GAP)).floor() as usize;
    fit.clamp(1, max_columns.max(1))
}

/// Slot rects for `count` equal cards laid out row-major inside `area`
pub fn grid_slots(area: Rect, count: usize, columns: usize, card_height: f32) -> Vec<Rect> {
    let columns = columns.max(1);
    let card_width = (area.width() - GRID_GAP * (columns - 1) as f32) / columns as f32;
    (0..count)
        .map(|i| {
            let (row, col) = (i / columns, i % columns);
            let min = area.min
                + egui::vec2(
                    col as f32 * (card_width + GRID_GAP),
                    row as f32 * (card_height + GRID_GAP),
                );
            Rect::from_min_size(min, egui::vec2(card_width, card_height))
        })
        .collect()
}

/// Total height of a grid with `count` cards
pub fn grid_height(count: usize, columns: usize, card_height: f32) -> f32 {
    let rows = count.div_ceil(columns.max(1));
    if rows == 0 {
        0.0
    } else {
        rows as f32 * card_height + (rows - 1) as f32 * GRID_GAP
    }
}
