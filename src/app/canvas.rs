//! egui-backed drawing surface for the background field
//!
//! Draw calls are collected as shapes in surface-local coordinates offset by
//! the section origin; the page paints them into a reserved layer slot.

use eframe::egui;
use glam::Vec2;

use crate::core::{Extent, Rgba, Surface};

pub struct EguiSurface {
    origin: egui::Pos2,
    extent: Option<Extent>,
    shapes: Vec<egui::Shape>,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self {
            origin: egui::Pos2::ZERO,
            extent: None,
            shapes: Vec::new(),
        }
    }
}

fn color32(c: Rgba) -> egui::Color32 {
    let a = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

impl EguiSurface {
    /// Attach to an on-screen rect, or detach with `None` (off-screen or
    /// collapsed section)
    pub fn attach(&mut self, rect: Option<egui::Rect>) {
        match rect {
            Some(rect) if rect.width() >= 1.0 && rect.height() >= 1.0 => {
                self.origin = rect.min;
                self.extent = Some(Extent::new(rect.width().floor(), rect.height().floor()));
            }
            _ => self.extent = None,
        }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }

    /// Shapes drawn since the last clear
    pub fn take_shapes(&mut self) -> Vec<egui::Shape> {
        std::mem::take(&mut self.shapes)
    }
}

impl Surface for EguiSurface {
    fn extent(&self) -> Option<Extent> {
        self.extent
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.shapes
            .push(egui::Shape::circle_filled(self.to_screen(center), radius, color32(color)));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.shapes.push(egui::Shape::line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(width, color32(color)),
        ));
    }
}
