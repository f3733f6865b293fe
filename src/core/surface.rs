//! Drawing surface abstraction for the particle field
//!
//! The field only needs four primitives: query the pixel extent, clear,
//! fill a circle, stroke a line. The egui host implements this over a
//! painter; `Recorder` keeps the calls in memory for tests and the
//! headless runner.

use glam::Vec2;

/// Pixel extent of a drawing surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Surface area in px², never below 1
    pub fn area(&self) -> f32 {
        (self.width * self.height).max(1.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Straight RGBA color: 8-bit channels, alpha in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Something the field can draw on.
///
/// `extent()` returns `None` while no drawing context is available
/// (surface not attached yet); callers treat that as "skip this frame".
pub trait Surface {
    fn extent(&self) -> Option<Extent>;
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// A single recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
}

/// Off-screen surface that records draw calls since the last clear
#[derive(Debug, Default)]
pub struct Recorder {
    extent: Option<Extent>,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl Recorder {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent: Some(extent),
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// A surface without a drawing context
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn set_extent(&mut self, extent: Option<Extent>) {
        self.extent = extent;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of clears since creation (one per drawn frame)
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

impl Surface for Recorder {
    fn extent(&self) -> Option<Extent> {
        self.extent
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }
}
