//! Background node field: drifting points joined by proximity edges
//!
//! `ParticleField` owns the node buffer and does one frame of physics and
//! drawing at a time. `FieldSimulator` wraps it with the start/stop/resize
//! lifecycle and runs it as a `FrameLoop` task.

use std::cell::{Ref, RefCell};
use std::f32::consts::TAU;
use std::ops::ControlFlow;
use std::rc::Rc;

use glam::Vec2;
use tracing::{debug, info, trace};

use super::config::FieldConfig;
use super::frame::{CancellationToken, FrameLoop, FrameTime};
use super::surface::{Extent, Surface};

/// Radius breathing: `size * (BREATH_BASE + BREATH_DEPTH * sin(t + phase))`
const BREATH_BASE: f32 = 0.82;
const BREATH_DEPTH: f32 = 0.18;

/// One simulated point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Base radius
    pub size: f32,
    /// Oscillation phase [0, 2π)
    pub phase: f32,
}

impl Node {
    /// Move by one frame of velocity and bounce off the extent.
    ///
    /// The sign flip happens after the move, so a node may sit up to one
    /// step outside the extent for a single frame before heading back.
    fn advance(&mut self, extent: Extent) {
        self.pos += self.vel;
        if self.pos.x < 0.0 || self.pos.x > extent.width {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > extent.height {
            self.vel.y = -self.vel.y;
        }
    }

    fn radius_at(&self, t: f32) -> f32 {
        self.size * (BREATH_BASE + BREATH_DEPTH * (t + self.phase).sin())
    }
}

/// A drawn connection between nodes `a < b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

/// Per-frame counters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub nodes: usize,
    pub edges: usize,
    pub connection_distance: f32,
}

/// Node count for a surface: area density clamped to the configured bounds
pub fn node_count_for(extent: Extent, config: &FieldConfig) -> usize {
    let by_area = (extent.area() / config.area_per_node).floor() as usize;
    by_area.clamp(config.min_nodes, config.max_nodes)
}

/// Edge alpha for two nodes `distance` apart.
///
/// Fades linearly from `max_alpha` at zero distance to nothing at
/// `connection_distance`; pairs at or beyond the threshold get no edge.
pub fn edge_alpha(distance: f32, connection_distance: f32, max_alpha: f32) -> Option<f32> {
    if distance >= connection_distance {
        return None;
    }
    Some(max_alpha * (1.0 - distance / connection_distance))
}

/// Node buffer bound to one surface extent
pub struct ParticleField {
    config: FieldConfig,
    extent: Extent,
    nodes: Vec<Node>,
    rng: fastrand::Rng,
}

impl ParticleField {
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            extent: Extent::new(0.0, 0.0),
            nodes: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Seed from the platform entropy source, falling back to a fixed seed
    pub fn from_entropy(config: FieldConfig) -> Self {
        let mut buf = [0u8; 8];
        let seed = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(e) => {
                debug!(error = %e, "Entropy unavailable, using fixed field seed");
                0x5EED_F1E1_D000_0001
            }
        };
        Self::new(config, seed)
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Adopt a new extent and scatter a fresh node set over it
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        let count = node_count_for(extent, &self.config);
        let FieldConfig {
            speed,
            size_min,
            size_range,
            ..
        } = self.config;

        let rng = &mut self.rng;
        self.nodes = (0..count)
            .map(|_| Node {
                pos: Vec2::new(rng.f32() * extent.width, rng.f32() * extent.height),
                vel: Vec2::new((rng.f32() - 0.5) * speed, (rng.f32() - 0.5) * speed),
                size: size_min + rng.f32() * size_range,
                phase: rng.f32() * TAU,
            })
            .collect();

        debug!(
            width = extent.width,
            height = extent.height,
            nodes = count,
            "Field rebuilt"
        );
    }

    /// Edge length threshold, scaled so edge density stays roughly constant
    /// across surface sizes
    pub fn connection_distance(&self) -> f32 {
        let n = self.nodes.len().max(1) as f32;
        ((self.extent.area() / n).sqrt() * self.config.link_factor)
            .clamp(self.config.link_min, self.config.link_max)
    }

    /// All edges for the current node positions
    pub fn edges(&self) -> Vec<Edge> {
        let cd = self.connection_distance();
        let cd_sq = cd * cd;
        let mut edges = Vec::new();
        for (i, a) in self.nodes.iter().enumerate() {
            for (j, b) in self.nodes.iter().enumerate().skip(i + 1) {
                let dist_sq = a.pos.distance_squared(b.pos);
                if dist_sq >= cd_sq {
                    continue;
                }
                if let Some(alpha) = edge_alpha(dist_sq.sqrt(), cd, self.config.edge_alpha) {
                    edges.push(Edge { a: i, b: j, alpha });
                }
            }
        }
        edges
    }

    /// Advance every node one step without drawing
    pub fn step(&mut self) {
        let extent = self.extent;
        for node in &mut self.nodes {
            node.advance(extent);
        }
    }

    /// One full frame: clear, move and draw nodes, then draw edges.
    ///
    /// `now` is the monotonic clock in seconds.
    pub fn frame(&mut self, surface: &mut dyn Surface, now: f64) -> FrameStats {
        let t = (now * 1000.0 * self.config.time_scale) as f32;
        let connection_distance = self.connection_distance();

        surface.clear();

        let node_color = self.config.node_rgba();
        let extent = self.extent;
        for node in &mut self.nodes {
            node.advance(extent);
            surface.fill_circle(node.pos, node.radius_at(t), node_color);
        }

        let edges = self.edges();
        for edge in &edges {
            surface.stroke_line(
                self.nodes[edge.a].pos,
                self.nodes[edge.b].pos,
                self.config.edge_width,
                self.config.edge_rgba(edge.alpha),
            );
        }

        let stats = FrameStats {
            nodes: self.nodes.len(),
            edges: edges.len(),
            connection_distance,
        };
        trace!(nodes = stats.nodes, edges = stats.edges, cd = connection_distance, "Field frame");
        stats
    }
}

/// Start/stop/resize lifecycle around a `ParticleField`
pub struct FieldSimulator {
    field: Rc<RefCell<ParticleField>>,
    last_stats: Rc<RefCell<FrameStats>>,
    token: Option<CancellationToken>,
}

impl FieldSimulator {
    pub fn new(field: ParticleField) -> Self {
        Self {
            field: Rc::new(RefCell::new(field)),
            last_stats: Rc::new(RefCell::new(FrameStats::default())),
            token: None,
        }
    }

    /// Build nodes for the surface and schedule the frame task.
    ///
    /// Without a drawing context this does nothing and returns `false`.
    /// Starting an already running simulator is a no-op.
    pub fn start(&mut self, frames: &mut FrameLoop, surface: &dyn Surface) -> bool {
        if self.is_running() {
            return true;
        }
        let Some(extent) = surface.extent() else {
            debug!("No drawing context, field not started");
            return false;
        };

        self.field.borrow_mut().resize(extent);

        let field = self.field.clone();
        let last_stats = self.last_stats.clone();
        let token = frames.spawn(move |surface: &mut dyn Surface, time: FrameTime| {
            let Some(extent) = surface.extent() else {
                trace!("Drawing context gone, skipping field frame");
                return ControlFlow::Continue(());
            };
            let mut field = field.borrow_mut();
            if field.extent() != extent {
                field.resize(extent);
            }
            *last_stats.borrow_mut() = field.frame(surface, time.now);
            ControlFlow::Continue(())
        });
        self.token = Some(token);

        info!(
            width = extent.width,
            height = extent.height,
            nodes = self.field.borrow().nodes().len(),
            "Field started"
        );
        true
    }

    /// Cancel the frame task. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            info!("Field stopped");
        }
    }

    /// Rebuild nodes for a new surface size
    pub fn on_resize(&mut self, extent: Extent) {
        self.field.borrow_mut().resize(extent);
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub fn field(&self) -> Ref<'_, ParticleField> {
        self.field.borrow()
    }

    /// Stats from the most recent drawn frame
    pub fn last_stats(&self) -> FrameStats {
        *self.last_stats.borrow()
    }
}

impl Drop for FieldSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::{DrawOp, Recorder};

    fn field_with(extent: Extent, seed: u64) -> ParticleField {
        let mut field = ParticleField::new(FieldConfig::default(), seed);
        field.resize(extent);
        field
    }

    fn node_at(x: f32, y: f32) -> Node {
        Node {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: 2.0,
            phase: 0.0,
        }
    }

    #[test]
    fn node_count_follows_area_with_clamp() {
        let config = FieldConfig::default();
        assert_eq!(node_count_for(Extent::new(1200.0, 800.0), &config), 101);
        assert_eq!(node_count_for(Extent::new(1.0, 1.0), &config), 90);
        assert_eq!(node_count_for(Extent::new(0.0, 0.0), &config), 90);
        assert_eq!(node_count_for(Extent::new(4000.0, 3000.0), &config), 240);

        for (w, h) in [(320.0, 480.0), (1920.0, 1080.0), (1500.0, 1000.0), (2560.0, 1440.0)] {
            let expected = ((w * h / 9500.0_f32).floor() as usize).clamp(90, 240);
            assert_eq!(node_count_for(Extent::new(w, h), &config), expected);
        }
    }

    #[test]
    fn resize_replaces_every_node() {
        let mut field = field_with(Extent::new(1200.0, 800.0), 7);
        assert_eq!(field.nodes().len(), 101);
        let before = field.nodes().to_vec();

        field.resize(Extent::new(1920.0, 1080.0));
        assert_eq!(field.nodes().len(), 218);
        assert!(field.nodes().iter().all(|n| !before.contains(n)));
    }

    #[test]
    fn scatter_respects_ranges() {
        let field = field_with(Extent::new(800.0, 600.0), 11);
        for node in field.nodes() {
            assert!(field.extent().contains(node.pos));
            assert!(node.vel.x.abs() <= 0.275 && node.vel.y.abs() <= 0.275);
            assert!((2.0..=3.8).contains(&node.size));
            assert!((0.0..TAU).contains(&node.phase));
        }
    }

    #[test]
    fn connection_distance_is_clamped() {
        // 1200x800 with 101 nodes: sqrt(9504.95) * 1.15 ≈ 112.1
        let field = field_with(Extent::new(1200.0, 800.0), 1);
        let cd = field.connection_distance();
        assert!((cd - 112.12).abs() < 0.05, "cd = {cd}");

        // Tiny surface: clamped up to 95
        let field = field_with(Extent::new(100.0, 100.0), 1);
        assert_eq!(field.connection_distance(), 95.0);

        // Very wide, short surface at the node cap: clamped down to 165
        let field = field_with(Extent::new(20000.0, 500.0), 1);
        assert_eq!(field.nodes().len(), 240);
        assert_eq!(field.connection_distance(), 165.0);
    }

    #[test]
    fn bounce_keeps_nodes_near_the_extent() {
        let extent = Extent::new(300.0, 200.0);
        let mut field = field_with(extent, 42);
        let speeds: Vec<Vec2> = field.nodes().iter().map(|n| n.vel.abs()).collect();
        // One step of travel plus float slack
        let slack = 1e-3;
        for _ in 0..5000 {
            field.step();
            for (node, speed) in field.nodes().iter().zip(&speeds) {
                assert!(node.pos.x >= -speed.x - slack);
                assert!(node.pos.x <= extent.width + speed.x + slack);
                assert!(node.pos.y >= -speed.y - slack);
                assert!(node.pos.y <= extent.height + speed.y + slack);
                // Bounces never change speed
                assert_eq!(node.vel.abs(), *speed);
            }
        }
    }

    #[test]
    fn bounce_flips_sign_without_losing_speed() {
        let extent = Extent::new(100.0, 100.0);
        let mut node = Node {
            pos: Vec2::new(99.9, 50.0),
            vel: Vec2::new(0.25, 0.0),
            size: 2.0,
            phase: 0.0,
        };
        node.advance(extent);
        assert!(node.pos.x > extent.width);
        assert_eq!(node.vel.x, -0.25);
        node.advance(extent);
        assert!(node.pos.x <= extent.width);
        assert_eq!(node.vel.x, -0.25);
    }

    #[test]
    fn edge_alpha_endpoints() {
        assert_eq!(edge_alpha(0.0, 112.0, 0.18), Some(0.18));
        assert_eq!(edge_alpha(112.0, 112.0, 0.18), None);
        assert_eq!(edge_alpha(150.0, 112.0, 0.18), None);
        let half = edge_alpha(56.0, 112.0, 0.18).unwrap();
        assert!((half - 0.09).abs() < 1e-6);
    }

    #[test]
    fn no_edges_at_or_beyond_connection_distance() {
        let mut field = field_with(Extent::new(100.0, 100.0), 3);
        let cd = field.connection_distance();
        assert_eq!(cd, 95.0);

        field.nodes = vec![node_at(0.0, 0.0), node_at(cd, 0.0), node_at(cd * 2.5, 0.0)];
        // 3 nodes on 100x100: still clamped to 95
        assert_eq!(field.connection_distance(), 95.0);
        assert!(field.edges().is_empty());

        field.nodes = vec![node_at(10.0, 10.0), node_at(10.0, 10.0)];
        let edges = field.edges();
        assert_eq!(edges, vec![Edge { a: 0, b: 1, alpha: 0.18 }]);
    }

    #[test]
    fn frame_clears_then_draws_nodes_then_edges() {
        let mut field = field_with(Extent::new(400.0, 300.0), 9);
        let mut surface = Recorder::new(Extent::new(400.0, 300.0));
        let stats = field.frame(&mut surface, 1.5);

        let ops = surface.ops();
        assert_eq!(ops[0], DrawOp::Clear);
        let circles = surface.circles().count();
        assert_eq!(circles, stats.nodes);
        assert_eq!(surface.lines().count(), stats.edges);

        // No circle after the first line
        let first_line = ops.iter().position(|op| matches!(op, DrawOp::Line { .. }));
        if let Some(first_line) = first_line {
            assert!(ops[first_line..]
                .iter()
                .all(|op| matches!(op, DrawOp::Line { .. })));
        }

        for op in surface.lines() {
            if let DrawOp::Line { color, width, .. } = op {
                assert!(color.a > 0.0 && color.a <= 0.18);
                assert_eq!(*width, 1.0);
            }
        }
    }

    #[test]
    fn radius_breathes_within_bounds() {
        let mut field = field_with(Extent::new(400.0, 300.0), 5);
        let mut surface = Recorder::new(Extent::new(400.0, 300.0));
        for frame in 0..120 {
            field.frame(&mut surface, frame as f64 / 60.0);
            for (op, node) in surface.circles().zip(field.nodes()) {
                if let DrawOp::Circle { radius, .. } = op {
                    assert!(*radius >= node.size * 0.64 - 1e-4);
                    assert!(*radius <= node.size + 1e-4);
                }
            }
        }
    }

    #[test]
    fn start_without_context_is_a_noop() {
        let mut frames = FrameLoop::new();
        let mut sim = FieldSimulator::new(ParticleField::new(FieldConfig::default(), 1));
        let surface = Recorder::detached();
        assert!(!sim.start(&mut frames, &surface));
        assert!(!sim.is_running());
        assert!(frames.is_idle());
        assert!(sim.field().nodes().is_empty());
    }

    #[test]
    fn start_draws_every_tick_and_stop_is_idempotent() {
        let mut frames = FrameLoop::new();
        let mut sim = FieldSimulator::new(ParticleField::new(FieldConfig::default(), 1));
        let mut surface = Recorder::new(Extent::new(1200.0, 800.0));

        assert!(sim.start(&mut frames, &surface));
        assert!(sim.start(&mut frames, &surface));
        assert_eq!(frames.live_tasks(), 1);

        frames.tick(&mut surface, 0.0);
        frames.tick(&mut surface, 0.016);
        assert_eq!(surface.clears(), 2);
        assert_eq!(sim.last_stats().nodes, 101);

        sim.stop();
        sim.stop();
        assert!(!sim.is_running());
        assert!(frames.is_idle());

        frames.tick(&mut surface, 0.032);
        assert_eq!(surface.clears(), 2);
    }

    #[test]
    fn running_field_follows_surface_resize() {
        let mut frames = FrameLoop::new();
        let mut sim = FieldSimulator::new(ParticleField::new(FieldConfig::default(), 2));
        let mut surface = Recorder::new(Extent::new(1200.0, 800.0));
        sim.start(&mut frames, &surface);
        frames.tick(&mut surface, 0.0);
        assert_eq!(sim.field().nodes().len(), 101);

        surface.set_extent(Some(Extent::new(1920.0, 1080.0)));
        frames.tick(&mut surface, 0.016);
        assert_eq!(sim.field().nodes().len(), 218);

        // Context lost: frame skipped, task keeps running
        surface.set_extent(None);
        frames.tick(&mut surface, 0.032);
        assert_eq!(surface.clears(), 2);
        assert!(sim.is_running());
    }

    #[test]
    fn explicit_resize_rebuilds() {
        let mut sim = FieldSimulator::new(ParticleField::new(FieldConfig::default(), 4));
        sim.on_resize(Extent::new(2560.0, 1440.0));
        assert_eq!(sim.field().nodes().len(), 240);
        sim.on_resize(Extent::new(600.0, 400.0));
        assert_eq!(sim.field().nodes().len(), 90);
    }

    #[test]
    fn drop_cancels_task() {
        let mut frames = FrameLoop::new();
        let surface = Recorder::new(Extent::new(500.0, 500.0));
        {
            let mut sim = FieldSimulator::new(ParticleField::new(FieldConfig::default(), 8));
            sim.start(&mut frames, &surface);
            assert_eq!(frames.live_tasks(), 1);
        }
        assert!(frames.is_idle());
    }
}
