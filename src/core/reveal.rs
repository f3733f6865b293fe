//! Scroll-triggered reveal choreography
//!
//! A registration ties a trigger (the element whose position is measured)
//! to one or more targets (the elements that animate). When the trigger's
//! activation line is crossed scrolling down, the targets play from their
//! hidden style to their visible style, staggered in document order.
//! Reversible registrations play backward when scrolled back above the
//! line.
//!
//! The engine never looks at a UI tree. The host reports trigger geometry
//! through `TriggerLayout`, calls `update` once per frame with the scroll
//! state, and reads back `style(target)` when drawing.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};

use super::easing::Ease;

/// Durations are floored to this so progress math never divides by zero
const MIN_DURATION: f32 = 1e-3;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("empty threshold")]
    Empty,
    #[error("invalid threshold position {0:?}")]
    BadPosition(String),
    #[error("threshold {0:?} has too many parts")]
    TooManyParts(String),
}

/// Activation line: `edge` is a fraction down the trigger element,
/// `viewport` a fraction down the viewport. "top 85%" fires when the
/// trigger's top reaches 85% of the way down the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Threshold {
    pub edge: f32,
    pub viewport: f32,
}

impl Threshold {
    pub const fn new(edge: f32, viewport: f32) -> Self {
        Self { edge, viewport }
    }

    /// Scroll offset at which the trigger crosses the line
    pub fn start(&self, bounds: TriggerBounds, viewport_height: f32) -> f32 {
        bounds.top + self.edge * bounds.height - self.viewport * viewport_height
    }
}

/// "top" / "center" / "bottom", "85%", "0.85"
fn parse_position(token: &str) -> Result<f32, ThresholdError> {
    let bad = || ThresholdError::BadPosition(token.to_string());
    match token {
        "top" => Ok(0.0),
        "center" => Ok(0.5),
        "bottom" => Ok(1.0),
        _ => {
            if let Some(pct) = token.strip_suffix('%') {
                pct.trim().parse::<f32>().map(|p| p / 100.0).map_err(|_| bad())
            } else {
                token.parse::<f32>().map_err(|_| bad())
            }
        }
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [] => Err(ThresholdError::Empty),
            // A single value positions the trigger's top on the viewport
            [viewport] => Ok(Self::new(0.0, parse_position(viewport)?)),
            [edge, viewport] => Ok(Self::new(parse_position(edge)?, parse_position(viewport)?)),
            _ => Err(ThresholdError::TooManyParts(s.to_string())),
        }
    }
}

impl TryFrom<String> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.edge * 100.0, self.viewport * 100.0)
    }
}

/// Animatable properties of a target.
///
/// Offsets are in pixels, rotations in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealStyle {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub scale: f32,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl RevealStyle {
    /// The natural, untransformed state
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn rotate(mut self, rotate_x: f32, rotate_y: f32) -> Self {
        self.rotate_x = rotate_x;
        self.rotate_y = rotate_y;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Interpolate toward `to`; `p` may leave [0, 1] for overshooting curves
    pub fn lerp(&self, to: &Self, p: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * p;
        Self {
            opacity: mix(self.opacity, to.opacity).clamp(0.0, 1.0),
            x: mix(self.x, to.x),
            y: mix(self.y, to.y),
            rotate_x: mix(self.rotate_x, to.rotate_x),
            rotate_y: mix(self.rotate_y, to.rotate_y),
            scale: mix(self.scale, to.scale),
        }
    }
}

fn default_duration() -> f32 {
    0.8
}

fn default_ease() -> Ease {
    Ease::PowerOut(3)
}

/// Per-registration reveal settings
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RevealConfig {
    pub threshold: Threshold,
    pub from: RevealStyle,
    #[serde(default)]
    pub to: RevealStyle,
    /// Seconds per target
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default = "default_ease")]
    pub ease: Ease,
    /// Seconds between consecutive targets' starts
    #[serde(default)]
    pub stagger: f32,
    /// Play backward when scrolled back above the threshold
    #[serde(default)]
    pub reversible: bool,
}

impl RevealConfig {
    pub fn new(threshold: Threshold, from: RevealStyle) -> Self {
        Self {
            threshold,
            from,
            to: RevealStyle::VISIBLE,
            duration: default_duration(),
            ease: default_ease(),
            stagger: 0.0,
            reversible: false,
        }
    }

    pub fn to(mut self, to: RevealStyle) -> Self {
        self.to = to;
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds;
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    fn effective_duration(&self) -> f32 {
        self.duration.max(MIN_DURATION)
    }

    /// Full timeline length for `targets` staggered targets
    fn total(&self, targets: usize) -> f32 {
        self.effective_duration() + self.stagger.max(0.0) * targets.saturating_sub(1) as f32
    }
}

/// Element whose position decides when a registration fires
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(String);

/// Element that animates
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(TriggerId);
string_id!(TargetId);

/// Trigger geometry in document coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerBounds {
    pub top: f32,
    pub height: f32,
}

/// Current scroll position and viewport size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub top: f32,
    pub viewport_height: f32,
}

/// Host-side lookup of trigger geometry
pub trait TriggerLayout {
    /// `None` while the trigger is not mounted
    fn bounds(&self, trigger: &TriggerId) -> Option<TriggerBounds>;
}

impl TriggerLayout for HashMap<TriggerId, TriggerBounds> {
    fn bounds(&self, trigger: &TriggerId) -> Option<TriggerBounds> {
        self.get(trigger).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Playback {
    Idle,
    Forward,
    Backward,
}

struct Registration {
    trigger: TriggerId,
    targets: Vec<TargetId>,
    config: RevealConfig,
    /// Scroll offset where the registration fires; `None` until measured
    start: Option<f32>,
    stale: bool,
    entered: bool,
    playhead: f32,
    playback: Playback,
}

impl Registration {
    fn total(&self) -> f32 {
        self.config.total(self.targets.len())
    }

    fn advance(&mut self, dt: f32) {
        match self.playback {
            Playback::Idle => {}
            Playback::Forward => {
                self.playhead = (self.playhead + dt).min(self.total());
                if self.playhead >= self.total() {
                    self.playback = Playback::Idle;
                }
            }
            Playback::Backward => {
                self.playhead = (self.playhead - dt).max(0.0);
                if self.playhead <= 0.0 {
                    self.playback = Playback::Idle;
                }
            }
        }
    }

    fn style_at(&self, index: usize) -> RevealStyle {
        let config = &self.config;
        let duration = config.effective_duration();
        let local = if self.playhead >= self.total() {
            duration
        } else {
            (self.playhead - index as f32 * config.stagger.max(0.0)).clamp(0.0, duration)
        };
        let p = config.ease.apply(local / duration);
        config.from.lerp(&config.to, p)
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: BTreeMap<u64, Registration>,
    /// target -> (registration, index in its target list)
    targets: HashMap<TargetId, (u64, usize)>,
    refresh_pending: bool,
    last_viewport: Option<f32>,
}

impl Registry {
    fn remove(&mut self, id: u64) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        for target in &entry.targets {
            if matches!(self.targets.get(target), Some(&(owner, _)) if owner == id) {
                self.targets.remove(target);
            }
        }
        debug!(registration = id, trigger = %entry.trigger, "Reveal disposed");
        true
    }
}

/// Shared handle to the reveal registry
#[derive(Clone, Default)]
pub struct Choreographer {
    inner: Rc<RefCell<Registry>>,
}

impl Choreographer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register targets (in document order) to reveal when `trigger`
    /// crosses the configured threshold. Dropping or disposing the handle
    /// removes the registration.
    pub fn register(
        &self,
        trigger: impl Into<TriggerId>,
        targets: impl IntoIterator<Item = TargetId>,
        config: RevealConfig,
    ) -> RevealHandle {
        let trigger = trigger.into();
        let targets: Vec<TargetId> = targets.into_iter().collect();
        let mut reg = self.inner.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;

        for (index, target) in targets.iter().enumerate() {
            reg.targets.insert(target.clone(), (id, index));
        }
        debug!(
            registration = id,
            trigger = %trigger,
            targets = targets.len(),
            threshold = %config.threshold,
            reversible = config.reversible,
            "Reveal registered"
        );
        reg.entries.insert(
            id,
            Registration {
                trigger,
                targets,
                config,
                start: None,
                stale: true,
                entered: false,
                playhead: 0.0,
                playback: Playback::Idle,
            },
        );

        RevealHandle {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Re-measure every trigger on the next `update`
    pub fn request_refresh(&self) {
        self.inner.borrow_mut().refresh_pending = true;
        trace!("Reveal refresh requested");
    }

    /// Advance all registrations by one frame.
    ///
    /// Registrations whose trigger the layout cannot resolve are left
    /// untouched. Returns how many registrations were measured for the
    /// first time; their targets were drawn in the natural state until now,
    /// so a host that already painted this frame should redraw it.
    pub fn update(&self, layout: &dyn TriggerLayout, scroll: ScrollState, dt: f32) -> usize {
        let mut guard = self.inner.borrow_mut();
        let reg = &mut *guard;

        if reg.last_viewport != Some(scroll.viewport_height) {
            reg.last_viewport = Some(scroll.viewport_height);
            reg.refresh_pending = true;
        }
        let mut first_measured = 0;
        let refresh = std::mem::take(&mut reg.refresh_pending);
        if refresh {
            for entry in reg.entries.values_mut() {
                entry.stale = true;
            }
        }

        for (id, entry) in reg.entries.iter_mut() {
            if entry.stale {
                match layout.bounds(&entry.trigger) {
                    Some(bounds) => {
                        let start = entry.config.threshold.start(bounds, scroll.viewport_height);
                        trace!(registration = id, trigger = %entry.trigger, start, "Trigger measured");
                        if entry.start.is_none() {
                            first_measured += 1;
                        }
                        entry.start = Some(start);
                        entry.stale = false;
                    }
                    None => {
                        trace!(registration = id, trigger = %entry.trigger, "Trigger not mounted");
                        continue;
                    }
                }
            }
            let Some(start) = entry.start else {
                continue;
            };

            let past = scroll.top >= start;
            if past && !entry.entered {
                entry.entered = true;
                entry.playback = Playback::Forward;
                debug!(registration = id, trigger = %entry.trigger, "Reveal enter");
            } else if !past && entry.entered && entry.config.reversible {
                entry.entered = false;
                entry.playback = Playback::Backward;
                debug!(registration = id, trigger = %entry.trigger, "Reveal leave back");
            }
            entry.advance(dt.max(0.0));
        }
        first_measured
    }

    /// Current style of a target, or `None` if it has no measured
    /// registration (render it in its natural state)
    pub fn style(&self, target: &TargetId) -> Option<RevealStyle> {
        let reg = self.inner.borrow();
        let &(id, index) = reg.targets.get(target)?;
        let entry = reg.entries.get(&id)?;
        entry.start?;
        Some(entry.style_at(index))
    }

    /// Live registrations
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Any timeline still playing
    pub fn is_animating(&self) -> bool {
        self.inner
            .borrow()
            .entries
            .values()
            .any(|e| e.playback != Playback::Idle)
    }
}

/// Disposer for one registration. Disposes on drop.
pub struct RevealHandle {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl RevealHandle {
    /// Remove the registration and any in-flight transition. Idempotent.
    pub fn dispose(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// A section's registrations, reverted together on unmount or re-render
#[derive(Default)]
pub struct RevealScope {
    handles: Vec<RevealHandle>,
}

impl RevealScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handle: RevealHandle) {
        self.handles.push(handle);
    }

    /// Dispose every registration in the scope
    pub fn revert(&mut self) {
        for handle in self.handles.drain(..) {
            handle.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f32 = 800.0;
    const FRAME: f32 = 1.0 / 60.0;

    fn layout(entries: &[(&str, f32, f32)]) -> HashMap<TriggerId, TriggerBounds> {
        entries
            .iter()
            .map(|&(id, top, height)| (TriggerId::from(id), TriggerBounds { top, height }))
            .collect()
    }

    fn scroll(top: f32) -> ScrollState {
        ScrollState {
            top,
            viewport_height: VIEWPORT,
        }
    }

    fn fade_up() -> RevealConfig {
        RevealConfig::new(
            "top 85%".parse().unwrap(),
            RevealStyle::VISIBLE.opacity(0.0).offset(0.0, 40.0),
        )
        .duration(0.8)
        .ease(Ease::PowerOut(3))
        .reversible(true)
    }

    fn run(ch: &Choreographer, layout: &dyn TriggerLayout, top: f32, seconds: f32) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            ch.update(layout, scroll(top), FRAME);
        }
    }

    #[test]
    fn threshold_parsing() {
        assert_eq!("top 85%".parse(), Ok(Threshold::new(0.0, 0.85)));
        assert_eq!("80%".parse(), Ok(Threshold::new(0.0, 0.8)));
        assert_eq!("center center".parse(), Ok(Threshold::new(0.5, 0.5)));
        assert_eq!("bottom 100%".parse(), Ok(Threshold::new(1.0, 1.0)));
        assert_eq!("0.8".parse(), Ok(Threshold::new(0.0, 0.8)));
        assert_eq!("".parse::<Threshold>(), Err(ThresholdError::Empty));
        assert!(matches!("top middle".parse::<Threshold>(), Err(ThresholdError::BadPosition(_))));
        assert!(matches!("top 80% 10%".parse::<Threshold>(), Err(ThresholdError::TooManyParts(_))));
    }

    #[test]
    fn threshold_start_position() {
        let t = Threshold::new(0.0, 0.85);
        let bounds = TriggerBounds { top: 1500.0, height: 200.0 };
        assert_eq!(t.start(bounds, 800.0), 1500.0 - 680.0);
        let t = Threshold::new(0.5, 0.5);
        assert_eq!(t.start(bounds, 800.0), 1600.0 - 400.0);
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{
            "threshold": "top 80%",
            "from": {"opacity": 0.0, "scale": 0.8},
            "duration": 0.5,
            "ease": "back.out(1.7)",
            "stagger": 0.05
        }"#;
        let config: RevealConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold, Threshold::new(0.0, 0.8));
        assert_eq!(config.from, RevealStyle::VISIBLE.opacity(0.0).scale(0.8));
        assert_eq!(config.to, RevealStyle::VISIBLE);
        assert_eq!(config.ease, Ease::BackOut(1.7));
        assert!(!config.reversible);

        let bad = r#"{"threshold": "sideways", "from": {}}"#;
        assert!(serde_json::from_str::<RevealConfig>(bad).is_err());
    }

    #[test]
    fn hidden_before_threshold_visible_after() {
        let ch = Choreographer::new();
        let layout = layout(&[("title", 1500.0, 100.0)]);
        let _h = ch.register("title", [TargetId::from("title")], fade_up());
        let target = TargetId::from("title");

        // start = 1500 - 0.85 * 800 = 820
        run(&ch, &layout, 0.0, 0.5);
        assert_eq!(ch.style(&target), Some(fade_up().from));

        run(&ch, &layout, 820.0, 1.0);
        assert_eq!(ch.style(&target), Some(RevealStyle::VISIBLE));
        assert!(!ch.is_animating());
    }

    #[test]
    fn first_measurement_shows_from_state_at_zero_dt() {
        let ch = Choreographer::new();
        let empty = layout(&[]);
        let measured = layout(&[("title", 1500.0, 100.0)]);
        let _h = ch.register("title", [TargetId::from("title")], fade_up());
        let target = TargetId::from("title");

        // Nothing measured yet: natural state
        assert_eq!(ch.update(&empty, scroll(0.0), 0.0), 0);
        assert_eq!(ch.style(&target), None);

        // The first measuring pass reports itself and hides the target
        // before any time has passed
        assert_eq!(ch.update(&measured, scroll(0.0), 0.0), 1);
        assert_eq!(ch.style(&target), Some(fade_up().from));
        assert_eq!(ch.update(&measured, scroll(0.0), 0.0), 0);

        // A refresh re-measures but is not a first measurement
        ch.request_refresh();
        assert_eq!(ch.update(&measured, scroll(0.0), 0.0), 0);
    }

    #[test]
    fn reversible_scroll_out_ends_fully_hidden() {
        let ch = Choreographer::new();
        let layout = layout(&[("title", 1500.0, 100.0)]);
        let _h = ch.register("title", [TargetId::from("title")], fade_up());
        let target = TargetId::from("title");

        run(&ch, &layout, 900.0, 0.3);
        let mid = ch.style(&target).unwrap();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);

        // Back above the line mid-transition, then wait it out
        run(&ch, &layout, 700.0, 1.5);
        let end = ch.style(&target).unwrap();
        assert_eq!(end, fade_up().from);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn play_once_stays_revealed() {
        let ch = Choreographer::new();
        let layout = layout(&[("grid", 1000.0, 400.0)]);
        let config = fade_up().reversible(false);
        let _h = ch.register("grid", [TargetId::from("a")], config);

        run(&ch, &layout, 600.0, 1.0);
        run(&ch, &layout, 0.0, 1.0);
        assert_eq!(ch.style(&TargetId::from("a")), Some(RevealStyle::VISIBLE));
    }

    #[test]
    fn stagger_follows_document_order() {
        let ch = Choreographer::new();
        let layout = layout(&[("cards", 1000.0, 400.0)]);
        let targets: Vec<TargetId> = ["c0", "c1", "c2"].into_iter().map(TargetId::from).collect();
        let config = fade_up().stagger(0.15).ease(Ease::Linear);
        let _h = ch.register("cards", targets.clone(), config);

        // Cross the line, then play 0.2s
        ch.update(&layout, scroll(400.0), 0.0);
        ch.update(&layout, scroll(400.0), 0.2);
        let opacities: Vec<f32> = targets
            .iter()
            .map(|t| ch.style(t).unwrap().opacity)
            .collect();
        assert!((opacities[0] - 0.25).abs() < 1e-4);
        assert!((opacities[1] - 0.0625).abs() < 1e-4);
        assert_eq!(opacities[2], 0.0);

        // Total timeline: 0.8 + 2 * 0.15
        ch.update(&layout, scroll(400.0), 0.85);
        assert!(ch.style(&targets[2]).unwrap().opacity < 1.0);
        ch.update(&layout, scroll(400.0), 0.1);
        assert_eq!(ch.style(&targets[2]).unwrap().opacity, 1.0);
    }

    #[test]
    fn reverse_hides_last_target_first() {
        let ch = Choreographer::new();
        let layout = layout(&[("cards", 1000.0, 400.0)]);
        let targets: Vec<TargetId> = ["c0", "c1"].into_iter().map(TargetId::from).collect();
        let _h = ch.register("cards", targets.clone(), fade_up().stagger(0.15));

        run(&ch, &layout, 400.0, 2.0);
        ch.update(&layout, scroll(0.0), 0.1);
        let first = ch.style(&targets[0]).unwrap().opacity;
        let second = ch.style(&targets[1]).unwrap().opacity;
        assert_eq!(first, 1.0);
        assert!(second < 1.0);
    }

    #[test]
    fn missing_trigger_is_a_noop() {
        let ch = Choreographer::new();
        let empty: HashMap<TriggerId, TriggerBounds> = HashMap::new();
        let _h = ch.register("later", [TargetId::from("t")], fade_up());
        run(&ch, &empty, 5000.0, 0.5);
        assert_eq!(ch.style(&TargetId::from("t")), None);
        assert!(!ch.is_animating());

        // Mounted later: measured lazily on the next update
        let mounted = layout(&[("later", 100.0, 50.0)]);
        run(&ch, &mounted, 5000.0, 1.0);
        assert_eq!(ch.style(&TargetId::from("t")), Some(RevealStyle::VISIBLE));
    }

    #[test]
    fn cached_measurements_only_change_on_refresh() {
        let ch = Choreographer::new();
        let _h = ch.register("grid", [TargetId::from("g")], fade_up().duration(0.1));
        let target = TargetId::from("g");

        // Measured at top=2000: start = 1320, not reached at 1000
        run(&ch, &layout(&[("grid", 2000.0, 300.0)]), 1000.0, 0.2);
        assert_eq!(ch.style(&target).unwrap().opacity, 0.0);

        // Content above shrank; cached start still says 1320
        let moved = layout(&[("grid", 1200.0, 300.0)]);
        run(&ch, &moved, 1000.0, 0.2);
        assert_eq!(ch.style(&target).unwrap().opacity, 0.0);

        // Refresh re-measures on the next tick: start = 520
        ch.request_refresh();
        run(&ch, &moved, 1000.0, 0.2);
        assert_eq!(ch.style(&target).unwrap().opacity, 1.0);
    }

    #[test]
    fn viewport_resize_triggers_remeasure() {
        let ch = Choreographer::new();
        let layout = layout(&[("t", 1000.0, 100.0)]);
        let _h = ch.register("t", [TargetId::from("t")], fade_up().duration(0.1));

        // 800px viewport: start = 320
        ch.update(&layout, scroll(300.0), FRAME);
        assert_eq!(ch.style(&TargetId::from("t")).unwrap().opacity, 0.0);

        // Taller viewport: start = 1000 - 0.85 * 1000 = 150
        for _ in 0..20 {
            ch.update(&layout, ScrollState { top: 300.0, viewport_height: 1000.0 }, FRAME);
        }
        assert_eq!(ch.style(&TargetId::from("t")).unwrap().opacity, 1.0);
    }

    #[test]
    fn dispose_is_idempotent_and_clears_targets() {
        let ch = Choreographer::new();
        let layout = layout(&[("t", 0.0, 10.0)]);
        let handle = ch.register("t", [TargetId::from("x")], fade_up());
        ch.update(&layout, scroll(0.0), FRAME);
        assert!(ch.is_animating());

        handle.dispose();
        handle.dispose();
        assert!(ch.is_empty());
        assert!(!ch.is_animating());
        assert_eq!(ch.style(&TargetId::from("x")), None);
        drop(handle);
        assert!(ch.is_empty());
    }

    #[test]
    fn scope_revert_and_reregister() {
        let ch = Choreographer::new();
        let layout = layout(&[("grid", 0.0, 10.0)]);
        let mut scope = RevealScope::new();
        scope.add(ch.register("grid", [TargetId::from("a"), TargetId::from("b")], fade_up()));
        scope.add(ch.register("title", [TargetId::from("title")], fade_up()));
        assert_eq!(ch.len(), 2);

        scope.revert();
        assert!(scope.is_empty());
        assert!(ch.is_empty());

        // Filter changed: only "b" is rendered now
        scope.add(ch.register("grid", [TargetId::from("b")], fade_up().duration(0.1)));
        ch.request_refresh();
        run(&ch, &layout, 0.0, 0.5);
        assert_eq!(ch.style(&TargetId::from("a")), None);
        assert_eq!(ch.style(&TargetId::from("b")), Some(RevealStyle::VISIBLE));
    }

    #[test]
    fn stale_handle_does_not_remove_newer_owner() {
        let ch = Choreographer::new();
        let layout = layout(&[("t", 0.0, 10.0)]);
        let old = ch.register("t", [TargetId::from("x")], fade_up());
        let _new = ch.register("t", [TargetId::from("x")], fade_up().duration(0.1));
        old.dispose();
        run(&ch, &layout, 0.0, 0.5);
        assert_eq!(ch.style(&TargetId::from("x")), Some(RevealStyle::VISIBLE));
    }

    #[test]
    fn handle_outliving_choreographer_is_harmless() {
        let handle = {
            let ch = Choreographer::new();
            ch.register("t", [TargetId::from("x")], fade_up())
        };
        handle.dispose();
    }
}
