//! Pointer-driven card effects: a small 3D tilt that follows the pointer
//! and a staggered pop-in of the card's tags while it is hovered.
//!
//! Times are absolute seconds from the host clock.

use glam::Vec2;

use super::easing::Ease;
use super::reveal::RevealStyle;

/// Pointer distance (px) per degree of tilt
pub const TILT_DIVISOR: f32 = 150.0;
/// Seconds to follow the pointer
pub const TILT_FOLLOW: f32 = 0.3;
/// Seconds to settle back flat after the pointer leaves
pub const TILT_RELEASE: f32 = 0.5;

/// Seconds each tag takes to pop in
pub const POP_DURATION: f32 = 0.3;
/// Delay between consecutive tags
pub const POP_STAGGER: f32 = 0.1;

/// Tilt in degrees (`x` = rotate about X, `y` = rotate about Y) for a
/// pointer at `local` inside a card of `size`, both in card pixels
pub fn tilt_for(local: Vec2, size: Vec2) -> Vec2 {
    let center = size / 2.0;
    Vec2::new(
        (local.y - center.y) / TILT_DIVISOR,
        (center.x - local.x) / TILT_DIVISOR,
    )
}

/// Eased transition between two vectors, retargetable mid-flight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    start: f64,
    duration: f32,
    ease: Ease,
}

impl Tween {
    /// A tween resting at `value`
    pub fn at_rest(value: Vec2, ease: Ease) -> Self {
        Self {
            from: value,
            to: value,
            start: 0.0,
            duration: 0.0,
            ease,
        }
    }

    pub fn value(&self, now: f64) -> Vec2 {
        let t = self.progress(now);
        self.from.lerp(self.to, self.ease.apply(t))
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }

    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start) as f32) / self.duration).clamp(0.0, 1.0)
    }

    /// Head for `to` over `duration` seconds, starting from wherever the
    /// tween is at `now`. Retargeting to the current target keeps the
    /// running transition.
    pub fn retarget(&mut self, to: Vec2, now: f64, duration: f32) {
        if to == self.to {
            return;
        }
        self.from = self.value(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }

    pub fn is_settled(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Hover state of one card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardHover {
    tilt: Tween,
    entered_at: Option<f64>,
}

impl Default for CardHover {
    fn default() -> Self {
        Self {
            tilt: Tween::at_rest(Vec2::ZERO, Ease::PowerOut(2)),
            entered_at: None,
        }
    }
}

impl CardHover {
    /// Feed the pointer position for this frame: `Some` card-local
    /// position while over the card, `None` otherwise
    pub fn pointer(&mut self, local: Option<Vec2>, size: Vec2, now: f64) {
        match local {
            Some(local) => {
                self.entered_at.get_or_insert(now);
                self.tilt.retarget(tilt_for(local, size), now, TILT_FOLLOW);
            }
            None => {
                if self.entered_at.take().is_some() {
                    self.tilt.retarget(Vec2::ZERO, now, TILT_RELEASE);
                }
            }
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.entered_at.is_some()
    }

    /// Current tilt in degrees
    pub fn tilt(&self, now: f64) -> Vec2 {
        self.tilt.value(now)
    }

    /// Style of tag `index`. Tags pop in one after another while hovered
    /// and sit in their natural state otherwise.
    pub fn tag_style(&self, index: usize, now: f64) -> RevealStyle {
        let Some(entered) = self.entered_at else {
            return RevealStyle::VISIBLE;
        };
        let from = RevealStyle::VISIBLE.opacity(0.0).scale(0.8).offset(0.0, 10.0);
        let local = (now - entered) as f32 - index as f32 * POP_STAGGER;
        let t = (local / POP_DURATION).clamp(0.0, 1.0);
        from.lerp(&RevealStyle::VISIBLE, Ease::PowerOut(2).apply(t))
    }

    /// Nothing left to animate
    pub fn is_idle(&self, now: f64) -> bool {
        !self.is_hovered() && self.tilt.is_settled(now) && self.tilt.target() == Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(300.0, 300.0);

    #[test]
    fn tilt_follows_pointer_offset_from_center() {
        assert_eq!(tilt_for(Vec2::new(150.0, 150.0), SIZE), Vec2::ZERO);
        // Bottom edge tips about X, left edge about Y
        assert_eq!(tilt_for(Vec2::new(150.0, 300.0), SIZE), Vec2::new(1.0, 0.0));
        assert_eq!(tilt_for(Vec2::new(0.0, 150.0), SIZE), Vec2::new(0.0, 1.0));
        assert_eq!(tilt_for(Vec2::new(300.0, 0.0), SIZE), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn tween_settles_on_target_and_retargets_from_current_value() {
        let mut tween = Tween::at_rest(Vec2::ZERO, Ease::PowerOut(2));
        assert!(tween.is_settled(0.0));

        tween.retarget(Vec2::new(1.0, 0.0), 1.0, 0.3);
        assert_eq!(tween.value(1.0), Vec2::ZERO);
        let mid = tween.value(1.15);
        assert!(mid.x > 0.5 && mid.x < 1.0, "power2.out is past halfway at half time: {mid}");
        assert!(!tween.is_settled(1.15));
        assert_eq!(tween.value(1.3), Vec2::new(1.0, 0.0));
        assert!(tween.is_settled(1.3));

        // Mid-flight retarget starts from where it is, not where it began
        tween.retarget(Vec2::new(1.0, 0.0), 2.0, 0.3);
        tween.retarget(Vec2::ZERO, 2.0, 0.5);
        assert_eq!(tween.value(2.0), Vec2::new(1.0, 0.0));
        assert_eq!(tween.value(2.5), Vec2::ZERO);
    }

    #[test]
    fn card_tilts_on_hover_and_eases_back_flat() {
        let mut card = CardHover::default();
        assert!(card.is_idle(0.0));

        card.pointer(Some(Vec2::new(150.0, 300.0)), SIZE, 0.0);
        assert!(card.is_hovered());
        assert_eq!(card.tilt(0.3), Vec2::new(1.0, 0.0));

        card.pointer(None, SIZE, 1.0);
        assert!(!card.is_hovered());
        assert!(!card.is_idle(1.2));
        assert_eq!(card.tilt(1.5), Vec2::ZERO);
        assert!(card.is_idle(1.5));
    }

    #[test]
    fn tags_pop_in_staggered_while_hovered() {
        let mut card = CardHover::default();
        assert_eq!(card.tag_style(0, 0.0), RevealStyle::VISIBLE);

        card.pointer(Some(Vec2::new(10.0, 10.0)), SIZE, 2.0);
        let first = card.tag_style(0, 2.0);
        assert_eq!(first.opacity, 0.0);
        assert_eq!(first.scale, 0.8);
        assert_eq!(first.y, 10.0);

        // At 0.15s the first tag is on its way, the third has not started
        assert!(card.tag_style(0, 2.15).opacity > 0.0);
        assert_eq!(card.tag_style(2, 2.15).opacity, 0.0);

        // Tag 2 starts at 0.2s and is done 0.3s later
        assert_eq!(card.tag_style(2, 2.6), RevealStyle::VISIBLE);

        // Leaving resets the tags to their natural state
        card.pointer(None, SIZE, 3.0);
        assert_eq!(card.tag_style(2, 3.0), RevealStyle::VISIBLE);
    }
}
