//! Named easing curves for reveal transitions
//!
//! Accepts both GSAP-style names (`power3.out`, `back.out(1.7)`, `none`)
//! and CSS-style names (`ease-out-cubic`, `ease-in-out-quad`). Every curve
//! maps 0 to exactly 0 and 1 to exactly 1.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Default overshoot for `back.out`
pub const BACK_OVERSHOOT: f32 = 1.70158;

#[derive(Debug, Error, PartialEq)]
pub enum EaseError {
    #[error("unknown easing curve: {0:?}")]
    Unknown(String),
    #[error("invalid easing parameter in {0:?}")]
    BadParameter(String),
}

/// An easing curve over normalized time
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Ease {
    Linear,
    /// Polynomial of degree `n + 1`, accelerating
    PowerIn(u8),
    /// Polynomial of degree `n + 1`, decelerating
    PowerOut(u8),
    PowerInOut(u8),
    /// Overshoots past 1 then settles
    BackOut(f32),
}

impl Ease {
    /// Map normalized time (clamped to [0, 1]) to progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(n as i32 + 1),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(n as i32 + 1),
            Ease::PowerInOut(n) => {
                let p = n as i32 + 1;
                if t < 0.5 {
                    (2.0 * t).powi(p) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(p) / 2.0
                }
            }
            Ease::BackOut(s) => {
                let u = t - 1.0;
                u * u * ((s + 1.0) * u + s) + 1.0
            }
        }
    }
}

/// Power degree from a GSAP or CSS family name
fn power_of(family: &str) -> Option<u8> {
    match family {
        "power1" | "quad" => Some(1),
        "power2" | "cubic" => Some(2),
        "power3" | "quart" => Some(3),
        "power4" | "quint" | "strong" => Some(4),
        _ => None,
    }
}

impl FromStr for Ease {
    type Err = EaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let unknown = || EaseError::Unknown(s.to_string());

        if matches!(name.as_str(), "linear" | "none" | "power0") {
            return Ok(Ease::Linear);
        }

        // CSS style: ease-out-cubic, ease-in-out-quad, ease-out-back
        if let Some(rest) = name.strip_prefix("ease-") {
            let (dir, family) = if let Some(f) = rest.strip_prefix("in-out-") {
                ("inout", f)
            } else if let Some(f) = rest.strip_prefix("out-") {
                ("out", f)
            } else if let Some(f) = rest.strip_prefix("in-") {
                ("in", f)
            } else {
                return Err(unknown());
            };
            if family == "back" && dir == "out" {
                return Ok(Ease::BackOut(BACK_OVERSHOOT));
            }
            let n = power_of(family).ok_or_else(unknown)?;
            return Ok(match dir {
                "in" => Ease::PowerIn(n),
                "out" => Ease::PowerOut(n),
                _ => Ease::PowerInOut(n),
            });
        }

        // GSAP style: family.dir or family.dir(param)
        let (family, dir) = name.split_once('.').ok_or_else(unknown)?;
        let (dir, param) = match dir.split_once('(') {
            Some((d, p)) => {
                let p = p
                    .strip_suffix(')')
                    .ok_or_else(|| EaseError::BadParameter(s.to_string()))?;
                (d, Some(p))
            }
            None => (dir, None),
        };

        if family == "back" {
            if dir != "out" {
                return Err(unknown());
            }
            let overshoot = match param {
                Some(p) => p
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| EaseError::BadParameter(s.to_string()))?,
                None => BACK_OVERSHOOT,
            };
            return Ok(Ease::BackOut(overshoot));
        }

        if param.is_some() {
            return Err(EaseError::BadParameter(s.to_string()));
        }
        let n = power_of(family).ok_or_else(unknown)?;
        match dir {
            "in" => Ok(Ease::PowerIn(n)),
            "out" => Ok(Ease::PowerOut(n)),
            "inout" => Ok(Ease::PowerInOut(n)),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = EaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => write!(f, "none"),
            Ease::PowerIn(n) => write!(f, "power{n}.in"),
            Ease::PowerOut(n) => write!(f, "power{n}.out"),
            Ease::PowerInOut(n) => write!(f, "power{n}.inOut"),
            Ease::BackOut(s) => write!(f, "back.out({s})"),
        }
    }
}
