//! Platform-agnostic core - shared between the egui page and the headless runner

pub mod config;
pub mod easing;
pub mod field;
pub mod frame;
pub mod hover;
pub mod language;
pub mod reveal;
pub mod surface;

pub use config::{ConfigError, FieldConfig, PageConfig};
pub use easing::{Ease, EaseError};
pub use field::{FieldSimulator, FrameStats, ParticleField};
pub use frame::{CancellationToken, FrameLoop, FrameTime};
pub use hover::{CardHover, Tween};
pub use language::{KeyValueStore, Language, LanguageStore, MemoryStore, StoreError, Subscription, LANGUAGE_KEY};
pub use reveal::{
    Choreographer, RevealConfig, RevealHandle, RevealScope, RevealStyle, ScrollState, TargetId,
    Threshold, ThresholdError, TriggerBounds, TriggerId, TriggerLayout,
};
pub use surface::{Extent, Recorder, Rgba, Surface};
