//! Chaos Clicker - a reflex mini-game core
//!
//! Core modules:
//! - `sim`: Game state, chaos scheduler, input dispatch and scoring
//! - `rng`: Bounded random values and weighted choice
//! - `effects`: Declarative effect requests for the presentation layer
//! - `surface`: Display surface abstraction (viewport and element geometry)
//! - `settings`: Data-driven tuning, loaded from JSON

pub mod effects;
pub mod error;
pub mod rng;
pub mod settings;
pub mod sim;
pub mod surface;

pub use effects::{EffectKind, EffectPlayer, EffectRequest, LogEffectPlayer, RecordingPlayer};
pub use error::{ChaosError, Result};
pub use settings::{Settings, Tuning, TuningPreset};
pub use surface::{DisplaySurface, EntityId, FixedSurface, Rect};

/// Virtual clock unit (milliseconds since game start)
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    use crate::Millis;

    /// Keeps the target away from the viewport edges
    pub const TARGET_MARGIN: f32 = 60.0;
    /// Target size range (units)
    pub const TARGET_MIN_SIZE: f32 = 30.0;
    pub const TARGET_MAX_SIZE: f32 = 60.0;
    /// Size of the target before its first teleport
    pub const TARGET_START_SIZE: f32 = 40.0;
    /// Number of glyphs the host can show on the target
    pub const TARGET_GLYPHS: u8 = 9;

    /// Bonus actor square footprint (units)
    pub const BONUS_FOOTPRINT: f32 = 80.0;
    /// Bonus actor stays this long if nobody clicks it
    pub const BONUS_LIFETIME_MS: Millis = 5_000;
    /// Fade-out window during which a click still lands on the bonus actor
    pub const BONUS_FADE_MS: Millis = 300;

    /// Feedback line stays this long before the idle prompt returns
    pub const MESSAGE_DURATION_MS: Millis = 2_000;

    /// Milestone band sizes
    pub const BAND_SMALL: i64 = 50;
    pub const BAND_LARGE: i64 = 100;

    /// Maximum scheduler tasks processed per advance, prevents a runaway queue
    pub const MAX_TASKS_PER_ADVANCE: usize = 10_000;

    /// Upper bound for any configured delay or duration (one hour)
    pub const MAX_DELAY_MS: Millis = 3_600_000;
    /// Upper bound for the number of teleports in one burst
    pub const MAX_BURST_COUNT: u32 = 50;
}
