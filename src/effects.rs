//! Effect requests for the presentation layer
//!
//! The core describes *what* feedback to show; a host [`EffectPlayer`] decides
//! how to animate it and cleans up after itself. Requests are fire-and-forget.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Screen-wide disturbances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbientKind {
    /// Strong jolt with a red flash
    ScreenShake,
    /// Low-amplitude rapid jitter
    Vibrate,
    /// Tilt, blur and hue rotation
    DizzySpin,
    /// Random background gradient
    PaletteShift,
}

/// Flourishes layered on a successful hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitFlourish {
    /// Particle explosion at the click point
    ParticleBurst,
    /// Confetti across the whole screen
    Confetti,
    /// Brief rainbow overlay
    RainbowFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneBand {
    Fifty,
    Hundred,
}

/// Effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Smoke puff where the target left
    TeleportOut,
    /// Smoke puff where the target arrived
    TeleportIn,
    HitSuccess(HitFlourish),
    HitHazard,
    Miss,
    GambleWin,
    GambleLose,
    /// Floating "+N" / "-N"; magnitude carries the delta
    ScorePopup,
    /// Big mocking overlay after a penalty
    Taunt,
    Milestone(MilestoneBand),
    Ambient(AmbientKind),
}

/// A declarative effect request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub origin: Option<Vec2>,
    pub magnitude: Option<f32>,
}

impl EffectRequest {
    /// Screen-wide effect with no origin
    pub fn global(kind: EffectKind) -> Self {
        Self {
            kind,
            origin: None,
            magnitude: None,
        }
    }

    pub fn at(kind: EffectKind, origin: Vec2) -> Self {
        Self {
            kind,
            origin: Some(origin),
            magnitude: None,
        }
    }

    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }
}

/// Presentation layer implemented by the host
pub trait EffectPlayer {
    fn play(&mut self, request: &EffectRequest);
}

/// Writes every request to the log
#[derive(Debug, Default)]
pub struct LogEffectPlayer {
    played: u64,
}

impl LogEffectPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl EffectPlayer for LogEffectPlayer {
    fn play(&mut self, request: &EffectRequest) {
        self.played += 1;
        match (request.origin, request.magnitude) {
            (Some(o), Some(m)) => {
                log::trace!("effect {:?} at ({:.0}, {:.0}) x{m}", request.kind, o.x, o.y)
            }
            (Some(o), None) => log::trace!("effect {:?} at ({:.0}, {:.0})", request.kind, o.x, o.y),
            (None, Some(m)) => log::trace!("effect {:?} x{m}", request.kind),
            (None, None) => log::trace!("effect {:?}", request.kind),
        }
    }
}

/// Keeps every request, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingPlayer {
    pub requests: Vec<EffectRequest>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EffectKind) -> usize {
        self.requests.iter().filter(|r| r.kind == kind).count()
    }

    pub fn contains(&self, kind: EffectKind) -> bool {
        self.requests.iter().any(|r| r.kind == kind)
    }

    pub fn last_of(&self, kind: EffectKind) -> Option<&EffectRequest> {
        self.requests.iter().rev().find(|r| r.kind == kind)
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}

impl EffectPlayer for RecordingPlayer {
    fn play(&mut self, request: &EffectRequest) {
        self.requests.push(*request);
    }
}
