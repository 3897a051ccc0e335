//! Game state and entity state machines
//!
//! Everything the scheduler and the input dispatcher mutate lives in
//! [`GameState`], which is owned by a single controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::score::ScoreState;
use crate::Millis;
use crate::consts::*;
use crate::rng::ChaosRng;
use crate::settings::Tuning;
use crate::surface::Rect;

/// Target appearance, decides the score sign on click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSkin {
    Good,
    Hazard,
}

/// Observable target state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPhase {
    Hidden,
    Visible(TargetSkin),
}

/// Where a teleport came from and went to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    /// Old bounds; `None` if the target was hidden (no smoke on exit)
    pub from: Option<Rect>,
    pub to: Rect,
}

/// The chaotic target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub visible: bool,
    pub hazardous: bool,
    pub skin: TargetSkin,
    /// Which glyph the host draws (cosmetic)
    pub glyph: u8,
    /// Relocations since game start
    pub teleports: u64,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: TARGET_START_SIZE,
            visible: false,
            hazardous: false,
            skin: TargetSkin::Good,
            glyph: 0,
            teleports: 0,
        }
    }
}

impl Target {
    pub fn phase(&self) -> TargetPhase {
        if self.visible {
            TargetPhase::Visible(self.skin)
        } else {
            TargetPhase::Hidden
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Relocate, resize and re-roll the skin. Always ends visible.
    pub fn teleport(&mut self, rng: &mut ChaosRng, viewport: Vec2, tuning: &Tuning) -> Teleport {
        let from = self.visible.then(|| self.bounds());

        let margin = tuning.target_margin;
        self.pos = Vec2::new(
            rng.uniform(margin, viewport.x - margin),
            rng.uniform(margin, viewport.y - margin),
        );
        self.size = rng.uniform(tuning.target_min_size, tuning.target_max_size);
        self.hazardous = rng.chance(tuning.hazard_chance);
        self.skin = if self.hazardous {
            TargetSkin::Hazard
        } else {
            TargetSkin::Good
        };
        self.glyph = rng.index(TARGET_GLYPHS as usize) as u8;
        self.visible = true;
        self.teleports += 1;

        Teleport {
            from,
            to: self.bounds(),
        }
    }

    /// Returns true if the target was visible
    pub fn hide(&mut self) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        was_visible
    }

    /// Skin at the moment of the click, followed by the forced teleport.
    /// `None` (and no change) while hidden.
    pub fn click(
        &mut self,
        rng: &mut ChaosRng,
        viewport: Vec2,
        tuning: &Tuning,
    ) -> Option<(TargetSkin, Teleport)> {
        if !self.visible {
            return None;
        }
        let skin = self.skin;
        let teleport = self.teleport(rng, viewport, tuning);
        Some((skin, teleport))
    }
}

/// The gambling bonus actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusActor {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub visible: bool,
    /// Auto-hide deadline of the current appearance
    pub cooldown_until: Option<Millis>,
    /// When the actor last started fading out
    pub hidden_at: Option<Millis>,
    pub appearances: u32,
}

impl BonusActor {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            visible: false,
            cooldown_until: None,
            hidden_at: None,
            appearances: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Appear somewhere in the viewport. No-op while already visible.
    pub fn spawn(
        &mut self,
        rng: &mut ChaosRng,
        viewport: Vec2,
        now: Millis,
        lifetime: Millis,
    ) -> bool {
        if self.visible {
            return false;
        }
        self.pos = Vec2::new(
            rng.uniform(0.0, viewport.x - self.size),
            rng.uniform(0.0, viewport.y - self.size),
        );
        self.visible = true;
        self.cooldown_until = Some(now.saturating_add(lifetime));
        self.hidden_at = None;
        self.appearances += 1;
        true
    }

    /// Idempotent; returns true if the actor was visible
    pub fn hide(&mut self, now: Millis) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.cooldown_until = None;
        self.hidden_at = Some(now);
        true
    }

    /// Resolve the gamble and hide. `None` (and no change) while hidden.
    pub fn click(&mut self, rng: &mut ChaosRng, tuning: &Tuning, now: Millis) -> Option<i64> {
        if !self.visible {
            return None;
        }
        let delta = resolve_gamble(rng, tuning);
        self.hide(now);
        Some(delta)
    }

    /// Whether a pending auto-hide for this appearance should fire
    pub fn auto_hide_due(&self, now: Millis) -> bool {
        self.visible && self.cooldown_until.is_some_and(|until| now >= until)
    }

    /// Still on screen while fading out after a hide
    pub fn is_fading(&self, now: Millis) -> bool {
        !self.visible
            && self
                .hidden_at
                .is_some_and(|at| now < at.saturating_add(BONUS_FADE_MS))
    }
}

/// Either/or gamble: a bonus band or a penalty band, never zero
pub fn resolve_gamble(rng: &mut ChaosRng, tuning: &Tuning) -> i64 {
    if rng.chance(tuning.gamble_win_chance) {
        rng.points(tuning.gamble_win)
    } else {
        -rng.points(tuning.gamble_loss)
    }
}

/// Feedback line bound to the host's message area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Bumped on every change so stale reset timers can be ignored
    pub generation: u64,
}

impl Message {
    pub fn set(&mut self, text: impl Into<String>) -> u64 {
        self.text = text.into();
        self.generation += 1;
        self.generation
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub target: Target,
    pub bonus: BonusActor,
    pub score: ScoreState,
    pub message: Message,
    pub rng: ChaosRng,
}

impl GameState {
    pub fn new(rng: ChaosRng, tuning: &Tuning) -> Self {
        Self {
            target: Target::default(),
            bonus: BonusActor::new(tuning.bonus_footprint),
            score: ScoreState::new(),
            message: Message::default(),
            rng,
        }
    }
}
