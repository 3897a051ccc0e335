//! Game settings and tuning
//!
//! Every gameplay constant lives in [`Tuning`] so balance can be changed from a
//! JSON file without touching the scheduler.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::consts::*;
use crate::effects::AmbientKind;
use crate::error::{ChaosError, Result};

/// Tuning preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    /// First playable version: faster teleports, no hazards
    Simple,
    /// Hazards, bursts of 2-3 and compounding disturbances
    #[default]
    Canonical,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Simple => "Simple",
            TuningPreset::Canonical => "Canonical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(TuningPreset::Simple),
            "canonical" | "chaos" => Some(TuningPreset::Canonical),
            _ => None,
        }
    }

    /// Full tuning table for this preset
    pub fn tuning(&self) -> Tuning {
        match self {
            TuningPreset::Simple => Tuning::simple(),
            TuningPreset::Canonical => Tuning::default(),
        }
    }
}

/// Inclusive-exclusive delay window in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: Millis,
    pub max: Millis,
}

impl DelayRange {
    pub const fn new(min: Millis, max: Millis) -> Self {
        Self { min, max }
    }
}

/// Inclusive range of score points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRange {
    pub min: i64,
    pub max: i64,
}

impl PointRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Relative weights for the ambient loop's primary pick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientWeights {
    pub screen_shake: f32,
    pub vibrate: f32,
    pub dizzy_spin: f32,
    pub palette_shift: f32,
    /// Weight of "nothing this time"
    pub calm: f32,
}

impl Default for AmbientWeights {
    fn default() -> Self {
        Self {
            screen_shake: 0.2,
            vibrate: 0.2,
            dizzy_spin: 0.2,
            palette_shift: 0.2,
            calm: 0.2,
        }
    }
}

impl AmbientWeights {
    /// Weighted option table, in roll order
    pub fn options(&self) -> [(f32, Option<AmbientKind>); 5] {
        [
            (self.screen_shake, Some(AmbientKind::ScreenShake)),
            (self.vibrate, Some(AmbientKind::Vibrate)),
            (self.dizzy_spin, Some(AmbientKind::DizzySpin)),
            (self.palette_shift, Some(AmbientKind::PaletteShift)),
            (self.calm, None),
        ]
    }

    fn total(&self) -> f32 {
        self.options().iter().map(|(w, _)| w).sum()
    }
}

/// Extra disturbance layered on top when the ambient roll is high enough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLayer {
    /// Roll threshold (exclusive) above which the layer is added
    pub above: f32,
    pub offset_ms: Millis,
    pub kind: AmbientKind,
}

/// Gameplay balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Primary teleport loop ===
    pub teleport_delay: DelayRange,
    /// Chance the primary loop also hides the target
    pub hide_chance: f32,
    pub reappear_delay: DelayRange,

    // === Extra teleport loop ===
    pub extra_teleport_delay: DelayRange,
    pub extra_teleport_chance: f32,

    // === Burst loop ===
    pub burst_delay: DelayRange,
    pub burst_chance: f32,
    pub burst_min_count: u32,
    pub burst_max_count: u32,
    pub burst_spacing_ms: Millis,

    // === Bonus actor ===
    pub bonus_spawn_delay: DelayRange,
    pub bonus_lifetime_ms: Millis,
    pub bonus_footprint: f32,

    // === Ambient disturbances ===
    pub ambient_delay: DelayRange,
    pub ambient_weights: AmbientWeights,
    pub ambient_layers: Vec<AmbientLayer>,

    // === Target geometry ===
    pub target_margin: f32,
    pub target_min_size: f32,
    pub target_max_size: f32,
    pub hazard_chance: f32,

    // === Score policy ===
    pub hit_reward: i64,
    /// Penalty magnitude for clicking a hazard
    pub hazard_penalty: PointRange,
    /// Penalty magnitude for clicking empty space
    pub miss_penalty: i64,
    pub gamble_win_chance: f32,
    pub gamble_win: PointRange,
    /// Penalty magnitude for a lost gamble
    pub gamble_loss: PointRange,

    // === Feedback ===
    pub message_duration_ms: Millis,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            teleport_delay: DelayRange::new(2_000, 5_000),
            hide_chance: 0.3,
            reappear_delay: DelayRange::new(1_000, 2_000),

            extra_teleport_delay: DelayRange::new(2_000, 3_000),
            extra_teleport_chance: 0.2,

            burst_delay: DelayRange::new(12_000, 20_000),
            burst_chance: 0.15,
            burst_min_count: 2,
            burst_max_count: 3,
            burst_spacing_ms: 500,

            bonus_spawn_delay: DelayRange::new(20_000, 40_000),
            bonus_lifetime_ms: BONUS_LIFETIME_MS,
            bonus_footprint: BONUS_FOOTPRINT,

            ambient_delay: DelayRange::new(3_000, 6_000),
            ambient_weights: AmbientWeights::default(),
            ambient_layers: vec![
                AmbientLayer {
                    above: 0.85,
                    offset_ms: 500,
                    kind: AmbientKind::PaletteShift,
                },
                AmbientLayer {
                    above: 0.95,
                    offset_ms: 1_000,
                    kind: AmbientKind::Vibrate,
                },
            ],

            target_margin: TARGET_MARGIN,
            target_min_size: TARGET_MIN_SIZE,
            target_max_size: TARGET_MAX_SIZE,
            hazard_chance: 0.25,

            hit_reward: 10,
            hazard_penalty: PointRange::new(10, 20),
            miss_penalty: 5,
            gamble_win_chance: 0.5,
            gamble_win: PointRange::new(40, 50),
            gamble_loss: PointRange::new(10, 20),

            message_duration_ms: MESSAGE_DURATION_MS,
        }
    }
}

impl Tuning {
    /// Timings of the first playable version: no hazards, bursts of exactly 3
    pub fn simple() -> Self {
        Self {
            teleport_delay: DelayRange::new(1_000, 4_000),
            extra_teleport_chance: 0.3,
            burst_delay: DelayRange::new(8_000, 15_000),
            burst_chance: 0.2,
            burst_min_count: 3,
            burst_max_count: 3,
            ambient_delay: DelayRange::new(5_000, 10_000),
            hazard_chance: 0.0,
            ..Self::default()
        }
    }

    /// Check ranges and probabilities; loop delays must be non-zero
    pub fn validate(&self) -> Result<()> {
        let loops = [
            ("teleport_delay", self.teleport_delay),
            ("extra_teleport_delay", self.extra_teleport_delay),
            ("burst_delay", self.burst_delay),
            ("bonus_spawn_delay", self.bonus_spawn_delay),
            ("ambient_delay", self.ambient_delay),
        ];
        for (name, range) in loops {
            if range.min == 0 {
                return Err(invalid(format!("{name} must be at least 1 ms")));
            }
            if range.min > range.max {
                return Err(invalid(format!(
                    "{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.reappear_delay.min > self.reappear_delay.max {
            return Err(invalid("reappear_delay: min exceeds max".to_string()));
        }

        let durations = [
            ("teleport_delay", self.teleport_delay.max),
            ("extra_teleport_delay", self.extra_teleport_delay.max),
            ("burst_delay", self.burst_delay.max),
            ("bonus_spawn_delay", self.bonus_spawn_delay.max),
            ("ambient_delay", self.ambient_delay.max),
            ("reappear_delay", self.reappear_delay.max),
            ("burst_spacing_ms", self.burst_spacing_ms),
            ("bonus_lifetime_ms", self.bonus_lifetime_ms),
            ("message_duration_ms", self.message_duration_ms),
        ];
        for (name, ms) in durations {
            if ms > MAX_DELAY_MS {
                return Err(invalid(format!(
                    "{name}: {ms} ms exceeds the {MAX_DELAY_MS} ms limit"
                )));
            }
        }
        if self
            .ambient_layers
            .iter()
            .any(|layer| layer.offset_ms > MAX_DELAY_MS)
        {
            return Err(invalid(format!(
                "ambient layer offsets must not exceed {MAX_DELAY_MS} ms"
            )));
        }

        let chances = [
            ("hide_chance", self.hide_chance),
            ("extra_teleport_chance", self.extra_teleport_chance),
            ("burst_chance", self.burst_chance),
            ("hazard_chance", self.hazard_chance),
            ("gamble_win_chance", self.gamble_win_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(format!("{name} must be within 0..=1, got {p}")));
            }
        }

        if self.burst_min_count > self.burst_max_count {
            return Err(invalid("burst_min_count exceeds burst_max_count".to_string()));
        }
        if self.burst_max_count > MAX_BURST_COUNT {
            return Err(invalid(format!(
                "burst_max_count must not exceed {MAX_BURST_COUNT}"
            )));
        }
        if self.target_min_size > self.target_max_size || self.target_min_size <= 0.0 {
            return Err(invalid("target size range is empty or non-positive".to_string()));
        }
        if self.target_margin < 0.0 || self.bonus_footprint <= 0.0 {
            return Err(invalid("margin and footprint must be positive".to_string()));
        }

        let points = [
            ("hazard_penalty", self.hazard_penalty),
            ("gamble_win", self.gamble_win),
            ("gamble_loss", self.gamble_loss),
        ];
        for (name, range) in points {
            if range.min <= 0 || !range.contains(range.max) {
                return Err(invalid(format!(
                    "{name} must be a positive, non-empty range"
                )));
            }
        }
        // Hits always reward and misses always cost
        if self.hit_reward <= 0 {
            return Err(invalid("hit_reward must be positive".to_string()));
        }
        if self.miss_penalty <= 0 {
            return Err(invalid("miss_penalty must be positive".to_string()));
        }

        if self.ambient_weights.total() <= 0.0
            || self.ambient_weights.options().iter().any(|(w, _)| *w < 0.0)
        {
            return Err(invalid("ambient weights must be non-negative with a positive sum".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> ChaosError {
    ChaosError::InvalidTuning(reason)
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base tuning table
    pub preset: TuningPreset,
    /// Full tuning override; replaces the preset table when present
    pub tuning: Option<Tuning>,
    /// Ambient screen disturbances (shake, vibrate, spin, palette)
    pub ambient_disturbances: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: TuningPreset::Canonical,
            tuning: None,
            ambient_disturbances: true,
        }
    }
}

impl Settings {
    /// Create settings from a tuning preset
    pub fn from_preset(preset: TuningPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Effective tuning table
    pub fn tuning(&self) -> Tuning {
        self.tuning.clone().unwrap_or_else(|| self.preset.tuning())
    }

    pub fn validate(&self) -> Result<()> {
        self.tuning().validate()
    }

    /// Load settings from a JSON file and validate them
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings from {} (preset {})",
            path.display(),
            settings.preset.as_str()
        );
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert!(Tuning::simple().validate().is_ok());
    }

    #[test]
    fn test_simple_preset_has_no_hazards() {
        let tuning = Settings::from_preset(TuningPreset::Simple).tuning();
        assert_eq!(tuning.hazard_chance, 0.0);
        assert_eq!(tuning.burst_min_count, 3);
        assert_eq!(tuning.teleport_delay, DelayRange::new(1_000, 4_000));
    }

    #[test]
    fn test_zero_loop_delay_rejected() {
        let mut tuning = Tuning::default();
        tuning.ambient_delay = DelayRange::new(0, 100);
        assert!(matches!(
            tuning.validate(),
            Err(ChaosError::InvalidTuning(_))
        ));
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let mut tuning = Tuning::default();
        tuning.message_duration_ms = Millis::MAX;
        assert!(matches!(
            tuning.validate(),
            Err(ChaosError::InvalidTuning(_))
        ));

        let mut tuning = Tuning::default();
        tuning.burst_delay = DelayRange::new(1_000, MAX_DELAY_MS + 1);
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.burst_max_count = MAX_BURST_COUNT + 1;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.bonus_lifetime_ms = MAX_DELAY_MS;
        assert!(tuning.validate().is_ok(), "the limit itself is allowed");
    }

    #[test]
    fn test_huge_duration_in_file_fails_to_load() {
        let path = std::env::temp_dir().join(format!(
            "chaos_clicker_huge_duration_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"tuning":{"message_duration_ms":18446744073709551615}}"#,
        )
        .unwrap();
        let result = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ChaosError::InvalidTuning(_))));
    }

    #[test]
    fn test_score_signs_enforced() {
        let mut tuning = Tuning::default();
        tuning.hit_reward = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.miss_penalty = -5;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.gamble_loss = PointRange::new(20, 10);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_point_range_is_inclusive() {
        let range = PointRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let mut tuning = Tuning::default();
        tuning.hide_chance = 1.5;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_tuning_override_wins_over_preset() {
        let mut settings = Settings::from_preset(TuningPreset::Simple);
        let mut custom = Tuning::default();
        custom.hit_reward = 25;
        settings.tuning = Some(custom);
        assert_eq!(settings.tuning().hit_reward, 25);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"preset":"Simple"}"#).unwrap();
        assert_eq!(settings.preset, TuningPreset::Simple);
        assert!(settings.ambient_disturbances);
        assert!(settings.tuning.is_none());

        let settings: Settings =
            serde_json::from_str(r#"{"tuning":{"hit_reward":7}}"#).unwrap();
        let tuning = settings.tuning();
        assert_eq!(tuning.hit_reward, 7);
        assert_eq!(tuning.miss_penalty, 5);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "chaos_clicker_settings_{}.json",
            std::process::id()
        ));
        let mut settings = Settings::from_preset(TuningPreset::Simple);
        settings.ambient_disturbances = false;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.preset, TuningPreset::Simple);
        assert!(!loaded.ambient_disturbances);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load_from("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, ChaosError::Io(_)));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(TuningPreset::from_str("SIMPLE"), Some(TuningPreset::Simple));
        assert_eq!(TuningPreset::from_str("chaos"), Some(TuningPreset::Canonical));
        assert_eq!(TuningPreset::from_str("wild"), None);
    }
}
