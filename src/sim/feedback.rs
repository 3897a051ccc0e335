//! Feedback lines and effect bundles
//!
//! Chosen purely from a [`ScoreUpdate`]; the scoring engine itself never
//! decides presentation.

use glam::Vec2;

use super::score::{DeltaSign, ScoreUpdate};
use crate::effects::{AmbientKind, EffectKind, EffectRequest, HitFlourish, MilestoneBand};

/// Shown at start and whenever a feedback line expires
pub const IDLE_MESSAGE: &str = "Click the chaotic cursor! 🎯";

pub const CHEERS: [&str; 5] = [
    "Yay! 🎉",
    "Woohoo! 😎",
    "Nice! 😺",
    "Great! 🌟",
    "Awesome! ✨",
];

pub const JEERS: [&str; 5] = [
    "Ouch! 🤡",
    "Try again 😹",
    "Haha 😈",
    "Miss! 💥",
    "Oops! 😵",
];

/// Line for a resolved bonus-actor gamble
pub fn gamble_message(delta: i64) -> String {
    if delta > 0 {
        format!("Cheshire Cat blessed you! +{delta} 😸")
    } else {
        format!("Cheshire Cat tricked you! {delta} 😈")
    }
}

/// Message table for a delta sign
pub fn lines_for(sign: DeltaSign) -> &'static [&'static str] {
    match sign {
        DeltaSign::Positive => &CHEERS,
        DeltaSign::Negative => &JEERS,
        DeltaSign::Zero => &[],
    }
}

/// Screen-wide requests that follow any score change
pub fn score_bundle(update: &ScoreUpdate, popup_origin: Vec2) -> Vec<EffectRequest> {
    let popup = EffectRequest::at(EffectKind::ScorePopup, popup_origin).with_magnitude(update.delta as f32);

    let mut bundle = match update.sign {
        DeltaSign::Positive => vec![
            EffectRequest::global(EffectKind::HitSuccess(HitFlourish::Confetti)),
            EffectRequest::global(EffectKind::HitSuccess(HitFlourish::RainbowFlash)),
            popup,
        ],
        DeltaSign::Negative => vec![
            EffectRequest::global(EffectKind::Ambient(AmbientKind::ScreenShake)),
            EffectRequest::global(EffectKind::Taunt),
            popup,
        ],
        DeltaSign::Zero => Vec::new(),
    };

    if let Some(band) = milestone(update) {
        bundle.push(
            EffectRequest::global(EffectKind::Milestone(band)).with_magnitude(update.new_total as f32),
        );
    }
    bundle
}

/// The larger band wins when both are crossed at once
pub fn milestone(update: &ScoreUpdate) -> Option<MilestoneBand> {
    if update.crossed_100 {
        Some(MilestoneBand::Hundred)
    } else if update.crossed_50 {
        Some(MilestoneBand::Fifty)
    } else {
        None
    }
}
