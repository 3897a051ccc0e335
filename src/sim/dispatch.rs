//! Input dispatcher
//!
//! Resolves a click against the target, the bonus actor or the background,
//! applies the score delta and requests the matching feedback.

use glam::Vec2;

use super::feedback::{gamble_message, lines_for, score_bundle};
use super::score::ScoreUpdate;
use super::state::TargetSkin;
use super::tick::Game;
use crate::effects::{EffectKind, EffectPlayer, EffectRequest, HitFlourish};
use crate::surface::{DisplaySurface, EntityId};

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Target,
    BonusActor,
    Background,
}

/// Result of one dispatched click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Hit { skin: TargetSkin, update: ScoreUpdate },
    Gamble { update: ScoreUpdate },
    Miss { update: ScoreUpdate },
    /// Landed on something that was not clickable
    Ignored,
}

impl ClickOutcome {
    pub fn update(&self) -> Option<&ScoreUpdate> {
        match self {
            ClickOutcome::Hit { update, .. }
            | ClickOutcome::Gamble { update }
            | ClickOutcome::Miss { update } => Some(update),
            ClickOutcome::Ignored => None,
        }
    }
}

impl<S: DisplaySurface, P: EffectPlayer> Game<S, P> {
    /// Which entity is under `point` right now
    ///
    /// A hidden target is transparent to clicks. The bonus actor still catches
    /// clicks while it fades out; those reach [`Game::on_bonus_click`] and are
    /// ignored there.
    pub fn hit_test(&self, point: Vec2) -> ClickTarget {
        let now = self.scheduler.now();

        let target = &self.state.target;
        if target.visible {
            let bounds = self
                .surface
                .element_bounds(EntityId::Target)
                .unwrap_or_else(|| target.bounds());
            if bounds.contains(point) {
                return ClickTarget::Target;
            }
        }

        let bonus = &self.state.bonus;
        if bonus.visible || bonus.is_fading(now) {
            let bounds = self
                .surface
                .element_bounds(EntityId::BonusActor)
                .unwrap_or_else(|| bonus.bounds());
            if bounds.contains(point) {
                return ClickTarget::BonusActor;
            }
        }

        ClickTarget::Background
    }

    /// Route a click at the current time
    pub fn dispatch(&mut self, point: Vec2) -> ClickOutcome {
        let outcome = match self.hit_test(point) {
            ClickTarget::Target => self.on_target_click(point),
            ClickTarget::BonusActor => self.on_bonus_click(),
            ClickTarget::Background => self.on_background_click(point),
        };
        log::debug!(
            "Click at ({:.0}, {:.0}) -> {:?}, score {}",
            point.x,
            point.y,
            outcome,
            self.state.score.total
        );
        outcome
    }

    pub fn on_target_click(&mut self, point: Vec2) -> ClickOutcome {
        let viewport = self.surface.viewport();
        let live_from = self.live_target_bounds();
        let Some((skin, teleport)) =
            self.state
                .target
                .click(&mut self.state.rng, viewport, &self.tuning)
        else {
            log::debug!("Target click ignored: target hidden");
            return ClickOutcome::Ignored;
        };

        let delta = match skin {
            TargetSkin::Good => self.tuning.hit_reward,
            TargetSkin::Hazard => -self.state.rng.points(self.tuning.hazard_penalty),
        };
        let update = self.state.score.apply(delta);

        let kind = match skin {
            TargetSkin::Good => EffectKind::HitSuccess(HitFlourish::ParticleBurst),
            TargetSkin::Hazard => EffectKind::HitHazard,
        };
        self.emit(EffectRequest::at(kind, point).with_magnitude(delta as f32));
        self.feedback(&update);
        self.emit_teleport(teleport, live_from);

        ClickOutcome::Hit { skin, update }
    }

    pub fn on_bonus_click(&mut self) -> ClickOutcome {
        let now = self.scheduler.now();
        let centre = self
            .surface
            .element_bounds(EntityId::BonusActor)
            .unwrap_or_else(|| self.state.bonus.bounds())
            .center();
        let Some(delta) = self
            .state
            .bonus
            .click(&mut self.state.rng, &self.tuning, now)
        else {
            log::debug!("Bonus click ignored: bonus actor not visible");
            return ClickOutcome::Ignored;
        };

        let update = self.state.score.apply(delta);
        let kind = if delta > 0 {
            EffectKind::GambleWin
        } else {
            EffectKind::GambleLose
        };
        self.emit(EffectRequest::at(kind, centre).with_magnitude(delta as f32));
        self.feedback(&update);
        self.set_message(gamble_message(delta));
        log::info!("Gamble resolved to {delta:+}");

        ClickOutcome::Gamble { update }
    }

    pub fn on_background_click(&mut self, point: Vec2) -> ClickOutcome {
        let delta = -self.tuning.miss_penalty;
        let update = self.state.score.apply(delta);
        self.emit(EffectRequest::at(EffectKind::Miss, point).with_magnitude(delta as f32));
        self.feedback(&update);
        ClickOutcome::Miss { update }
    }

    /// Message line plus the screen-wide bundle for a score change
    fn feedback(&mut self, update: &ScoreUpdate) {
        let lines = lines_for(update.sign);
        if !lines.is_empty() {
            let line = lines[self.state.rng.index(lines.len())];
            self.set_message(line);
        }

        let viewport = self.surface.viewport();
        let popup = Vec2::new(
            self.state.rng.uniform(viewport.x * 0.2, viewport.x * 0.8),
            self.state.rng.uniform(viewport.y * 0.2, viewport.y * 0.8),
        );
        for request in score_bundle(update, popup) {
            if let EffectKind::Milestone(band) = request.kind {
                log::info!("Milestone {band:?} reached at {}", update.new_total);
            }
            self.emit(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{MilestoneBand, RecordingPlayer};
    use crate::rng::ChaosRng;
    use crate::settings::{PointRange, Settings, Tuning};
    use crate::sim::feedback::{CHEERS, JEERS};
    use crate::sim::score::DeltaSign;
    use crate::sim::tick::TickInput;
    use crate::surface::FixedSurface;

    type TestGame = Game<FixedSurface, RecordingPlayer>;

    fn game(seed: u64) -> TestGame {
        Game::new(
            &Settings::default(),
            FixedSurface::default(),
            RecordingPlayer::new(),
            ChaosRng::seeded(seed),
        )
        .unwrap()
    }

    fn make_good(g: &mut TestGame) -> Vec2 {
        g.state.target.skin = TargetSkin::Good;
        g.state.target.hazardous = false;
        g.state.target.bounds().center()
    }

    fn make_hazard(g: &mut TestGame) -> Vec2 {
        g.state.target.skin = TargetSkin::Hazard;
        g.state.target.hazardous = true;
        g.state.target.bounds().center()
    }

    const NOWHERE: Vec2 = Vec2::new(-50.0, -50.0);

    #[test]
    fn test_good_hit_from_zero() {
        let mut g = game(1);
        let p = make_good(&mut g);
        let before = g.state.target.teleports;
        let outcome = g.dispatch(p);
        let update = *outcome.update().unwrap();
        assert!(matches!(outcome, ClickOutcome::Hit { skin: TargetSkin::Good, .. }));
        assert_eq!(update.delta, 10);
        assert_eq!(g.current_score(), 10);
        assert!(!update.crossed_50);
        assert_eq!(g.state.target.teleports, before + 1, "hit always relocates");
        assert!(CHEERS.contains(&g.current_message()));
        let burst = g
            .player()
            .last_of(EffectKind::HitSuccess(HitFlourish::ParticleBurst))
            .unwrap();
        assert_eq!(burst.origin, Some(p));
    }

    #[test]
    fn test_good_hit_crosses_fifty() {
        let mut g = game(2);
        g.state.score.apply(45);
        let p = make_good(&mut g);
        let update = *g.dispatch(p).update().unwrap();
        assert_eq!(update.new_total, 55);
        assert!(update.crossed_50);
        assert!(g.player().contains(EffectKind::Milestone(MilestoneBand::Fifty)));
    }

    #[test]
    fn test_hazard_hit_penalty_range() {
        for seed in 0..30 {
            let mut g = game(seed);
            let p = make_hazard(&mut g);
            let outcome = g.dispatch(p);
            assert!(matches!(outcome, ClickOutcome::Hit { skin: TargetSkin::Hazard, .. }));
            let delta = outcome.update().unwrap().delta;
            assert!((-20..=-10).contains(&delta), "delta {delta}");
            assert!(g.player().contains(EffectKind::HitHazard));
            assert!(g.player().contains(EffectKind::Taunt));
            assert!(JEERS.contains(&g.current_message()));
        }
    }

    #[test]
    fn test_hazard_from_ninety_five() {
        let mut tuning = Tuning::default();
        tuning.hazard_penalty = PointRange::new(15, 15);
        let settings = Settings {
            tuning: Some(tuning),
            ..Settings::default()
        };
        let mut g = Game::new(
            &settings,
            FixedSurface::default(),
            RecordingPlayer::new(),
            ChaosRng::seeded(3),
        )
        .unwrap();
        g.state.score.apply(95);
        let p = make_hazard(&mut g);
        let update = *g.dispatch(p).update().unwrap();
        assert_eq!(update.new_total, 80);
        assert!(!update.crossed_50 && !update.crossed_100);
        assert!(!g.player().requests.iter().any(|r| matches!(r.kind, EffectKind::Milestone(_))));
    }

    #[test]
    fn test_background_click_penalty() {
        let mut g = game(4);
        let outcome = g.dispatch(NOWHERE);
        let update = *outcome.update().unwrap();
        assert!(matches!(outcome, ClickOutcome::Miss { .. }));
        assert_eq!(update.new_total, -5);
        assert_eq!(update.sign, DeltaSign::Negative);
        assert_eq!(g.player().last_of(EffectKind::Miss).unwrap().origin, Some(NOWHERE));
    }

    #[test]
    fn test_hidden_target_click_is_ignored() {
        let mut g = game(5);
        g.state.target.hide();
        let pos = g.state.target.pos;
        assert_eq!(g.on_target_click(Vec2::ZERO), ClickOutcome::Ignored);
        assert_eq!(g.current_score(), 0);
        assert_eq!(g.state.target.pos, pos);
    }

    #[test]
    fn test_hidden_bonus_click_is_ignored() {
        let mut g = game(6);
        g.player_mut().clear();
        assert_eq!(g.on_bonus_click(), ClickOutcome::Ignored);
        assert_eq!(g.current_score(), 0);
        assert!(g.player().requests.is_empty());
    }

    #[test]
    fn test_bonus_gamble_hides_and_scores() {
        for seed in 0..30 {
            let mut g = game(seed);
            let now = g.now();
            let viewport = g.surface().viewport();
            g.state.bonus.spawn(&mut g.state.rng, viewport, now, 5_000);
            // Keep the target out of the way
            g.state.target.hide();
            let centre = g.state.bonus.bounds().center();

            let outcome = g.dispatch(centre);
            let delta = outcome.update().unwrap().delta;
            assert!(matches!(outcome, ClickOutcome::Gamble { .. }));
            assert!((40..=50).contains(&delta) || (-20..=-10).contains(&delta));
            assert!(!g.state.bonus.visible);
            assert!(g.current_message().starts_with("Cheshire Cat"));
            let kind = if delta > 0 { EffectKind::GambleWin } else { EffectKind::GambleLose };
            assert_eq!(g.player().last_of(kind).unwrap().origin, Some(centre));
        }
    }

    #[test]
    fn test_click_during_bonus_fade_is_silent() {
        let mut g = game(7);
        let viewport = g.surface().viewport();
        g.state.bonus.spawn(&mut g.state.rng, viewport, 0, 5_000);
        g.state.target.hide();
        let centre = g.state.bonus.bounds().center();
        g.dispatch(centre);
        let score = g.current_score();

        // Second click lands inside the fade-out window
        let outcome = g.dispatch(centre);
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(g.current_score(), score);

        // After the fade, the same spot is empty space
        g.advance(400, &TickInput::default());
        g.state.target.hide();
        let outcome = g.dispatch(centre);
        assert!(matches!(outcome, ClickOutcome::Miss { .. }));
    }

    #[test]
    fn test_good_hit_emits_effects_in_order() {
        let mut g = game(8);
        let p = make_good(&mut g);
        g.player_mut().clear();
        g.dispatch(p);
        let kinds: Vec<_> = g.player().requests.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EffectKind::HitSuccess(HitFlourish::ParticleBurst),
                EffectKind::HitSuccess(HitFlourish::Confetti),
                EffectKind::HitSuccess(HitFlourish::RainbowFlash),
                EffectKind::ScorePopup,
                EffectKind::TeleportOut,
                EffectKind::TeleportIn,
            ]
        );
    }

    #[test]
    fn test_popup_inside_central_area() {
        let mut g = game(9);
        for _ in 0..20 {
            g.dispatch(NOWHERE);
        }
        let (w, h) = (g.surface().viewport_width(), g.surface().viewport_height());
        for r in g.player().requests.iter().filter(|r| r.kind == EffectKind::ScorePopup) {
            let o = r.origin.unwrap();
            assert!(o.x >= w * 0.2 && o.x < w * 0.8);
            assert!(o.y >= h * 0.2 && o.y < h * 0.8);
        }
    }

    #[test]
    fn test_simple_tuning_never_hazardous() {
        let settings = Settings {
            tuning: Some(Tuning::simple()),
            ..Settings::default()
        };
        let mut g = Game::new(
            &settings,
            FixedSurface::default(),
            RecordingPlayer::new(),
            ChaosRng::seeded(10),
        )
        .unwrap();
        for _ in 0..50 {
            let p = g.state.target.bounds().center();
            let outcome = g.dispatch(p);
            assert!(matches!(outcome, ClickOutcome::Hit { skin: TargetSkin::Good, .. }));
        }
        assert_eq!(g.current_score(), 500);
    }
}
