//! Game controller and event loop
//!
//! [`Game`] is the single owner of all mutable state. Timer records and player
//! clicks are merged into one ordered stream on a virtual clock, so every
//! callback runs to completion before the next one starts.

use glam::Vec2;
use serde::Serialize;

use super::feedback::IDLE_MESSAGE;
use super::schedule::{LoopKind, LoopStats, Scheduler, Task};
use super::state::{BonusActor, GameState, Target};
use crate::Millis;
use crate::consts::MAX_TASKS_PER_ADVANCE;
use crate::effects::{EffectPlayer, EffectRequest};
use crate::error::Result;
use crate::rng::ChaosRng;
use crate::settings::{DelayRange, Settings, Tuning};
use crate::surface::DisplaySurface;

/// A click captured by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Capture time on the game clock
    pub at: Millis,
    pub point: Vec2,
}

/// Input gathered between two advances
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub clicks: Vec<Click>,
}

impl TickInput {
    pub fn click(at: Millis, point: Vec2) -> Self {
        Self {
            clicks: vec![Click { at, point }],
        }
    }
}

/// Serializable view for host UI binding and debugging
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub seed: u64,
    pub now: Millis,
    pub score: i64,
    pub message: String,
    pub target: Target,
    pub bonus: BonusActor,
    pub loops: Vec<(LoopKind, LoopStats)>,
}

/// Owns the game state, the scheduler and the host collaborators
pub struct Game<S: DisplaySurface, P: EffectPlayer> {
    pub(crate) state: GameState,
    pub(crate) scheduler: Scheduler,
    pub(crate) tuning: Tuning,
    pub(crate) ambient_enabled: bool,
    pub(crate) surface: S,
    pub(crate) player: P,
    /// Clicks held back by the task ceiling, replayed on the next advance
    pub(crate) deferred: Vec<Click>,
}

impl<S: DisplaySurface, P: EffectPlayer> Game<S, P> {
    /// Validate settings, place the target and arm every loop
    pub fn new(settings: &Settings, surface: S, player: P, rng: ChaosRng) -> Result<Self> {
        let tuning = settings.tuning();
        tuning.validate()?;

        let mut game = Self {
            state: GameState::new(rng, &tuning),
            scheduler: Scheduler::new(),
            tuning,
            ambient_enabled: settings.ambient_disturbances,
            surface,
            player,
            deferred: Vec::new(),
        };
        game.start();
        Ok(game)
    }

    fn start(&mut self) {
        self.state.message.text = IDLE_MESSAGE.to_string();
        self.teleport_target();
        for kind in LoopKind::ALL {
            self.arm_loop(kind);
        }
        log::info!(
            "Game started with seed {} on a {}x{} viewport",
            self.state.rng.seed(),
            self.surface.viewport_width(),
            self.surface.viewport_height()
        );
    }

    pub(crate) fn loop_delay(&self, kind: LoopKind) -> DelayRange {
        match kind {
            LoopKind::Teleport => self.tuning.teleport_delay,
            LoopKind::ExtraTeleport => self.tuning.extra_teleport_delay,
            LoopKind::Burst => self.tuning.burst_delay,
            LoopKind::BonusSpawn => self.tuning.bonus_spawn_delay,
            LoopKind::Ambient => self.tuning.ambient_delay,
        }
    }

    /// Draw a fresh delay and queue the next iteration of `kind`
    pub(crate) fn arm_loop(&mut self, kind: LoopKind) {
        let delay = self.state.rng.delay(self.loop_delay(kind));
        let fire_at = self.scheduler.schedule_in(delay, Task::Loop(kind));
        log::trace!("{kind:?} loop armed for {fire_at}ms");
    }

    /// Advance the clock by `dt`, interleaving captured clicks with due timers
    ///
    /// A click is resolved against the state at its capture time: tasks due
    /// strictly earlier run first, tasks due at the same instant run after it.
    /// If the task ceiling is hit, the remaining clicks wait for the next
    /// advance so they still run after every task captured before them.
    /// Returns the number of scheduler tasks that ran.
    pub fn advance(&mut self, dt: Millis, input: &TickInput) -> usize {
        let end = self.scheduler.now().saturating_add(dt);

        let mut clicks = std::mem::take(&mut self.deferred);
        clicks.extend(input.clicks.iter().copied());
        clicks.sort_by_key(|c| c.at);

        let mut ran = 0;
        let mut clicks = clicks.into_iter();
        while let Some(click) = clicks.next() {
            let at = click.at.min(end);
            if !self.run_due(at, false, &mut ran) {
                self.deferred.push(click);
                self.deferred.extend(clicks);
                break;
            }
            self.scheduler.advance_to(at);
            self.dispatch(click.point);
        }
        let drained = self.run_due(end, true, &mut ran);
        if !drained || !self.deferred.is_empty() {
            log::warn!(
                "Task ceiling reached at {}ms, deferring the rest ({} clicks held)",
                self.scheduler.now(),
                self.deferred.len()
            );
        }
        self.scheduler.advance_to(end);
        ran
    }

    /// Advance with no input until the clock reads `t`
    pub fn run_until(&mut self, t: Millis) -> usize {
        let dt = t.saturating_sub(self.scheduler.now());
        self.advance(dt, &TickInput::default())
    }

    /// Run tasks due before `until` (or at it, if `inclusive`)
    ///
    /// Returns false if the ceiling stopped it with due tasks left over.
    fn run_due(&mut self, until: Millis, inclusive: bool, ran: &mut usize) -> bool {
        loop {
            let due = self
                .scheduler
                .next_fire_at()
                .is_some_and(|t| if inclusive { t <= until } else { t < until });
            if !due {
                return true;
            }
            if *ran >= MAX_TASKS_PER_ADVANCE {
                return false;
            }
            let next = if inclusive {
                self.scheduler.pop_due(until)
            } else {
                self.scheduler.pop_before(until)
            };
            let Some((at, task)) = next else {
                return true;
            };
            self.run_task(at, task);
            *ran += 1;
        }
    }

    /// Clicks waiting for the next advance
    pub fn deferred_clicks(&self) -> &[Click] {
        &self.deferred
    }

    pub(crate) fn emit(&mut self, request: EffectRequest) {
        self.player.play(&request);
    }

    /// Show a feedback line and queue its expiry
    pub(crate) fn set_message(&mut self, text: impl Into<String>) {
        let generation = self.state.message.set(text);
        self.scheduler
            .schedule_in(self.tuning.message_duration_ms, Task::ClearMessage { generation });
    }

    pub fn current_score(&self) -> i64 {
        self.state.score.total
    }

    pub fn current_message(&self) -> &str {
        &self.state.message.text
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            seed: self.state.rng.seed(),
            now: self.scheduler.now(),
            score: self.state.score.total,
            message: self.state.message.text.clone(),
            target: self.state.target.clone(),
            bonus: self.state.bonus.clone(),
            loops: LoopKind::ALL
                .iter()
                .map(|&k| (k, self.scheduler.stats(k)))
                .collect(),
        }
    }
}
