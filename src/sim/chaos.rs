//! Chaos scheduler actions
//!
//! What each scheduled task does when it fires. Loops reschedule themselves
//! before acting, so an action that turns out to be a no-op never stalls its
//! loop.

use super::feedback::IDLE_MESSAGE;
use super::schedule::{LoopKind, Task};
use super::state::Teleport;
use super::tick::Game;
use crate::Millis;
use crate::effects::{AmbientKind, EffectKind, EffectPlayer, EffectRequest};
use crate::rng::pick_at;
use crate::surface::{DisplaySurface, EntityId, Rect};

impl<S: DisplaySurface, P: EffectPlayer> Game<S, P> {
    pub(crate) fn run_task(&mut self, at: Millis, task: Task) {
        match task {
            Task::Loop(kind) => self.run_loop(kind),
            Task::BurstTeleport => {
                if !self.relocate_if_visible() {
                    log::debug!("Burst teleport at {at}ms skipped: target hidden");
                }
            }
            Task::Reappear => self.reappear(),
            Task::BonusAutoHide => self.bonus_auto_hide(at),
            Task::Disturbance(kind) => self.disturb(kind),
            Task::ClearMessage { generation } => {
                if self.state.message.generation == generation {
                    self.state.message.text = IDLE_MESSAGE.to_string();
                }
            }
        }
    }

    fn run_loop(&mut self, kind: LoopKind) {
        self.arm_loop(kind);
        self.scheduler.record_fire(kind);

        let acted = match kind {
            LoopKind::Teleport => self.teleport_tick(),
            LoopKind::ExtraTeleport => self.extra_teleport_tick(),
            LoopKind::Burst => self.burst_tick(),
            LoopKind::BonusSpawn => self.bonus_spawn_tick(),
            LoopKind::Ambient => self.ambient_tick(),
        };
        if !acted {
            self.scheduler.record_ignored(kind);
        }
    }

    /// Always relocates a visible target, sometimes hides it afterwards
    fn teleport_tick(&mut self) -> bool {
        if !self.relocate_if_visible() {
            log::debug!("Teleport tick ignored: target hidden");
            return false;
        }
        if self.state.rng.chance(self.tuning.hide_chance) {
            self.hide_target();
        }
        true
    }

    fn extra_teleport_tick(&mut self) -> bool {
        if !self.state.rng.chance(self.tuning.extra_teleport_chance) {
            return false;
        }
        let moved = self.relocate_if_visible();
        if !moved {
            log::debug!("Extra teleport ignored: target hidden");
        }
        moved
    }

    /// Queue a handful of teleports in quick succession
    fn burst_tick(&mut self) -> bool {
        if !self.state.rng.chance(self.tuning.burst_chance) {
            return false;
        }
        let count = self.state.rng.int_inclusive(
            self.tuning.burst_min_count as i64,
            self.tuning.burst_max_count as i64,
        );
        for i in 0..count.max(0) as u64 {
            self.scheduler
                .schedule_in(i.saturating_mul(self.tuning.burst_spacing_ms), Task::BurstTeleport);
        }
        log::debug!("Burst of {count} teleports queued");
        count > 0
    }

    fn bonus_spawn_tick(&mut self) -> bool {
        let now = self.scheduler.now();
        let viewport = self.surface.viewport();
        let lifetime = self.tuning.bonus_lifetime_ms;
        if !self
            .state
            .bonus
            .spawn(&mut self.state.rng, viewport, now, lifetime)
        {
            log::debug!("Bonus spawn ignored: bonus actor already visible");
            return false;
        }
        self.scheduler.schedule_in(lifetime, Task::BonusAutoHide);
        let pos = self.state.bonus.pos;
        log::info!("Bonus actor appeared at ({:.0}, {:.0})", pos.x, pos.y);
        true
    }

    /// One roll picks the primary disturbance and decides the extra layers
    fn ambient_tick(&mut self) -> bool {
        if !self.ambient_enabled {
            log::debug!("Ambient tick ignored: disturbances disabled");
            return false;
        }
        let roll = self.state.rng.roll();
        let options = self.tuning.ambient_weights.options();
        let primary = pick_at(&options, roll).copied().flatten();

        let mut acted = false;
        if let Some(kind) = primary {
            self.disturb(kind);
            acted = true;
        }
        for i in 0..self.tuning.ambient_layers.len() {
            let layer = self.tuning.ambient_layers[i];
            if roll > layer.above {
                self.scheduler
                    .schedule_in(layer.offset_ms, Task::Disturbance(layer.kind));
                acted = true;
            }
        }
        acted
    }

    fn disturb(&mut self, kind: AmbientKind) {
        if !self.ambient_enabled {
            return;
        }
        log::debug!("Ambient disturbance {kind:?}");
        self.emit(EffectRequest::global(EffectKind::Ambient(kind)));
    }

    fn reappear(&mut self) {
        if self.state.target.visible {
            log::debug!("Reappear skipped: target already visible");
            return;
        }
        self.teleport_target();
        log::debug!("Target reappeared");
    }

    fn bonus_auto_hide(&mut self, at: Millis) {
        if self.state.bonus.auto_hide_due(at) {
            self.state.bonus.hide(at);
            log::info!("Bonus actor left unclicked");
        } else {
            log::debug!("Stale bonus auto-hide at {at}ms ignored");
        }
    }

    /// Scheduler-driven relocation; hidden targets wait for their reappear task
    fn relocate_if_visible(&mut self) -> bool {
        if !self.state.target.visible {
            return false;
        }
        self.teleport_target();
        true
    }

    /// Hide the target and queue its return
    pub(crate) fn hide_target(&mut self) {
        if !self.state.target.hide() {
            return;
        }
        let delay = self.state.rng.delay(self.tuning.reappear_delay);
        self.scheduler.schedule_in(delay, Task::Reappear);
        log::debug!("Target vanished for {delay}ms");
    }

    pub(crate) fn teleport_target(&mut self) {
        let viewport = self.surface.viewport();
        let live_from = self.live_target_bounds();
        let teleport = self
            .state
            .target
            .teleport(&mut self.state.rng, viewport, &self.tuning);
        self.emit_teleport(teleport, live_from);
    }

    /// Host-reported bounds of a visible target
    pub(crate) fn live_target_bounds(&self) -> Option<Rect> {
        if self.state.target.visible {
            self.surface.element_bounds(EntityId::Target)
        } else {
            None
        }
    }

    /// Smoke out (only if it was visible) and smoke in
    pub(crate) fn emit_teleport(&mut self, teleport: Teleport, live_from: Option<Rect>) {
        if let Some(from) = teleport.from {
            let origin = live_from.unwrap_or(from).center();
            self.emit(EffectRequest::at(EffectKind::TeleportOut, origin));
        }
        self.emit(EffectRequest::at(EffectKind::TeleportIn, teleport.to.center()));
    }
}
