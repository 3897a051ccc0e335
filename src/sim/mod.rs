//! Game simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders or sleeps:
//! - Time only moves when the host advances the virtual clock
//! - Every random draw goes through the game's seedable RNG
//! - Shared state is written only by the `Game` controller

mod chaos;
pub mod dispatch;
pub mod feedback;
pub mod schedule;
pub mod score;
pub mod state;
pub mod tick;

pub use dispatch::{ClickOutcome, ClickTarget};
pub use schedule::{LoopKind, LoopStats, Scheduler, Task};
pub use score::{DeltaSign, ScoreState, ScoreUpdate};
pub use state::{BonusActor, GameState, Message, Target, TargetPhase, TargetSkin, Teleport};
pub use tick::{Click, Game, Snapshot, TickInput};
