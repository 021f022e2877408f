//! Battle rules: effects, cooldowns, action resolution and the turn loop
//!
//! Every function here operates on a [`BattleState`](crate::BattleState)
//! passed in by the caller. Randomness comes from the caller's seeded RNG.

pub mod cooldown;
pub mod effects;
pub mod log;
pub mod queue;
pub mod resolver;
pub mod turn;

pub use log::{BattleEvent, LogEntry};
pub use queue::{build_queue, QueuedAction};
pub use resolver::{
    compute_damage, estimate_damage, execute, validate, ActionIntent, DamageRoll, ValidatedAction,
};
pub use turn::{resolve_turn, start_turn};
