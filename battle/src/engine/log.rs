//! Battle log events

use pokearena_protocol::{FighterRef, Side};

use crate::error::FailureReason;
use crate::types::{EffectKind, Energy, EnergyPool};

/// Something that happened in a battle, in the order it happened
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum BattleEvent {
    BattleStarted,
    TurnStarted,
    EnergyGained {
        side: Side,
        energy: Energy,
        amount: u32,
    },
    EnergySpent {
        side: Side,
        spent: EnergyPool,
    },
    ActionUsed {
        actor: FighterRef,
        move_id: String,
        targets: Vec<FighterRef>,
    },
    ActionFailed {
        actor: FighterRef,
        move_id: String,
        reason: FailureReason,
    },
    /// A hostile move hit an invulnerable target
    Blocked {
        actor: FighterRef,
        target: FighterRef,
        move_id: String,
    },
    /// HP lost. `source` is None for damage over time.
    Damage {
        source: Option<FighterRef>,
        target: FighterRef,
        amount: u32,
        effectiveness: f32,
        critical: bool,
        hp: u32,
    },
    Heal {
        source: Option<FighterRef>,
        target: FighterRef,
        amount: u32,
        hp: u32,
    },
    EffectApplied {
        target: FighterRef,
        kind: EffectKind,
        duration: u32,
        value: Option<i32>,
    },
    EffectExpired {
        target: FighterRef,
        kind: EffectKind,
    },
    Fainted {
        target: FighterRef,
    },
    TurnSkipped {
        side: Side,
        timed_out: bool,
    },
    Surrendered {
        side: Side,
    },
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// The fighter this event happened to, if any
    pub fn target(&self) -> Option<FighterRef> {
        match self {
            BattleEvent::Blocked { target, .. }
            | BattleEvent::Damage { target, .. }
            | BattleEvent::Heal { target, .. }
            | BattleEvent::EffectApplied { target, .. }
            | BattleEvent::EffectExpired { target, .. }
            | BattleEvent::Fainted { target } => Some(*target),
            BattleEvent::ActionUsed { actor, .. } | BattleEvent::ActionFailed { actor, .. } => {
                Some(*actor)
            }
            _ => None,
        }
    }
}

/// A log event stamped with the turn it happened in
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub event: BattleEvent,
}
