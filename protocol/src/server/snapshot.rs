//! Battle snapshot types
//!
//! These types are the JSON shape of a battle as reported back to callers
//! after every command. They are plain data: the engine builds them, the
//! caller serializes, persists or broadcasts them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::battle::{FighterRef, Side};

/// Turn phase as reported on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseView {
    StartTurn,
    CollectingActions,
    BuildQueue,
    ExecutingQueue,
    EndTurn,
    Finished,
}

/// Full battle snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub battle_id: u64,
    pub turn: u32,
    pub phase: PhaseView,
    pub players: Vec<PlayerView>,

    /// Winning side, set only once the battle is finished
    #[serde(default)]
    pub winner: Option<Side>,

    /// Finished without a winner (both teams fainted together)
    #[serde(default)]
    pub draw: bool,

    /// Unix time in milliseconds after which a missing side is skipped
    #[serde(default)]
    pub turn_deadline_ms: Option<u64>,

    /// Total number of log entries the battle has produced
    pub log_len: usize,

    /// Tail of the battle log (possibly truncated)
    #[serde(default)]
    pub log: Vec<LogEntryView>,
}

impl BattleSnapshot {
    /// Check if the battle has ended
    pub fn is_finished(&self) -> bool {
        self.phase == PhaseView::Finished
    }

    /// Get a player by side
    pub fn player(&self, side: Side) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.side == side)
    }

    /// Find the side a player id plays on
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        self.players
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.side)
    }

    /// Get a fighter by reference
    pub fn fighter(&self, fighter: FighterRef) -> Option<&FighterView> {
        self.player(fighter.side)?.fighters.get(fighter.slot)
    }
}

/// One player's side of the battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: String,
    pub side: Side,

    /// Energy counts keyed by energy name ("fire", "colorless", ...)
    pub energy: BTreeMap<String, u32>,

    pub fighters: Vec<FighterView>,

    /// Whether this player has already submitted for the current turn
    #[serde(default)]
    pub submitted: bool,
}

impl PlayerView {
    /// Count non-fainted fighters
    pub fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| !f.fainted).count()
    }

    /// Total energy of every kind
    pub fn total_energy(&self) -> u32 {
        self.energy.values().sum()
    }
}

/// One fighter's visible state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub slot: usize,
    pub template_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub hp: u32,
    pub max_hp: u32,
    pub fainted: bool,

    #[serde(default)]
    pub effects: Vec<EffectView>,

    /// Turns remaining per move id
    #[serde(default)]
    pub cooldowns: BTreeMap<String, u32>,
}

/// An active effect on a fighter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: String,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

/// One entry of the battle log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntryView {
    /// Position in the full log (0-based)
    pub seq: usize,
    pub turn: u32,
    #[serde(flatten)]
    pub event: EventView,
}

/// Battle events as rendered for a UI or replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventView {
    BattleStarted,
    TurnStarted,
    EnergyGained {
        side: Side,
        energy: String,
        amount: u32,
    },
    EnergySpent {
        side: Side,
        spent: BTreeMap<String, u32>,
    },
    ActionUsed {
        actor: FighterRef,
        move_id: String,
        targets: Vec<FighterRef>,
    },
    ActionFailed {
        actor: FighterRef,
        move_id: String,
        reason: String,
    },
    Blocked {
        actor: FighterRef,
        target: FighterRef,
        move_id: String,
    },
    Damage {
        #[serde(default)]
        source: Option<FighterRef>,
        target: FighterRef,
        amount: u32,
        effectiveness: f32,
        critical: bool,
        hp: u32,
    },
    Heal {
        #[serde(default)]
        source: Option<FighterRef>,
        target: FighterRef,
        amount: u32,
        hp: u32,
    },
    EffectApplied {
        target: FighterRef,
        effect: String,
        duration: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i32>,
    },
    EffectExpired {
        target: FighterRef,
        effect: String,
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
        #[serde(default)]
        winner: Option<Side>,
    },
}

impl EventView {
    /// Fighters this event concerns (actor first, then targets)
    pub fn fighters(&self) -> Vec<FighterRef> {
        match self {
            EventView::ActionUsed { actor, targets, .. } => {
                let mut all = vec![*actor];
                all.extend(targets.iter().copied());
                all
            }
            EventView::ActionFailed { actor, .. } => vec![*actor],
            EventView::Blocked { actor, target, .. } => vec![*actor, *target],
            EventView::Damage { source, target, .. } | EventView::Heal { source, target, .. } => {
                source.iter().copied().chain(std::iter::once(*target)).collect()
            }
            EventView::EffectApplied { target, .. }
            | EventView::EffectExpired { target, .. }
            | EventView::Fainted { target } => vec![*target],
            _ => Vec::new(),
        }
    }
}
