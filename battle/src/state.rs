//! BattleState - one live match

use std::time::SystemTime;

use pokearena_protocol::{FighterRef, Side};

use crate::engine::log::{BattleEvent, LogEntry};
use crate::error::EngineError;
use crate::types::{Fighter, Player};

/// Match identifier assigned by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleId(pub u64);

impl std::fmt::Display for BattleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BattleId {
    fn from(id: u64) -> Self {
        BattleId(id)
    }
}

/// Turn phase. One full cycle per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    StartTurn,
    CollectingActions,
    BuildQueue,
    ExecutingQueue,
    EndTurn,
    Finished,
}

impl Phase {
    /// Whether the turn cycle allows going from `self` to `to`
    pub fn can_transition(self, to: Phase) -> bool {
        matches!(
            (self, to),
            (Phase::StartTurn, Phase::CollectingActions)
                | (Phase::CollectingActions, Phase::BuildQueue)
                | (Phase::BuildQueue, Phase::ExecutingQueue)
                | (Phase::ExecutingQueue, Phase::EndTurn)
                | (Phase::EndTurn, Phase::StartTurn)
                | (Phase::EndTurn, Phase::Finished)
        )
    }
}

/// How a finished battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// The other team fainted
    Knockout { winner: Side },
    /// The other player conceded
    Surrender { winner: Side },
    /// Both teams fainted in the same sweep
    Draw,
}

impl Outcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Knockout { winner } | Outcome::Surrender { winner } => Some(*winner),
            Outcome::Draw => None,
        }
    }
}

/// Full state of one match
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub id: BattleId,

    /// Current turn (1-based)
    pub turn: u32,

    pub phase: Phase,

    /// Players indexed by side (p1 = 0, p2 = 1)
    pub players: [Player; 2],

    /// After this instant a side that has not submitted is skipped
    pub turn_deadline: Option<SystemTime>,

    /// Set once the battle is finished
    pub outcome: Option<Outcome>,

    /// Append-only event log
    pub log: Vec<LogEntry>,
}

impl BattleState {
    /// Create a battle at turn 1, before the first StartTurn has run
    pub fn new(id: BattleId, player1: Player, player2: Player) -> Self {
        let mut state = Self {
            id,
            turn: 1,
            phase: Phase::StartTurn,
            players: [player1, player2],
            turn_deadline: None,
            outcome: None,
            log: Vec::new(),
        };
        state.push(BattleEvent::BattleStarted);
        state
    }

    /// Get a player by side
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    /// Get a player by side mutably
    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn player1(&self) -> &Player {
        self.player(Side::P1)
    }

    pub fn player2(&self) -> &Player {
        self.player(Side::P2)
    }

    /// Find the side a player id plays on
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.player(*side).id == player_id)
    }

    /// Get a fighter by reference
    pub fn fighter(&self, at: FighterRef) -> Option<&Fighter> {
        self.player(at.side).fighter(at.slot)
    }

    /// Get a fighter by reference mutably
    pub fn fighter_mut(&mut self, at: FighterRef) -> Option<&mut Fighter> {
        self.player_mut(at.side).fighter_mut(at.slot)
    }

    /// References to every fighter, p1 first, slots ascending
    pub fn fighter_refs(&self) -> Vec<FighterRef> {
        Side::BOTH
            .into_iter()
            .flat_map(|side| {
                self.player(side)
                    .fighters
                    .iter()
                    .map(move |f| FighterRef::new(side, f.slot))
            })
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Winning side, if the battle finished with one
    pub fn winner(&self) -> Option<Side> {
        self.outcome.and_then(|o| o.winner())
    }

    /// Append an event stamped with the current turn
    pub fn push(&mut self, event: BattleEvent) {
        self.log.push(LogEntry {
            turn: self.turn,
            event,
        });
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Log entries from position `seq` on
    pub fn log_since(&self, seq: usize) -> &[LogEntry] {
        self.log.get(seq..).unwrap_or(&[])
    }

    /// Move to the next phase of the turn cycle
    pub(crate) fn transition(&mut self, to: Phase) -> Result<(), EngineError> {
        let from = self.phase;
        debug_assert!(from.can_transition(to), "illegal phase transition {from:?} -> {to:?}");
        if !from.can_transition(to) {
            return Err(EngineError::PhaseViolation { from, to });
        }
        self.phase = to;
        Ok(())
    }

    /// End the battle from any live phase. Logs the result.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.phase = Phase::Finished;
        self.outcome = Some(outcome);
        self.turn_deadline = None;
        self.push(BattleEvent::BattleEnded {
            winner: outcome.winner(),
        });
    }

    /// Check HP bounds on every fighter
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        for side in Side::BOTH {
            for f in &self.player(side).fighters {
                if f.current_hp > f.max_hp {
                    return Err(EngineError::HpOutOfRange {
                        fighter: FighterRef::new(side, f.slot),
                        hp: f.current_hp,
                        max_hp: f.max_hp,
                    });
                }
            }
        }
        Ok(())
    }
}
