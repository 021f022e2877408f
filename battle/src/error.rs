//! Error types for the battle engine

use pokearena_protocol::{FighterRef, Side};
use thiserror::Error;

use crate::state::{BattleId, Phase};

/// Why an action could not be used
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailureReason {
    #[error("not enough energy")]
    NotEnoughEnergy,

    #[error("move is on cooldown")]
    OnCooldown,

    #[error("invalid target")]
    InvalidTarget,

    #[error("actor is incapacitated")]
    ActorIncapacitated,

    #[error("actor has fainted")]
    ActorDead,

    #[error("move not found")]
    MoveNotFound,

    #[error("no fighter in that slot")]
    ActorNotFound,
}

impl FailureReason {
    /// Reason code as reported on the wire
    pub fn as_id(&self) -> &'static str {
        match self {
            FailureReason::NotEnoughEnergy => "not_enough_energy",
            FailureReason::OnCooldown => "on_cooldown",
            FailureReason::InvalidTarget => "invalid_target",
            FailureReason::ActorIncapacitated => "actor_incapacitated",
            FailureReason::ActorDead => "actor_dead",
            FailureReason::MoveNotFound => "move_not_found",
            FailureReason::ActorNotFound => "actor_not_found",
        }
    }
}

/// A rejected action. Nothing was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{actor} cannot use {move_id}: {reason}")]
pub struct ActionFailure {
    pub actor: FighterRef,
    pub move_id: String,
    pub reason: FailureReason,
}

/// Broken engine invariants. These are bugs, not bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal phase transition {from:?} -> {to:?}")]
    PhaseViolation { from: Phase, to: Phase },

    #[error("{fighter} has {hp} hp, above its max of {max_hp}")]
    HpOutOfRange {
        fighter: FighterRef,
        hp: u32,
        max_hp: u32,
    },
}

/// Errors returned by the battle manager and sessions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManagerError {
    #[error("battle {0} not found")]
    BattleNotFound(BattleId),

    #[error("{player_id} is not part of battle {battle}")]
    NotAParticipant { battle: BattleId, player_id: String },

    #[error("battle {0} is finished")]
    BattleFinished(BattleId),

    #[error("battle {0} is not finished")]
    NotFinished(BattleId),

    #[error("{0} already submitted this turn")]
    AlreadySubmitted(Side),

    #[error("slot {0} was given more than one action")]
    DuplicateActor(usize),

    #[error("action {index} rejected: {failure}")]
    Rejected { index: usize, failure: ActionFailure },

    #[error("submitted actions cost more energy than is available")]
    NotEnoughEnergy,

    #[error("invalid team: {0}")]
    InvalidTeam(String),

    #[error("no fighter {0} on this team")]
    UnknownFighter(String),

    #[error("battle {battle} failed: {reason}")]
    BattleFailed { battle: BattleId, reason: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = ActionFailure {
            actor: FighterRef::new(Side::P1, 0),
            move_id: "ember".to_string(),
            reason: FailureReason::OnCooldown,
        };
        assert_eq!(failure.to_string(), "p1:0 cannot use ember: move is on cooldown");
        assert_eq!(failure.reason.as_id(), "on_cooldown");
    }

    #[test]
    fn test_manager_error_display() {
        let err = ManagerError::Rejected {
            index: 1,
            failure: ActionFailure {
                actor: FighterRef::new(Side::P2, 2),
                move_id: "surf".to_string(),
                reason: FailureReason::NotEnoughEnergy,
            },
        };
        assert_eq!(
            err.to_string(),
            "action 1 rejected: p2:2 cannot use surf: not enough energy"
        );
        assert_eq!(
            ManagerError::BattleNotFound(BattleId(7)).to_string(),
            "battle 7 not found"
        );
    }
}
