//! Battle - one live match with its RNG and pending submissions

use std::collections::HashSet;
use std::sync::Arc;
use std::time::SystemTime;

use pokearena_protocol::Side;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::BattleConfig;
use crate::engine::log::BattleEvent;
use crate::engine::resolver::{self, ActionIntent};
use crate::engine::turn;
use crate::error::ManagerError;
use crate::state::{BattleId, BattleState, Outcome, Phase};
use crate::types::{EnergyCost, Player, PokemonTemplate};

/// A player joining a battle with their team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSetup {
    pub id: String,
    /// Templates in slot order
    pub team: Vec<PokemonTemplate>,
}

impl PlayerSetup {
    pub fn new(id: impl Into<String>, team: Vec<PokemonTemplate>) -> Self {
        Self {
            id: id.into(),
            team,
        }
    }
}

/// What a submission did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    /// Stored; the other side has not submitted yet
    Waiting,
    /// Both sides were in and the turn was resolved
    Resolved,
}

/// One live match
///
/// Owns the state, the seeded RNG every random decision draws from, and
/// each side's pending submission for the current turn. Submissions stay
/// private until the turn resolves.
#[derive(Debug, Clone)]
pub struct Battle {
    state: BattleState,
    rng: StdRng,
    config: Arc<BattleConfig>,
    pending: [Option<Vec<ActionIntent>>; 2],
}

impl Battle {
    /// Create a battle and run its first StartTurn
    pub fn new(
        id: BattleId,
        player1: PlayerSetup,
        player2: PlayerSetup,
        seed: u64,
        config: Arc<BattleConfig>,
        now: SystemTime,
    ) -> Result<Self, ManagerError> {
        if player1.id == player2.id {
            return Err(ManagerError::InvalidTeam(format!(
                "{} cannot battle themselves",
                player1.id
            )));
        }
        for setup in [&player1, &player2] {
            check_team(setup, &config)?;
        }

        let mut state = BattleState::new(
            id,
            Player::new(player1.id, Side::P1, &player1.team),
            Player::new(player2.id, Side::P2, &player2.team),
        );
        let mut rng = StdRng::seed_from_u64(seed);
        turn::start_turn(&mut state, &mut rng, &config, now)?;

        Ok(Self {
            state,
            rng,
            config,
            pending: [None, None],
        })
    }

    pub fn id(&self) -> BattleId {
        self.state.id
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Whether a side has a pending submission this turn
    pub fn has_submitted(&self, side: Side) -> bool {
        self.pending[side.index()].is_some()
    }

    /// Pending flags for both sides
    pub fn submitted(&self) -> [bool; 2] {
        [self.has_submitted(Side::P1), self.has_submitted(Side::P2)]
    }

    /// Find the side a player id plays on
    pub fn side_of(&self, player_id: &str) -> Result<Side, ManagerError> {
        self.state
            .side_of(player_id)
            .ok_or_else(|| ManagerError::NotAParticipant {
                battle: self.id(),
                player_id: player_id.to_string(),
            })
    }

    /// Check a submission against the current state without storing it.
    ///
    /// Every intent must pass the resolver's validation, no fighter may
    /// appear twice, and the combined cost must be affordable.
    pub fn precheck(&self, side: Side, intents: &[ActionIntent]) -> Result<(), ManagerError> {
        let mut seen = HashSet::new();
        let mut total = EnergyCost::new();

        for (index, intent) in intents.iter().enumerate() {
            if !seen.insert(intent.actor_slot) {
                return Err(ManagerError::DuplicateActor(intent.actor_slot));
            }
            let action = resolver::validate(&self.state, side, intent)
                .map_err(|failure| ManagerError::Rejected { index, failure })?;
            total.merge(&action.mv.cost);
        }

        if !self.state.player(side).energy.can_afford(&total) {
            return Err(ManagerError::NotEnoughEnergy);
        }
        Ok(())
    }

    /// Submit a side's actions for this turn. Fighters without an intent
    /// do nothing. Resolves the turn once both sides are in.
    pub fn submit(
        &mut self,
        side: Side,
        intents: Vec<ActionIntent>,
        now: SystemTime,
    ) -> Result<Submitted, ManagerError> {
        self.ensure_open(side)?;
        self.precheck(side, &intents)?;
        self.pending[side.index()] = Some(intents);
        self.try_resolve(now)
    }

    /// Pass the whole turn
    pub fn skip(&mut self, side: Side, now: SystemTime) -> Result<Submitted, ManagerError> {
        self.ensure_open(side)?;
        self.state.push(BattleEvent::TurnSkipped {
            side,
            timed_out: false,
        });
        self.pending[side.index()] = Some(Vec::new());
        self.try_resolve(now)
    }

    /// Skip every side that missed the turn deadline. Returns None when the
    /// deadline has not passed.
    pub fn expire(&mut self, now: SystemTime) -> Result<Option<Submitted>, ManagerError> {
        if self.state.phase != Phase::CollectingActions {
            return Ok(None);
        }
        match self.state.turn_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return Ok(None),
        }

        for side in Side::BOTH {
            if self.pending[side.index()].is_none() {
                self.state.push(BattleEvent::TurnSkipped {
                    side,
                    timed_out: true,
                });
                self.pending[side.index()] = Some(Vec::new());
            }
        }
        self.try_resolve(now).map(Some)
    }

    /// Concede. The other side wins immediately.
    pub fn surrender(&mut self, side: Side) -> Result<(), ManagerError> {
        if self.is_finished() {
            return Err(ManagerError::BattleFinished(self.id()));
        }
        self.pending = [None, None];
        self.state.push(BattleEvent::Surrendered { side });
        self.state.finish(Outcome::Surrender {
            winner: side.opponent(),
        });
        Ok(())
    }

    fn ensure_open(&self, side: Side) -> Result<(), ManagerError> {
        if self.is_finished() {
            return Err(ManagerError::BattleFinished(self.id()));
        }
        if self.has_submitted(side) {
            return Err(ManagerError::AlreadySubmitted(side));
        }
        Ok(())
    }

    fn try_resolve(&mut self, now: SystemTime) -> Result<Submitted, ManagerError> {
        if self.pending.iter().any(Option::is_none) {
            return Ok(Submitted::Waiting);
        }

        let p1 = self.pending[0].take().unwrap_or_default();
        let p2 = self.pending[1].take().unwrap_or_default();
        turn::resolve_turn(&mut self.state, [p1, p2], &mut self.rng, &self.config, now)?;
        Ok(Submitted::Resolved)
    }
}

fn check_team(setup: &PlayerSetup, config: &BattleConfig) -> Result<(), ManagerError> {
    if setup.team.len() != config.team_size {
        return Err(ManagerError::InvalidTeam(format!(
            "{} brought {} pokemon, expected {}",
            setup.id,
            setup.team.len(),
            config.team_size
        )));
    }
    for template in &setup.team {
        if template.types.is_empty() || template.types.len() > 2 {
            return Err(ManagerError::InvalidTeam(format!(
                "{} must have one or two types",
                template.id
            )));
        }
        if template.max_hp == 0 {
            return Err(ManagerError::InvalidTeam(format!(
                "{} has no hp",
                template.id
            )));
        }
    }
    Ok(())
}
