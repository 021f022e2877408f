//! BattleManager - owns every live battle
//!
//! Battles live behind their own mutex, so submissions for one battle are
//! serialized while different battles proceed in parallel. The map lock is
//! only held long enough to look a battle up.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use pokearena_protocol::BattleSnapshot;

use crate::config::BattleConfig;
use crate::engine::resolver::ActionIntent;
use crate::error::ManagerError;
use crate::session::{Battle, PlayerSetup, Submitted};
use crate::state::{BattleId, BattleState};

/// Result of an accepted submission or skip
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    /// The turn was resolved by this call
    pub resolved: bool,
    pub state: BattleState,
    /// Pending flags per side right after this call, P1 first
    pub submitted: [bool; 2],
}

impl SubmitReceipt {
    /// Wire snapshot of the state this call left behind
    pub fn snapshot(&self, tail: usize) -> BattleSnapshot {
        self.state.to_snapshot(self.submitted, tail)
    }
}

pub struct BattleManager {
    battles: RwLock<HashMap<BattleId, Arc<Mutex<Battle>>>>,
    next_id: AtomicU64,
    config: Arc<BattleConfig>,
}

impl BattleManager {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            battles: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Start a battle between two matched players
    pub fn create_battle(
        &self,
        player1: PlayerSetup,
        player2: PlayerSetup,
        seed: u64,
    ) -> Result<BattleId, ManagerError> {
        self.create_battle_at(player1, player2, seed, SystemTime::now())
    }

    /// [`create_battle`](Self::create_battle) with an explicit clock
    pub fn create_battle_at(
        &self,
        player1: PlayerSetup,
        player2: PlayerSetup,
        seed: u64,
        now: SystemTime,
    ) -> Result<BattleId, ManagerError> {
        let id = BattleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (p1, p2) = (player1.id.clone(), player2.id.clone());
        let battle = Battle::new(id, player1, player2, seed, self.config.clone(), now)?;

        self.write_map().insert(id, Arc::new(Mutex::new(battle)));
        tracing::info!(battle = %id, player1 = %p1, player2 = %p2, seed, "Battle created");
        Ok(id)
    }

    /// Submit a player's actions for the current turn
    pub fn submit_action(
        &self,
        id: BattleId,
        player_id: &str,
        intents: Vec<ActionIntent>,
    ) -> Result<SubmitReceipt, ManagerError> {
        self.submit_action_at(id, player_id, intents, SystemTime::now())
    }

    pub fn submit_action_at(
        &self,
        id: BattleId,
        player_id: &str,
        intents: Vec<ActionIntent>,
        now: SystemTime,
    ) -> Result<SubmitReceipt, ManagerError> {
        self.with_battle(id, |battle| {
            let side = battle.side_of(player_id)?;
            let submitted = battle.submit(side, intents, now).inspect_err(|e| {
                tracing::debug!(battle = %id, player = player_id, error = %e, "Submission rejected");
            })?;
            Ok(receipt(battle, submitted))
        })
    }

    /// Pass a player's whole turn
    pub fn skip_turn(&self, id: BattleId, player_id: &str) -> Result<SubmitReceipt, ManagerError> {
        self.skip_turn_at(id, player_id, SystemTime::now())
    }

    pub fn skip_turn_at(
        &self,
        id: BattleId,
        player_id: &str,
        now: SystemTime,
    ) -> Result<SubmitReceipt, ManagerError> {
        self.with_battle(id, |battle| {
            let side = battle.side_of(player_id)?;
            let submitted = battle.skip(side, now)?;
            Ok(receipt(battle, submitted))
        })
    }

    /// End a battle with the other player as winner
    pub fn surrender(&self, id: BattleId, player_id: &str) -> Result<BattleState, ManagerError> {
        self.with_battle(id, |battle| {
            let side = battle.side_of(player_id)?;
            battle.surrender(side)?;
            tracing::info!(battle = %id, player = player_id, "Player surrendered");
            Ok(battle.state().clone())
        })
    }

    /// Copy of a battle's state
    pub fn get_state(&self, id: BattleId) -> Option<BattleState> {
        self.with_battle(id, |battle| Ok(battle.state().clone())).ok()
    }

    /// Wire snapshot of a battle with the configured log tail
    pub fn get_battle(&self, id: BattleId) -> Option<BattleSnapshot> {
        let tail = self.config.max_log_tail;
        self.with_battle(id, |battle| Ok(battle.snapshot(tail))).ok()
    }

    /// Remove a finished battle once the caller has stored it
    pub fn evict(&self, id: BattleId) -> Result<BattleState, ManagerError> {
        let state = self.with_battle(id, |battle| {
            if !battle.is_finished() {
                return Err(ManagerError::NotFinished(id));
            }
            Ok(battle.state().clone())
        })?;
        self.write_map().remove(&id);
        tracing::debug!(battle = %id, "Battle evicted");
        Ok(state)
    }

    /// Skip the missing side of every battle past its turn deadline.
    /// Returns the battles whose turn was forced.
    pub fn expire_overdue(&self, now: SystemTime) -> Vec<BattleId> {
        let mut expired = Vec::new();
        for id in self.battle_ids() {
            match self.with_battle(id, |battle| battle.expire(now)) {
                Ok(Some(_)) => {
                    tracing::info!(battle = %id, "Turn deadline passed, missing side skipped");
                    expired.push(id);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(battle = %id, error = %e, "Deadline sweep failed"),
            }
        }
        expired
    }

    /// Ids of every live battle, ascending
    pub fn battle_ids(&self) -> Vec<BattleId> {
        let mut ids: Vec<_> = self.read_map().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<BattleId, Arc<Mutex<Battle>>>> {
        self.battles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<BattleId, Arc<Mutex<Battle>>>> {
        self.battles.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the battle locked. A poisoned lock or a broken engine
    /// invariant fails that battle only: it is dropped from the manager.
    fn with_battle<T>(
        &self,
        id: BattleId,
        f: impl FnOnce(&mut Battle) -> Result<T, ManagerError>,
    ) -> Result<T, ManagerError> {
        let handle = self
            .read_map()
            .get(&id)
            .cloned()
            .ok_or(ManagerError::BattleNotFound(id))?;

        let result = match handle.lock() {
            Ok(mut battle) => f(&mut battle),
            Err(_) => Err(ManagerError::BattleFailed {
                battle: id,
                reason: "battle lock poisoned".to_string(),
            }),
        };

        match result {
            Err(ManagerError::Engine(e)) => Err(self.fail(id, e.to_string())),
            Err(ManagerError::BattleFailed { reason, .. }) => Err(self.fail(id, reason)),
            other => other,
        }
    }

    fn fail(&self, id: BattleId, reason: String) -> ManagerError {
        tracing::error!(battle = %id, reason = %reason, "Battle failed, dropping it");
        self.write_map().remove(&id);
        ManagerError::BattleFailed { battle: id, reason }
    }
}

impl Default for BattleManager {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

fn receipt(battle: &Battle, submitted: Submitted) -> SubmitReceipt {
    let resolved = submitted == Submitted::Resolved;
    if resolved {
        tracing::debug!(
            battle = %battle.id(),
            turn = battle.state().turn,
            phase = ?battle.state().phase,
            "Turn resolved"
        );
    }
    SubmitReceipt {
        resolved,
        state: battle.state().clone(),
        submitted: battle.submitted(),
    }
}
