//! Turn resolution loop
//!
//! ```text
//! StartTurn -> CollectingActions -> BuildQueue -> ExecutingQueue -> EndTurn
//!     ^                                                               |
//!     +------------------------- turn + 1 ----------------------------+--> Finished
//! ```
//!
//! Collecting actions happens outside this module: the session holds both
//! submissions and calls [`resolve_turn`] once it has them.

use std::time::SystemTime;

use pokearena_protocol::{FighterRef, Side};
use rand::Rng;

use crate::config::BattleConfig;
use crate::engine::log::BattleEvent;
use crate::engine::queue::build_queue;
use crate::engine::resolver::{self, ActionIntent};
use crate::engine::{cooldown, effects};
use crate::error::EngineError;
use crate::state::{BattleState, Outcome, Phase};
use crate::types::{Energy, EnergyPool};

/// Run StartTurn and open action collection
pub fn start_turn<R: Rng + ?Sized>(
    state: &mut BattleState,
    rng: &mut R,
    config: &BattleConfig,
    now: SystemTime,
) -> Result<(), EngineError> {
    if state.phase != Phase::StartTurn {
        return Err(EngineError::PhaseViolation {
            from: state.phase,
            to: Phase::CollectingActions,
        });
    }

    state.push(BattleEvent::TurnStarted);

    for side in Side::BOTH {
        for slot in 0..state.player(side).fighters.len() {
            let at = FighterRef::new(side, slot);
            if let Some(fighter) = state.fighter_mut(at) {
                let events = effects::tick_start_of_turn(fighter, at);
                state.extend(events);
            }
        }
    }

    for side in Side::BOTH {
        let events = generate_energy(state, side, rng, config);
        state.extend(events);
    }

    state.transition(Phase::CollectingActions)?;
    state.turn_deadline = now.checked_add(config.turn_duration);
    Ok(())
}

/// Each living fighter yields `energy_per_fighter` units, each drawn
/// uniformly from its own types plus colorless
pub fn generate_energy<R: Rng + ?Sized>(
    state: &mut BattleState,
    side: Side,
    rng: &mut R,
    config: &BattleConfig,
) -> Vec<BattleEvent> {
    let mut gained = EnergyPool::new();
    for fighter in state.player(side).alive_fighters() {
        let choices: Vec<Energy> = fighter
            .types
            .iter()
            .map(|t| Energy::Typed(*t))
            .chain(std::iter::once(Energy::Colorless))
            .collect();
        for _ in 0..config.energy_per_fighter {
            let pick = choices[rng.gen_range(0..choices.len())];
            gained.add(pick, 1);
        }
    }

    state.player_mut(side).energy.merge(&gained);
    gained
        .iter()
        .map(|(energy, amount)| BattleEvent::EnergyGained {
            side,
            energy,
            amount,
        })
        .collect()
}

/// Resolve a turn from both sides' submissions: build the queue, execute it,
/// run EndTurn and, unless the battle ended, the next StartTurn
pub fn resolve_turn<R: Rng + ?Sized>(
    state: &mut BattleState,
    submissions: [Vec<ActionIntent>; 2],
    rng: &mut R,
    config: &BattleConfig,
    now: SystemTime,
) -> Result<(), EngineError> {
    state.transition(Phase::BuildQueue)?;
    let queue = build_queue(state, &submissions);

    state.transition(Phase::ExecutingQueue)?;
    for queued in &queue {
        match resolver::execute(state, queued.side, &queued.intent, rng, config) {
            Ok(events) => state.extend(events),
            Err(failure) => {
                tracing::debug!(
                    battle = %state.id,
                    actor = %failure.actor,
                    move_id = %failure.move_id,
                    reason = %failure.reason,
                    "Queued action failed at execution"
                );
                state.push(BattleEvent::ActionFailed {
                    actor: failure.actor,
                    move_id: failure.move_id,
                    reason: failure.reason,
                });
            }
        }
        state.check_invariants()?;
    }

    end_turn(state)?;

    if !state.is_finished() {
        start_turn(state, rng, config, now)?;
    }
    Ok(())
}

/// EndTurn: effect and cooldown sweeps, faint detection, win check
fn end_turn(state: &mut BattleState) -> Result<(), EngineError> {
    state.transition(Phase::EndTurn)?;
    state.turn_deadline = None;

    for at in state.fighter_refs() {
        if let Some(fighter) = state.fighter_mut(at) {
            let events = effects::tick_end_of_turn(fighter, at);
            cooldown::tick(fighter);
            state.extend(events);
        }
    }

    for at in state.fighter_refs() {
        if let Some(fighter) = state.fighter_mut(at)
            && !fighter.is_alive()
            && fighter.mark_fainted()
        {
            state.push(BattleEvent::Fainted { target: at });
        }
    }
    state.check_invariants()?;

    let p1_out = state.player1().all_fainted();
    let p2_out = state.player2().all_fainted();
    let outcome = match (p1_out, p2_out) {
        (true, true) => Some(Outcome::Draw),
        (true, false) => Some(Outcome::Knockout { winner: Side::P2 }),
        (false, true) => Some(Outcome::Knockout { winner: Side::P1 }),
        (false, false) => None,
    };

    match outcome {
        Some(outcome) => {
            state.transition(Phase::Finished)?;
            state.finish(outcome);
            tracing::info!(battle = %state.id, turn = state.turn, ?outcome, "Battle finished");
        }
        None => {
            state.transition(Phase::StartTurn)?;
            state.turn += 1;
        }
    }
    Ok(())
}
