//! Built-in decision policies
//!
//! A [`Policy`] looks at a battle from one side and produces that side's
//! submission for the turn. Every intent it returns passes validation and
//! the combined cost fits the side's energy, so the submission is never
//! rejected.

use pokearena_protocol::{FighterRef, Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::BattleConfig;
use crate::engine::resolver::{self, ActionIntent};
use crate::query;
use crate::state::BattleState;
use crate::types::{EnergyPool, TargetRule};

/// Trait for anything that can play a side.
///
/// # Example
///
/// ```ignore
/// struct AlwaysPass;
///
/// impl Policy for AlwaysPass {
///     fn choose(&mut self, _state: &BattleState, _side: Side) -> Vec<ActionIntent> {
///         Vec::new()
///     }
/// }
/// ```
pub trait Policy: Send {
    /// Produce this turn's intents for `side`
    fn choose(&mut self, state: &BattleState, side: Side) -> Vec<ActionIntent>;
}

/// Every intent `slot` could legally submit right now, in move order.
///
/// Single-target moves get one intent per valid target slot; other rules
/// get a single intent with no declared targets.
pub fn legal_intents(state: &BattleState, side: Side, slot: usize) -> Vec<ActionIntent> {
    let Some(fighter) = state.player(side).fighter(slot) else {
        return Vec::new();
    };

    let mut intents = Vec::new();
    for mv in &fighter.moves {
        let declarations: Vec<Vec<usize>> = match mv.target {
            TargetRule::OneEnemy => single_targets(state, side.opponent()),
            TargetRule::OneAlly => single_targets(state, side),
            _ => vec![Vec::new()],
        };
        for targets in declarations {
            let intent = ActionIntent::new(slot, mv.id.clone(), targets);
            if resolver::validate(state, side, &intent).is_ok() {
                intents.push(intent);
            }
        }
    }
    intents
}

fn single_targets(state: &BattleState, side: Side) -> Vec<Vec<usize>> {
    state
        .player(side)
        .alive_slots()
        .into_iter()
        .map(|slot| vec![slot])
        .collect()
}

/// Charge `intent` against a running budget. False when it does not fit.
fn reserve(
    state: &BattleState,
    side: Side,
    intent: &ActionIntent,
    budget: &mut EnergyPool,
) -> bool {
    let cost = state
        .player(side)
        .fighter(intent.actor_slot)
        .and_then(|f| f.find_move(&intent.move_id))
        .map(|mv| mv.cost.clone())
        .unwrap_or_default();
    budget.spend(&cost).is_some()
}

/// Picks uniformly among legal intents for each fighter
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, state: &BattleState, side: Side) -> Vec<ActionIntent> {
        let mut budget = state.player(side).energy.clone();
        let mut chosen = Vec::new();

        for slot in state.player(side).alive_slots() {
            let mut options = legal_intents(state, side, slot);
            options.shuffle(&mut self.rng);
            if let Some(intent) = options
                .into_iter()
                .find(|intent| reserve(state, side, intent, &mut budget))
            {
                chosen.push(intent);
            }
        }
        chosen
    }
}

/// Scores every legal intent by expected damage and healing and plays the
/// best one per fighter. Deterministic.
pub struct GreedyPolicy {
    config: BattleConfig,
}

impl GreedyPolicy {
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    /// Higher is better. Knockouts count double, damage to allies counts
    /// against the move, healing counts only up to missing HP.
    pub fn score(&self, state: &BattleState, side: Side, intent: &ActionIntent) -> i64 {
        let Ok(action) = resolver::validate(state, side, intent) else {
            return i64::MIN;
        };

        let mut score = 0i64;
        for &target in &action.targets {
            let Some(defender) = state.fighter(target) else {
                continue;
            };
            let damage =
                query::expected_damage(state, action.actor, &action.mv, target, &self.config);
            let dealt = i64::from(damage.min(defender.current_hp));
            if target.side == side {
                score -= dealt;
            } else {
                score += dealt;
                if damage >= defender.current_hp {
                    score += dealt;
                }
            }

            if action.mv.healing > 0 && target.side == side {
                let missing = defender.max_hp - defender.current_hp;
                score += i64::from(action.mv.healing.min(missing));
            }
            score += action.mv.effects.len() as i64;
        }
        score - i64::from(action.payment.total())
    }

    fn best_for(
        &self,
        state: &BattleState,
        side: Side,
        slot: usize,
        budget: &EnergyPool,
    ) -> Option<ActionIntent> {
        let mut best: Option<(i64, ActionIntent)> = None;
        for intent in legal_intents(state, side, slot) {
            if !reserve(state, side, &intent, &mut budget.clone()) {
                continue;
            }
            let score = self.score(state, side, &intent);
            if score > 0 && best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, intent));
            }
        }
        best.map(|(_, intent)| intent)
    }
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

impl Policy for GreedyPolicy {
    fn choose(&mut self, state: &BattleState, side: Side) -> Vec<ActionIntent> {
        let mut budget = state.player(side).energy.clone();
        let mut chosen = Vec::new();

        // fighters under threat act first so they get first pick of energy
        let mut slots = state.player(side).alive_slots();
        slots.sort_by_key(|&slot| {
            std::cmp::Reverse(query::threatened_by(state, FighterRef::new(side, slot)).len())
        });

        for slot in slots {
            if let Some(intent) = self.best_for(state, side, slot, &budget) {
                reserve(state, side, &intent, &mut budget);
                chosen.push(intent);
            }
        }
        chosen
    }
}
