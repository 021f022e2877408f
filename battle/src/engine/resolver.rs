//! Action resolver
//!
//! [`validate`] checks an intent against the current state without touching
//! it. [`execute`] validates again and then applies the move: pay energy,
//! start the cooldown, then resolve every target in order.
//!
//! Validation order (first failure wins):
//!
//! 1. actor exists, is alive, is not stunned
//! 2. move exists, is not blocked by silence/snare, is off cooldown
//! 3. energy covers the cost
//! 4. declared targets fit the move's target rule and are alive

use pokearena_protocol::{FighterRef, Side};
use rand::Rng;

use crate::config::BattleConfig;
use crate::engine::log::BattleEvent;
use crate::engine::{cooldown, effects};
use crate::error::{ActionFailure, FailureReason};
use crate::state::BattleState;
use crate::types::{
    effectiveness_multiplier, EnergyPool, Fighter, Move, MoveClass, TargetRule, Type,
};

/// One declared move for one fighter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionIntent {
    pub actor_slot: usize,
    pub move_id: String,
    /// Slots on the side the move's rule points at. Ignored for area moves.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_slots: Vec<usize>,
}

impl ActionIntent {
    pub fn new(actor_slot: usize, move_id: impl Into<String>, target_slots: Vec<usize>) -> Self {
        Self {
            actor_slot,
            move_id: move_id.into(),
            target_slots,
        }
    }
}

/// An intent that passed validation against a particular state
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAction {
    pub actor: FighterRef,
    pub mv: Move,
    /// Resolved targets in hit order
    pub targets: Vec<FighterRef>,
    /// Units that will be spent
    pub payment: EnergyPool,
}

/// Result of a damage roll against one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: u32,
    pub effectiveness: f32,
    pub critical: bool,
}

/// Check an intent without mutating anything
pub fn validate(
    state: &BattleState,
    side: Side,
    intent: &ActionIntent,
) -> Result<ValidatedAction, ActionFailure> {
    let actor_ref = FighterRef::new(side, intent.actor_slot);
    let fail = |reason| ActionFailure {
        actor: actor_ref,
        move_id: intent.move_id.clone(),
        reason,
    };

    let player = state.player(side);
    let actor = player
        .fighter(intent.actor_slot)
        .ok_or_else(|| fail(FailureReason::ActorNotFound))?;

    if !actor.is_alive() {
        return Err(fail(FailureReason::ActorDead));
    }
    if effects::is_stunned(actor) {
        return Err(fail(FailureReason::ActorIncapacitated));
    }

    let mv = actor
        .find_move(&intent.move_id)
        .ok_or_else(|| fail(FailureReason::MoveNotFound))?;

    if effects::blocks_move(actor, mv) {
        return Err(fail(FailureReason::ActorIncapacitated));
    }
    if !cooldown::is_available(actor, &mv.id) {
        return Err(fail(FailureReason::OnCooldown));
    }

    let payment = player
        .energy
        .payment_for(&mv.cost)
        .ok_or_else(|| fail(FailureReason::NotEnoughEnergy))?;

    let targets = resolve_targets(state, actor_ref, mv.target, &intent.target_slots)
        .ok_or_else(|| fail(FailureReason::InvalidTarget))?;

    Ok(ValidatedAction {
        actor: actor_ref,
        mv: mv.clone(),
        targets,
        payment,
    })
}

/// Work out who a move hits. `None` when the declaration does not fit the
/// rule; area rules ignore the declaration and skip fainted fighters.
pub fn resolve_targets(
    state: &BattleState,
    actor: FighterRef,
    rule: TargetRule,
    declared: &[usize],
) -> Option<Vec<FighterRef>> {
    let allies = actor.side;
    let enemies = actor.side.opponent();

    let single = |side: Side| -> Option<Vec<FighterRef>> {
        match declared {
            [slot] => {
                let target = FighterRef::new(side, *slot);
                state
                    .fighter(target)
                    .filter(|f| f.is_alive())
                    .map(|_| vec![target])
            }
            _ => None,
        }
    };
    let living = |side: Side| -> Vec<FighterRef> {
        state
            .player(side)
            .alive_slots()
            .into_iter()
            .map(|slot| FighterRef::new(side, slot))
            .collect()
    };

    match rule {
        TargetRule::SelfOnly => match declared {
            [] => Some(vec![actor]),
            [slot] if *slot == actor.slot => Some(vec![actor]),
            _ => None,
        },
        TargetRule::OneEnemy => single(enemies),
        TargetRule::OneAlly => single(allies),
        TargetRule::AllEnemies => Some(living(enemies)),
        TargetRule::AllAllies => Some(living(allies)),
        TargetRule::Everyone => {
            let mut all = living(Side::P1);
            all.extend(living(Side::P2));
            Some(all)
        }
    }
}

/// Roll damage of `mv` against `defender`.
///
/// `max(0, damage + boost) * effectiveness * stab * critical`, floored,
/// minus the defender's damage reduction (ignored by affliction moves).
pub fn compute_damage<R: Rng + ?Sized>(
    mv: &Move,
    boost: i32,
    attacker_types: &[Type],
    defender: &Fighter,
    rng: &mut R,
    config: &BattleConfig,
) -> DamageRoll {
    let effectiveness = effectiveness_multiplier(mv.move_type, &defender.types);
    let chance = config.critical_probability();
    let critical = effectiveness > 0.0
        && chance > 0.0
        && base_damage(mv, boost) > 0.0
        && rng.gen_bool(chance);
    let crit = if critical {
        config.critical_multiplier
    } else {
        1.0
    };

    DamageRoll {
        amount: scaled_damage(mv, boost, attacker_types, defender, config, crit),
        effectiveness,
        critical,
    }
}

/// Damage `mv` would deal without a critical hit. Draws no randomness.
pub fn estimate_damage(
    mv: &Move,
    boost: i32,
    attacker_types: &[Type],
    defender: &Fighter,
    config: &BattleConfig,
) -> u32 {
    scaled_damage(mv, boost, attacker_types, defender, config, 1.0)
}

fn base_damage(mv: &Move, boost: i32) -> f32 {
    (i64::from(mv.damage) + i64::from(boost)).max(0) as f32
}

fn scaled_damage(
    mv: &Move,
    boost: i32,
    attacker_types: &[Type],
    defender: &Fighter,
    config: &BattleConfig,
    crit: f32,
) -> u32 {
    let effectiveness = effectiveness_multiplier(mv.move_type, &defender.types);
    let stab = if mv.move_type.is_stab_for(attacker_types) {
        config.stab_multiplier
    } else {
        1.0
    };

    let raw = (base_damage(mv, boost) * effectiveness * stab * crit)
        .floor()
        .max(0.0) as u32;
    let reduction = if mv.has_class(MoveClass::Affliction) {
        0
    } else {
        effects::damage_reduction(defender)
    };
    raw.saturating_sub(reduction)
}

/// Validate and run an intent. On failure nothing is mutated.
pub fn execute<R: Rng + ?Sized>(
    state: &mut BattleState,
    side: Side,
    intent: &ActionIntent,
    rng: &mut R,
    config: &BattleConfig,
) -> Result<Vec<BattleEvent>, ActionFailure> {
    let action = validate(state, side, intent)?;
    Ok(perform(state, action, rng, config))
}

fn perform<R: Rng + ?Sized>(
    state: &mut BattleState,
    action: ValidatedAction,
    rng: &mut R,
    config: &BattleConfig,
) -> Vec<BattleEvent> {
    let ValidatedAction {
        actor, mv, targets, ..
    } = action;

    let mut events = vec![BattleEvent::ActionUsed {
        actor,
        move_id: mv.id.clone(),
        targets: targets.clone(),
    }];

    if let Some(spent) = state.player_mut(actor.side).energy.spend(&mv.cost)
        && !spent.is_empty()
    {
        events.push(BattleEvent::EnergySpent {
            side: actor.side,
            spent,
        });
    }

    let (boost, attacker_types) = match state.fighter_mut(actor) {
        Some(fighter) => {
            cooldown::start(fighter, &mv.id, mv.cooldown);
            (effects::damage_boost(fighter), fighter.types.clone())
        }
        None => (0, Vec::new()),
    };

    for target in targets {
        hit(
            state,
            actor,
            &mv,
            target,
            boost,
            &attacker_types,
            rng,
            config,
            &mut events,
        );
    }

    events
}

#[allow(clippy::too_many_arguments)]
fn hit<R: Rng + ?Sized>(
    state: &mut BattleState,
    actor: FighterRef,
    mv: &Move,
    target: FighterRef,
    boost: i32,
    attacker_types: &[Type],
    rng: &mut R,
    config: &BattleConfig,
    events: &mut Vec<BattleEvent>,
) {
    let Some(defender) = state.fighter_mut(target) else {
        return;
    };
    if !defender.is_alive() {
        return;
    }

    let hostile = target.side != actor.side;
    if hostile && effects::is_invulnerable(defender) && !mv.is_piercing() {
        events.push(BattleEvent::Blocked {
            actor,
            target,
            move_id: mv.id.clone(),
        });
        return;
    }

    if mv.damage > 0 {
        let roll = compute_damage(mv, boost, attacker_types, defender, rng, config);
        let amount = defender.take_damage(roll.amount);
        events.push(BattleEvent::Damage {
            source: Some(actor),
            target,
            amount,
            effectiveness: roll.effectiveness,
            critical: roll.critical,
            hp: defender.current_hp,
        });

        if !defender.is_alive() {
            if defender.mark_fainted() {
                events.push(BattleEvent::Fainted { target });
            }
            return;
        }
    }

    if mv.healing > 0 {
        let amount = defender.heal(mv.healing);
        events.push(BattleEvent::Heal {
            source: Some(actor),
            target,
            amount,
            hp: defender.current_hp,
        });
    }

    for template in &mv.effects {
        let effect = effects::apply(defender, template);
        events.push(BattleEvent::EffectApplied {
            target,
            kind: effect.kind,
            duration: effect.duration,
            value: effect.magnitude(),
        });
    }
}
