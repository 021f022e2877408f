//! Type and move matchup helpers for decision making

use pokearena_protocol::FighterRef;

use crate::config::BattleConfig;
use crate::engine::{effects, resolver};
use crate::state::BattleState;
use crate::types::{effectiveness_multiplier, Fighter, Move, TargetRule, Type};

/// Check if defender is weak (>1x effectiveness) to any of the attacking types
pub fn is_weak_to_any(defender_types: &[Type], attacking_types: &[Type]) -> bool {
    attacking_types
        .iter()
        .any(|t| effectiveness_multiplier(*t, defender_types) > 1.0)
}

/// Check if defender is immune (0x effectiveness) to a type
pub fn is_immune_to(defender_types: &[Type], attacking_type: Type) -> bool {
    effectiveness_multiplier(attacking_type, defender_types) == 0.0
}

/// Get all types that are super effective against the defender
pub fn weaknesses(defender_types: &[Type]) -> Vec<Type> {
    Type::all()
        .iter()
        .copied()
        .filter(|t| effectiveness_multiplier(*t, defender_types) > 1.0)
        .collect()
}

/// Get all types that the defender resists (0 < effectiveness < 1)
pub fn resistances(defender_types: &[Type]) -> Vec<Type> {
    Type::all()
        .iter()
        .copied()
        .filter(|t| {
            let eff = effectiveness_multiplier(*t, defender_types);
            eff > 0.0 && eff < 1.0
        })
        .collect()
}

/// Multiplier `mv` gets against a fighter
pub fn move_effectiveness(mv: &Move, defender: &Fighter) -> f32 {
    effectiveness_multiplier(mv.move_type, &defender.types)
}

/// Damage `attacker` would deal to `target` with `mv` this turn, ignoring
/// critical hits. Zero when the hit would be blocked or either fighter is
/// missing or down.
pub fn expected_damage(
    state: &BattleState,
    attacker: FighterRef,
    mv: &Move,
    target: FighterRef,
    config: &BattleConfig,
) -> u32 {
    let (Some(actor), Some(defender)) = (state.fighter(attacker), state.fighter(target)) else {
        return 0;
    };
    if mv.damage == 0 || !actor.is_alive() || !defender.is_alive() {
        return 0;
    }

    let hostile = attacker.side != target.side;
    if hostile && effects::is_invulnerable(defender) && !mv.is_piercing() {
        return 0;
    }

    resolver::estimate_damage(
        mv,
        effects::damage_boost(actor),
        &actor.types,
        defender,
        config,
    )
}

/// Pick the enemy slot a single-target move should be aimed at.
///
/// A hit that knocks the target out wins; otherwise the most damage wins.
/// Ties go to the lowest slot. Returns the slot and the expected damage.
pub fn best_target(
    state: &BattleState,
    attacker: FighterRef,
    mv: &Move,
    config: &BattleConfig,
) -> Option<(usize, u32)> {
    if mv.target != TargetRule::OneEnemy {
        return None;
    }
    let enemies = attacker.side.opponent();

    let mut best: Option<(bool, u32, usize)> = None;
    for slot in state.player(enemies).alive_slots() {
        let target = FighterRef::new(enemies, slot);
        let damage = expected_damage(state, attacker, mv, target, config);
        let lethal = state
            .fighter(target)
            .is_some_and(|f| damage >= f.current_hp);

        let better = match best {
            None => true,
            Some((best_lethal, best_damage, _)) => {
                (lethal, damage) > (best_lethal, best_damage)
            }
        };
        if better {
            best = Some((lethal, damage, slot));
        }
    }
    best.map(|(_, damage, slot)| (slot, damage))
}

/// Living enemy fighters carrying a damaging move that is super effective
/// against `defender`
pub fn threatened_by(state: &BattleState, defender: FighterRef) -> Vec<FighterRef> {
    let Some(target) = state.fighter(defender) else {
        return Vec::new();
    };
    let enemies = defender.side.opponent();

    state
        .player(enemies)
        .alive_fighters()
        .filter(|f| {
            f.moves
                .iter()
                .any(|mv| mv.damage > 0 && move_effectiveness(mv, target) > 1.0)
        })
        .map(|f| FighterRef::new(enemies, f.slot))
        .collect()
}
