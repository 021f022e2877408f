//! Effect engine: applying, ticking and querying timed effects
//!
//! A fighter holds at most one instance per [`EffectKind`]. Re-applying a
//! kind refreshes it (new duration and value), except damage over time,
//! whose values add up while the duration takes the longer of the two. A
//! dose stacked onto a running instance waits for the next sweep; the
//! running part keeps ticking.

use pokearena_protocol::FighterRef;

use crate::engine::log::BattleEvent;
use crate::types::{Effect, EffectKind, EffectTemplate, Fighter, Move, MoveClass};

/// Add or refresh an effect. Returns the instance now on the fighter.
pub fn apply(fighter: &mut Fighter, template: &EffectTemplate) -> Effect {
    if let Some(existing) = fighter.effects.iter_mut().find(|e| e.kind == template.kind) {
        if template.kind.is_additive() {
            existing.value = existing.value.saturating_add(template.value);
            if existing.fresh {
                existing.duration = existing.duration.max(template.duration);
            } else {
                // this turn's sweep still counts the running instance down
                existing.fresh_value = existing.fresh_value.saturating_add(template.value);
                existing.duration = existing.duration.max(template.duration.saturating_add(1));
            }
        } else {
            existing.value = template.value;
            existing.duration = template.duration;
            existing.fresh = true;
            existing.fresh_value = 0;
        }
        return *existing;
    }

    let effect = Effect::from_template(template);
    fighter.effects.push(effect);
    effect
}

/// Remove an effect kind. Returns whether it was present.
pub fn remove(fighter: &mut Fighter, kind: EffectKind) -> bool {
    let before = fighter.effects.len();
    fighter.effects.retain(|e| e.kind != kind);
    fighter.effects.len() != before
}

pub fn has_effect(fighter: &Fighter, kind: EffectKind) -> bool {
    fighter.has_effect(kind)
}

pub fn is_stunned(fighter: &Fighter) -> bool {
    fighter.has_effect(EffectKind::Stun)
}

pub fn is_invulnerable(fighter: &Fighter) -> bool {
    fighter.has_effect(EffectKind::Invulnerable)
}

pub fn is_silenced(fighter: &Fighter) -> bool {
    fighter.has_effect(EffectKind::Silence)
}

pub fn is_snared(fighter: &Fighter) -> bool {
    fighter.has_effect(EffectKind::Snare)
}

/// Whether an effect stops the fighter from using this particular move
pub fn blocks_move(fighter: &Fighter, mv: &Move) -> bool {
    (is_silenced(fighter) && mv.has_class(MoveClass::Special))
        || (is_snared(fighter) && mv.has_class(MoveClass::Physical))
}

/// Flat change to outgoing move damage
pub fn damage_boost(fighter: &Fighter) -> i32 {
    magnitude(fighter, EffectKind::DamageBoost)
}

/// Flat reduction of incoming move damage (never negative)
pub fn damage_reduction(fighter: &Fighter) -> u32 {
    magnitude(fighter, EffectKind::DamageReduction).max(0).unsigned_abs()
}

fn magnitude(fighter: &Fighter, kind: EffectKind) -> i32 {
    fighter.effect(kind).map_or(0, |e| e.value)
}

fn positive_magnitude(fighter: &Fighter, kind: EffectKind, include_fresh: bool) -> u32 {
    fighter
        .effect(kind)
        .filter(|e| include_fresh || !e.fresh)
        .map_or(0, |e| {
            let live = if include_fresh {
                e.value
            } else {
                e.value.saturating_sub(e.fresh_value)
            };
            live.max(0).unsigned_abs()
        })
}

/// Start-of-turn effects: regeneration
pub fn tick_start_of_turn(fighter: &mut Fighter, at: FighterRef) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    if !fighter.is_alive() {
        return events;
    }

    let regen = positive_magnitude(fighter, EffectKind::Regeneration, true);
    if regen > 0 {
        let amount = fighter.heal(regen);
        if amount > 0 {
            events.push(BattleEvent::Heal {
                source: None,
                target: at,
                amount,
                hp: fighter.current_hp,
            });
        }
    }
    events
}

/// End-of-turn sweep: damage and healing over time, then durations.
///
/// Effects applied this turn are neither triggered nor decremented; they
/// only lose their fresh mark.
pub fn tick_end_of_turn(fighter: &mut Fighter, at: FighterRef) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    if !fighter.is_alive() {
        return events;
    }

    let dot = positive_magnitude(fighter, EffectKind::DamageOverTime, false);
    if dot > 0 {
        let amount = fighter.take_damage(dot);
        events.push(BattleEvent::Damage {
            source: None,
            target: at,
            amount,
            effectiveness: 1.0,
            critical: false,
            hp: fighter.current_hp,
        });
    }

    let hot = positive_magnitude(fighter, EffectKind::HealOverTime, false);
    if hot > 0 && fighter.is_alive() {
        let amount = fighter.heal(hot);
        if amount > 0 {
            events.push(BattleEvent::Heal {
                source: None,
                target: at,
                amount,
                hp: fighter.current_hp,
            });
        }
    }

    fighter.effects.retain_mut(|effect| {
        effect.fresh_value = 0;
        if effect.fresh {
            effect.fresh = false;
            return true;
        }
        effect.duration = effect.duration.saturating_sub(1);
        if effect.duration == 0 {
            events.push(BattleEvent::EffectExpired {
                target: at,
                kind: effect.kind,
            });
            return false;
        }
        true
    });

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PokemonTemplate, TargetRule, Type};
    use pokearena_protocol::Side;

    fn fighter() -> Fighter {
        let template = PokemonTemplate::new("snorlax", vec![Type::Normal], 100)
            .with_move(Move::new("rest", Type::Psychic, TargetRule::SelfOnly));
        Fighter::from_template(0, &template)
    }

    fn at() -> FighterRef {
        FighterRef::new(Side::P1, 0)
    }

    /// Clear fresh marks as if a previous turn had ended
    fn age(f: &mut Fighter) {
        for e in &mut f.effects {
            e.fresh = false;
        }
    }

    #[test]
    fn test_apply_and_predicates() {
        let mut f = fighter();
        assert!(!is_stunned(&f));
        apply(&mut f, &EffectTemplate::new(EffectKind::Stun, 1));
        apply(&mut f, &EffectTemplate::new(EffectKind::Invulnerable, 2));
        assert!(is_stunned(&f));
        assert!(is_invulnerable(&f));
        assert!(!is_silenced(&f));
        assert!(has_effect(&f, EffectKind::Invulnerable));
        assert!(remove(&mut f, EffectKind::Stun));
        assert!(!remove(&mut f, EffectKind::Stun));
    }

    #[test]
    fn test_refresh_replaces_duration() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageReduction, 3, 10));
        let e = apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageReduction, 1, 5));
        assert_eq!(f.effects.len(), 1);
        assert_eq!((e.duration, e.value), (1, 5));
        assert_eq!(damage_reduction(&f), 5);
    }

    #[test]
    fn test_damage_over_time_stacks() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 3, 5));
        let e = apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 4));
        assert_eq!(f.effects.len(), 1);
        assert_eq!((e.duration, e.value), (3, 9));
    }

    #[test]
    fn test_restacked_dot_keeps_ticking() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 3, 10));
        tick_end_of_turn(&mut f, at());
        tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 90);

        // a second dose lands while the first still has two sweeps left
        let e = apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 3, 10));
        assert_eq!((e.value, e.fresh_value, e.duration), (20, 10, 4));

        let events = tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 80);
        assert!(matches!(events[0], BattleEvent::Damage { amount: 10, .. }));
        assert_eq!(f.effects[0].fresh_value, 0);

        // both doses from now on, for the new dose's three sweeps
        for expected in [60, 40, 20] {
            tick_end_of_turn(&mut f, at());
            assert_eq!(f.current_hp, expected);
        }
        assert!(f.effects.is_empty());
    }

    #[test]
    fn test_stacking_on_fresh_dot_waits() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 10));
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 5));
        assert!(tick_end_of_turn(&mut f, at()).is_empty());
        assert_eq!(f.current_hp, 100);
        tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 85);
    }

    #[test]
    fn test_blocks_move_by_class() {
        let mut f = fighter();
        let special = Move::new("psybeam", Type::Psychic, TargetRule::OneEnemy)
            .with_class(MoveClass::Special);
        let physical = Move::new("slam", Type::Normal, TargetRule::OneEnemy)
            .with_class(MoveClass::Physical);

        apply(&mut f, &EffectTemplate::new(EffectKind::Silence, 1));
        assert!(blocks_move(&f, &special));
        assert!(!blocks_move(&f, &physical));

        apply(&mut f, &EffectTemplate::new(EffectKind::Snare, 1));
        assert!(blocks_move(&f, &physical));
    }

    #[test]
    fn test_fresh_effect_not_ticked() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 1, 10));

        let events = tick_end_of_turn(&mut f, at());
        assert!(events.is_empty());
        assert_eq!(f.current_hp, 100);
        assert_eq!(f.effects[0].duration, 1);
        assert!(!f.effects[0].fresh);

        let events = tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 90);
        assert!(f.effects.is_empty());
        assert!(matches!(events[0], BattleEvent::Damage { amount: 10, source: None, .. }));
        assert!(matches!(
            events[1],
            BattleEvent::EffectExpired { kind: EffectKind::DamageOverTime, .. }
        ));
    }

    #[test]
    fn test_duration_counts_sweeps() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::new(EffectKind::Stun, 2));
        age(&mut f);
        tick_end_of_turn(&mut f, at());
        assert!(is_stunned(&f));
        tick_end_of_turn(&mut f, at());
        assert!(!is_stunned(&f));
    }

    #[test]
    fn test_heal_over_time_clamped() {
        let mut f = fighter();
        f.take_damage(5);
        apply(&mut f, &EffectTemplate::with_value(EffectKind::HealOverTime, 2, 20));
        age(&mut f);
        let events = tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 100);
        assert!(matches!(events[0], BattleEvent::Heal { amount: 5, .. }));
    }

    #[test]
    fn test_dot_kill_skips_heal() {
        let mut f = fighter();
        f.take_damage(95);
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 10));
        apply(&mut f, &EffectTemplate::with_value(EffectKind::HealOverTime, 2, 50));
        age(&mut f);
        let events = tick_end_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 0);
        assert!(matches!(events[0], BattleEvent::Damage { amount: 5, hp: 0, .. }));
        assert!(!events.iter().any(|e| matches!(e, BattleEvent::Heal { .. })));
    }

    #[test]
    fn test_regeneration_at_start() {
        let mut f = fighter();
        f.take_damage(30);
        apply(&mut f, &EffectTemplate::with_value(EffectKind::Regeneration, 2, 10));
        let events = tick_start_of_turn(&mut f, at());
        assert_eq!(f.current_hp, 80);
        assert_eq!(events.len(), 1);
        // regeneration does not count down at start of turn
        assert_eq!(f.effects[0].duration, 2);
    }

    #[test]
    fn test_damage_boost_may_be_negative() {
        let mut f = fighter();
        apply(&mut f, &EffectTemplate::with_value(EffectKind::DamageBoost, 1, -15));
        assert_eq!(damage_boost(&f), -15);
        assert_eq!(damage_reduction(&f), 0);
    }
}
