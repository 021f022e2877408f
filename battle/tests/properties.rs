//! Invariants that must hold across randomly played battles

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;

use pokearena_battle::{
    Battle, BattleConfig, BattleEvent, BattleId, BattleState, EffectKind, EffectTemplate, Energy,
    EnergyPool, GreedyPolicy, Move, MoveClass, PlayerSetup, Policy, PokemonTemplate, RandomPolicy,
    Side, TargetRule, Type,
};
use proptest::prelude::*;

fn team() -> Vec<PokemonTemplate> {
    let fire = Energy::Typed(Type::Fire);
    vec![
        PokemonTemplate::new("blaze", vec![Type::Fire], 90)
            .with_move(Move::new("scratch", Type::Normal, TargetRule::OneEnemy).with_damage(15))
            .with_move(
                Move::new("ember", Type::Fire, TargetRule::AllEnemies)
                    .with_damage(20)
                    .with_cooldown(2)
                    .with_cost(EnergyPool::from_pairs([(fire, 1)]))
                    .with_effect(EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 5)),
            ),
        PokemonTemplate::new("shell", vec![Type::Water, Type::Rock], 120)
            .with_move(Move::new("tackle", Type::Normal, TargetRule::OneEnemy).with_damage(10))
            .with_move(
                Move::new("shield", Type::Water, TargetRule::SelfOnly)
                    .with_cooldown(3)
                    .with_effect(EffectTemplate::new(EffectKind::Invulnerable, 1)),
            )
            .with_move(
                Move::new("mend", Type::Water, TargetRule::OneAlly)
                    .with_healing(25)
                    .with_cost(EnergyPool::from_pairs([(Energy::Colorless, 1)])),
            ),
        PokemonTemplate::new("spark", vec![Type::Electric], 70)
            .with_move(
                Move::new("bolt", Type::Electric, TargetRule::OneEnemy)
                    .with_damage(30)
                    .with_class(MoveClass::Piercing)
                    .with_cost(EnergyPool::from_pairs([(Energy::Colorless, 2)])),
            )
            .with_move(
                Move::new("jolt", Type::Electric, TargetRule::OneEnemy)
                    .with_cooldown(1)
                    .with_effect(EffectTemplate::new(EffectKind::Stun, 1)),
            ),
    ]
}

fn new_battle(seed: u64) -> Battle {
    Battle::new(
        BattleId(seed),
        PlayerSetup::new("p1", team()),
        PlayerSetup::new("p2", team()),
        seed,
        Arc::new(BattleConfig::default()),
        SystemTime::UNIX_EPOCH,
    )
    .unwrap()
}

/// Play up to `turns` turns with the given policies, checking `each` after
/// every resolved turn
fn play(
    seed: u64,
    turns: usize,
    p1: &mut dyn Policy,
    p2: &mut dyn Policy,
    mut each: impl FnMut(&BattleState, &BattleState),
) -> BattleState {
    let mut battle = new_battle(seed);
    for _ in 0..turns {
        if battle.is_finished() {
            break;
        }
        let before = battle.state().clone();
        let a = p1.choose(battle.state(), Side::P1);
        let b = p2.choose(battle.state(), Side::P2);
        battle.submit(Side::P1, a, SystemTime::UNIX_EPOCH).unwrap();
        battle.submit(Side::P2, b, SystemTime::UNIX_EPOCH).unwrap();
        each(&before, battle.state());
    }
    battle.state().clone()
}

fn cooldowns(state: &BattleState) -> BTreeMap<(Side, usize, String), u32> {
    let mut all = BTreeMap::new();
    for player in &state.players {
        for fighter in &player.fighters {
            for (id, turns) in &fighter.cooldowns {
                all.insert((player.side, fighter.slot, id.clone()), *turns);
            }
        }
    }
    all
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hp_stays_in_bounds(seed in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
        play(seed, 30, &mut RandomPolicy::new(a), &mut RandomPolicy::new(b), |_, after| {
            for player in &after.players {
                for fighter in &player.fighters {
                    assert!(fighter.current_hp <= fighter.max_hp);
                    assert_eq!(fighter.fainted, fighter.current_hp == 0);
                    if fighter.fainted {
                        assert!(fighter.effects.is_empty());
                        assert!(fighter.cooldowns.is_empty());
                    }
                }
            }
        });
    }

    #[test]
    fn energy_never_goes_negative(seed in any::<u64>(), a in any::<u64>()) {
        play(seed, 30, &mut RandomPolicy::new(a), &mut GreedyPolicy::default(), |before, after| {
            for side in Side::BOTH {
                let pool = &after.player(side).energy;
                assert!(pool.iter().all(|(_, count)| count > 0));

                // spent this turn never exceeds what was held plus what was gained
                let spent: u32 = after
                    .log
                    .iter()
                    .filter(|e| e.turn == before.turn)
                    .filter_map(|e| match &e.event {
                        BattleEvent::EnergySpent { side: s, spent } if *s == side => {
                            Some(spent.total())
                        }
                        _ => None,
                    })
                    .sum();
                assert!(spent <= before.player(side).energy.total());
            }
        });
    }

    #[test]
    fn unused_cooldowns_never_grow(seed in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
        play(seed, 30, &mut RandomPolicy::new(a), &mut RandomPolicy::new(b), |before, after| {
            let used: Vec<(Side, usize, String)> = after
                .log
                .iter()
                .filter(|e| e.turn == before.turn)
                .filter_map(|e| match &e.event {
                    BattleEvent::ActionUsed { actor, move_id, .. } => {
                        Some((actor.side, actor.slot, move_id.clone()))
                    }
                    _ => None,
                })
                .collect();

            let old = cooldowns(before);
            for (key, turns) in cooldowns(after) {
                if used.contains(&key) {
                    continue;
                }
                let previous = old.get(&key).copied().unwrap_or(0);
                assert!(turns < previous, "{key:?}: {previous} -> {turns}");
            }
        });
    }

    #[test]
    fn same_seed_same_battle(seed in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
        let first = play(seed, 20, &mut RandomPolicy::new(a), &mut RandomPolicy::new(b), |_, _| {});
        let second = play(seed, 20, &mut RandomPolicy::new(a), &mut RandomPolicy::new(b), |_, _| {});
        prop_assert_eq!(first, second);
    }
}

#[test]
fn finished_battles_have_a_consistent_outcome() {
    for seed in 0..20 {
        let state = play(
            seed,
            200,
            &mut GreedyPolicy::default(),
            &mut RandomPolicy::new(seed),
            |_, _| {},
        );
        if state.is_finished() {
            let p1_out = state.player1().all_fainted();
            let p2_out = state.player2().all_fainted();
            match state.winner() {
                Some(Side::P1) => assert!(p2_out && !p1_out),
                Some(Side::P2) => assert!(p1_out && !p2_out),
                None => assert!(p1_out && p2_out),
            }
            assert_eq!(state.turn_deadline, None);
        }
    }
}
