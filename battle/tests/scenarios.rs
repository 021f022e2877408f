//! End-to-end battle scenarios

use std::time::SystemTime;

use pokearena_battle::engine::{resolver, turn};
use pokearena_battle::{
    ActionIntent, BattleConfig, BattleEvent, BattleId, BattleManager, BattleState, EffectKind,
    EffectTemplate, Energy, EnergyPool, FailureReason, FighterRef, ManagerError, Move, MoveClass,
    Outcome, Phase, Player, PlayerSetup, PokemonTemplate, Side, TargetRule, Type,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn now() -> SystemTime {
    SystemTime::UNIX_EPOCH
}

fn strike(damage: u32) -> Move {
    Move::new("strike", Type::Normal, TargetRule::OneEnemy).with_damage(damage)
}

fn mon(id: &str, ty: Type, hp: u32) -> PokemonTemplate {
    PokemonTemplate::new(id, vec![ty], hp).with_move(strike(50))
}

/// Both players field the same moves; P2's team is `defenders`
fn battle_state(attackers: &[PokemonTemplate], defenders: &[PokemonTemplate]) -> BattleState {
    BattleState::new(
        BattleId(1),
        Player::new("ash", Side::P1, attackers),
        Player::new("gary", Side::P2, defenders),
    )
}

fn started(mut state: BattleState) -> (BattleState, StdRng) {
    let mut rng = StdRng::seed_from_u64(7);
    turn::start_turn(&mut state, &mut rng, &BattleConfig::default(), now()).unwrap();
    (state, rng)
}

fn p1(slot: usize) -> FighterRef {
    FighterRef::new(Side::P1, slot)
}

fn p2(slot: usize) -> FighterRef {
    FighterRef::new(Side::P2, slot)
}

fn hp(state: &BattleState, at: FighterRef) -> u32 {
    state.fighter(at).map(|f| f.current_hp).unwrap()
}

#[test]
fn normal_attack_into_rock_is_halved() {
    let team = [mon("a", Type::Normal, 100)];
    let rocks = [mon("b", Type::Rock, 100)];
    let (mut state, mut rng) = started(battle_state(&team, &rocks));

    turn::resolve_turn(
        &mut state,
        [vec![ActionIntent::new(0, "strike", vec![0])], vec![]],
        &mut rng,
        &BattleConfig::default(),
        now(),
    )
    .unwrap();

    assert_eq!(hp(&state, p2(0)), 75);
    let effectiveness = state.log.iter().find_map(|e| match e.event {
        BattleEvent::Damage { effectiveness, .. } => Some(effectiveness),
        _ => None,
    });
    assert_eq!(effectiveness, Some(0.5));
}

#[test]
fn colorless_covers_typed_cost() {
    let fire = Energy::Typed(Type::Fire);
    let ember = Move::new("ember", Type::Fire, TargetRule::OneEnemy)
        .with_damage(10)
        .with_cost(EnergyPool::from_pairs([(fire, 1)]));
    let team = [PokemonTemplate::new("a", vec![Type::Fire], 100).with_move(ember)];
    let (mut state, mut rng) = started(battle_state(&team, &team));
    state.players[0].energy = EnergyPool::from_pairs([(Energy::Colorless, 1)]);

    let events = resolver::execute(
        &mut state,
        Side::P1,
        &ActionIntent::new(0, "ember", vec![0]),
        &mut rng,
        &BattleConfig::default(),
    )
    .unwrap();

    assert!(state.player1().energy.is_empty());
    assert_eq!(state.player1().energy.get(fire), 0);
    assert!(events.contains(&BattleEvent::EnergySpent {
        side: Side::P1,
        spent: EnergyPool::from_pairs([(Energy::Colorless, 1)]),
    }));
}

#[test]
fn simultaneous_knockout_is_a_draw() {
    let venom = Move::new("venom", Type::Poison, TargetRule::OneEnemy)
        .with_effect(EffectTemplate::with_value(EffectKind::DamageOverTime, 1, 30));
    let team = [PokemonTemplate::new("a", vec![Type::Normal], 20).with_move(venom)];
    let (mut state, mut rng) = started(battle_state(&team, &team));
    let config = BattleConfig::default();

    let both = [
        vec![ActionIntent::new(0, "venom", vec![0])],
        vec![ActionIntent::new(0, "venom", vec![0])],
    ];
    turn::resolve_turn(&mut state, both, &mut rng, &config, now()).unwrap();
    // applied this turn, so nothing ticks yet
    assert_eq!(hp(&state, p1(0)), 20);
    assert!(!state.is_finished());

    turn::resolve_turn(&mut state, [vec![], vec![]], &mut rng, &config, now()).unwrap();
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.outcome, Some(Outcome::Draw));
    assert_eq!(state.winner(), None);
    assert_eq!(
        state.log.last().map(|e| &e.event),
        Some(&BattleEvent::BattleEnded { winner: None })
    );
}

#[test]
fn fighter_killed_before_its_action_does_not_act() {
    let quick = Move::new("quick", Type::Normal, TargetRule::OneEnemy)
        .with_damage(50)
        .with_priority(1);
    let fast = [
        PokemonTemplate::new("a", vec![Type::Normal], 100).with_move(quick),
        mon("b", Type::Normal, 100),
    ];
    let slow = [mon("c", Type::Normal, 40), mon("d", Type::Normal, 100)];
    let (mut state, mut rng) = started(battle_state(&fast, &slow));

    turn::resolve_turn(
        &mut state,
        [
            vec![ActionIntent::new(0, "quick", vec![0])],
            vec![ActionIntent::new(0, "strike", vec![0])],
        ],
        &mut rng,
        &BattleConfig::default(),
        now(),
    )
    .unwrap();

    assert_eq!(hp(&state, p1(0)), 100);
    assert!(state.fighter(p2(0)).unwrap().fainted);
    assert!(state.log.iter().any(|e| e.event
        == BattleEvent::ActionFailed {
            actor: p2(0),
            move_id: "strike".to_string(),
            reason: FailureReason::ActorDead,
        }));
    assert!(!state.is_finished());
}

#[test]
fn wiping_a_team_wins() {
    let team = [mon("a", Type::Normal, 100), mon("b", Type::Normal, 100)];
    let weak = [mon("c", Type::Normal, 30), mon("d", Type::Normal, 30)];
    let (mut state, mut rng) = started(battle_state(&team, &weak));

    turn::resolve_turn(
        &mut state,
        [
            vec![
                ActionIntent::new(0, "strike", vec![0]),
                ActionIntent::new(1, "strike", vec![1]),
            ],
            vec![],
        ],
        &mut rng,
        &BattleConfig::default(),
        now(),
    )
    .unwrap();

    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.outcome, Some(Outcome::Knockout { winner: Side::P1 }));
    assert_eq!(state.turn_deadline, None);
}

#[test]
fn move_on_cooldown_is_rejected_without_side_effects() {
    let slam = strike(10).with_cooldown(2);
    let team = [PokemonTemplate::new("a", vec![Type::Normal], 100).with_move(slam)];
    let (mut state, mut rng) = started(battle_state(&team, &team));
    let config = BattleConfig::default();
    let intent = ActionIntent::new(0, "strike", vec![0]);

    resolver::execute(&mut state, Side::P1, &intent, &mut rng, &config).unwrap();
    let before = state.clone();

    let failure = resolver::execute(&mut state, Side::P1, &intent, &mut rng, &config).unwrap_err();
    assert_eq!(failure.reason, FailureReason::OnCooldown);
    assert_eq!(state, before);
}

#[test]
fn invulnerability_still_charges_the_attacker() {
    let fire = Energy::Typed(Type::Fire);
    let blast = Move::new("blast", Type::Fire, TargetRule::OneEnemy)
        .with_damage(40)
        .with_cooldown(2)
        .with_cost(EnergyPool::from_pairs([(fire, 1)]))
        .with_effect(EffectTemplate::new(EffectKind::Stun, 1));
    let drill = Move::new("drill", Type::Normal, TargetRule::OneEnemy)
        .with_damage(20)
        .with_class(MoveClass::Piercing);
    let team = [PokemonTemplate::new("a", vec![Type::Fire], 100)
        .with_move(blast)
        .with_move(drill)];
    let (mut state, mut rng) = started(battle_state(&team, &team));
    let config = BattleConfig::default();

    state.players[0].energy = EnergyPool::from_pairs([(fire, 1)]);
    if let Some(target) = state.fighter_mut(p2(0)) {
        pokearena_battle::engine::effects::apply(
            target,
            &EffectTemplate::new(EffectKind::Invulnerable, 1),
        );
    }

    let events = resolver::execute(
        &mut state,
        Side::P1,
        &ActionIntent::new(0, "blast", vec![0]),
        &mut rng,
        &config,
    )
    .unwrap();

    assert!(events.contains(&BattleEvent::Blocked {
        actor: p1(0),
        target: p2(0),
        move_id: "blast".to_string(),
    }));
    assert_eq!(hp(&state, p2(0)), 100);
    assert!(!state.fighter(p2(0)).unwrap().has_effect(EffectKind::Stun));
    assert!(state.player1().energy.is_empty());
    assert_eq!(state.fighter(p1(0)).unwrap().cooldowns.get("blast"), Some(&2));

    // piercing goes through
    let events = resolver::execute(
        &mut state,
        Side::P1,
        &ActionIntent::new(0, "drill", vec![0]),
        &mut rng,
        &config,
    )
    .unwrap();
    assert!(events.iter().any(|e| matches!(e, BattleEvent::Damage { amount: 20, .. })));
    assert_eq!(hp(&state, p2(0)), 80);
}

fn manager_team() -> Vec<PokemonTemplate> {
    vec![
        mon("a", Type::Normal, 100),
        mon("b", Type::Water, 100),
        mon("c", Type::Grass, 100),
    ]
}

fn manager_battle() -> (BattleManager, BattleId) {
    let manager = BattleManager::default();
    let id = manager
        .create_battle(
            PlayerSetup::new("ash", manager_team()),
            PlayerSetup::new("gary", manager_team()),
            3,
        )
        .unwrap();
    (manager, id)
}

#[test]
fn surrender_ends_the_battle_from_any_open_phase() {
    // before anyone submitted
    let (manager, id) = manager_battle();
    let state = manager.surrender(id, "ash").unwrap();
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.outcome, Some(Outcome::Surrender { winner: Side::P2 }));

    // with one submission pending, several turns in
    let (manager, id) = manager_battle();
    for _ in 0..3 {
        manager.skip_turn(id, "ash").unwrap();
        manager.skip_turn(id, "gary").unwrap();
    }
    manager
        .submit_action(id, "gary", vec![ActionIntent::new(0, "strike", vec![0])])
        .unwrap();
    let state = manager.surrender(id, "gary").unwrap();
    assert_eq!(state.turn, 4);
    assert_eq!(state.winner(), Some(Side::P1));

    // already finished
    assert_eq!(manager.surrender(id, "ash"), Err(ManagerError::BattleFinished(id)));
}

#[test]
fn get_state_is_idempotent() {
    let (manager, id) = manager_battle();
    let first = manager.get_battle(id).unwrap();
    assert_eq!(manager.get_battle(id).unwrap(), first);

    // a rejected submission changes nothing
    let rejected = manager.submit_action(id, "ash", vec![ActionIntent::new(0, "fly", vec![0])]);
    assert!(matches!(rejected, Err(ManagerError::Rejected { .. })));
    assert_eq!(manager.get_battle(id).unwrap(), first);

    manager.skip_turn(id, "ash").unwrap();
    let after = manager.get_battle(id).unwrap();
    assert_ne!(after, first);
    assert!(after.player(Side::P1).unwrap().submitted);
}
