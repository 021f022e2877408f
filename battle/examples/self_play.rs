//! Self-play example
//!
//! Runs a handful of battles between the built-in policies through the
//! battle manager, each on its own task, and prints how they ended.
//!
//! RUST_LOG=pokearena_battle=debug cargo run --example self_play

use std::sync::Arc;

use anyhow::{Context, Result};
use pokearena_battle::{
    convert_team, BattleConfig, BattleManager, GreedyPolicy, PlayerSetup, Policy, RandomPolicy,
    Side,
};
use pokearena_team::{Dex, TeamSpec};
use tracing_subscriber::EnvFilter;

const TEAMS: [&str; 4] = [
    "charmander|squirtle|bulbasaur",
    "pikachu|geodude|abra",
    "machop|chansey|charmander",
    "squirtle|pikachu|machop",
];

fn setup(dex: &Dex, player: &str, team: &str, size: usize) -> Result<PlayerSetup> {
    let spec = TeamSpec::parse(team)?;
    let data = dex.resolve(&spec, size)?;
    let templates = convert_team(&data).with_context(|| format!("team {team}"))?;
    Ok(PlayerSetup::new(player, templates))
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("pokearena_battle=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dex = Dex::starters()?;
    let manager = Arc::new(BattleManager::new(BattleConfig {
        critical_chance: 0.1,
        ..BattleConfig::default()
    }));
    let size = manager.config().team_size;

    let mut tasks = Vec::new();
    for (i, pair) in TEAMS.windows(2).enumerate() {
        let greedy = setup(&dex, &format!("greedy-{i}"), pair[0], size)?;
        let random = setup(&dex, &format!("random-{i}"), pair[1], size)?;
        let id = manager.create_battle(greedy, random, i as u64)?;

        let manager = manager.clone();
        tasks.push(tokio::spawn(async move {
            let mut p1 = GreedyPolicy::new(manager.config().clone());
            let mut p2 = RandomPolicy::new(i as u64);

            for _ in 0..100 {
                let Some(state) = manager.get_state(id) else {
                    break;
                };
                if state.is_finished() {
                    break;
                }
                let first = p1.choose(&state, Side::P1);
                let second = p2.choose(&state, Side::P2);
                manager.submit_action(id, &state.player1().id, first)?;
                manager.submit_action(id, &state.player2().id, second)?;
                tokio::task::yield_now().await;
            }
            anyhow::Ok(id)
        }));
    }

    for task in tasks {
        let id = task.await??;
        let Some(snapshot) = manager.get_battle(id) else {
            continue;
        };
        let result = match (snapshot.winner, snapshot.draw) {
            (Some(side), _) => format!("{} wins", side.as_str()),
            (None, true) => "draw".to_string(),
            (None, false) => "unfinished".to_string(),
        };
        println!("battle {id}: {result} after {} turns", snapshot.turn);
        for player in &snapshot.players {
            let alive = player.alive_count();
            println!("  {} ({:?}): {alive} standing", player.player_id, player.side);
        }
        if snapshot.is_finished() {
            manager.evict(id)?;
        }
    }

    println!("{} battles left running", manager.len());
    Ok(())
}
