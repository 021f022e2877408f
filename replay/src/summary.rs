//! Aggregate statistics over a replay

use std::collections::BTreeMap;

use pokearena_protocol::{EventView, FighterRef, Side};
use serde::Serialize;

use crate::Replay;

/// Per-fighter totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FighterTotals {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub healing_done: u32,
    pub actions: u32,
    pub failed_actions: u32,
}

/// What happened over the whole replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub battle_id: u64,
    pub turns: u32,
    pub winner: Option<Side>,
    pub draw: bool,
    /// Fighters in the order they fainted
    pub faint_order: Vec<FighterRef>,
    pub fighters: BTreeMap<String, FighterTotals>,
}

impl ReplaySummary {
    pub fn from_replay(replay: &Replay) -> Self {
        let snapshot = replay.snapshot();
        let mut fighters: BTreeMap<String, FighterTotals> = BTreeMap::new();
        let mut faint_order = Vec::new();

        for entry in replay.entries() {
            match &entry.event {
                EventView::ActionUsed { actor, .. } => {
                    fighters.entry(actor.to_string()).or_default().actions += 1;
                }
                EventView::ActionFailed { actor, .. } => {
                    fighters.entry(actor.to_string()).or_default().failed_actions += 1;
                }
                EventView::Damage {
                    source,
                    target,
                    amount,
                    ..
                } => {
                    if let Some(source) = source {
                        fighters.entry(source.to_string()).or_default().damage_dealt += amount;
                    }
                    fighters.entry(target.to_string()).or_default().damage_taken += amount;
                }
                EventView::Heal {
                    source: Some(source),
                    amount,
                    ..
                } => {
                    fighters.entry(source.to_string()).or_default().healing_done += amount;
                }
                EventView::Fainted { target } => faint_order.push(*target),
                _ => {}
            }
        }

        Self {
            battle_id: snapshot.battle_id,
            turns: snapshot.turn,
            winner: snapshot.winner,
            draw: snapshot.draw,
            faint_order,
            fighters,
        }
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
