//! Conversion from engine state to the wire snapshot

use std::time::{SystemTime, UNIX_EPOCH};

use pokearena_protocol::{
    BattleSnapshot, EffectView, EventView, FighterView, LogEntryView, PhaseView, PlayerView,
};

use crate::engine::log::{BattleEvent, LogEntry};
use crate::session::Battle;
use crate::state::{BattleState, Outcome, Phase};
use crate::types::{Effect, Fighter, Player};

impl From<Phase> for PhaseView {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::StartTurn => PhaseView::StartTurn,
            Phase::CollectingActions => PhaseView::CollectingActions,
            Phase::BuildQueue => PhaseView::BuildQueue,
            Phase::ExecutingQueue => PhaseView::ExecutingQueue,
            Phase::EndTurn => PhaseView::EndTurn,
            Phase::Finished => PhaseView::Finished,
        }
    }
}

impl BattleState {
    /// Snapshot with the last `tail` log entries. `submitted` flags are
    /// per side, P1 first.
    pub fn to_snapshot(&self, submitted: [bool; 2], tail: usize) -> BattleSnapshot {
        let start = self.log.len().saturating_sub(tail);
        let log = self.log[start..]
            .iter()
            .enumerate()
            .map(|(i, entry)| log_entry_view(start + i, entry))
            .collect();

        BattleSnapshot {
            battle_id: self.id.0,
            turn: self.turn,
            phase: self.phase.into(),
            players: self
                .players
                .iter()
                .map(|p| player_view(p, submitted[p.side.index()]))
                .collect(),
            winner: self.winner(),
            draw: self.outcome == Some(Outcome::Draw),
            turn_deadline_ms: self.turn_deadline.and_then(unix_millis),
            log_len: self.log.len(),
            log,
        }
    }
}

impl Battle {
    /// Snapshot including which sides have submitted this turn
    pub fn snapshot(&self, tail: usize) -> BattleSnapshot {
        self.state().to_snapshot(self.submitted(), tail)
    }
}

fn player_view(player: &Player, submitted: bool) -> PlayerView {
    PlayerView {
        player_id: player.id.clone(),
        side: player.side,
        energy: player.energy.to_id_map(),
        fighters: player.fighters.iter().map(fighter_view).collect(),
        submitted,
    }
}

fn fighter_view(fighter: &Fighter) -> FighterView {
    FighterView {
        slot: fighter.slot,
        template_id: fighter.template_id.clone(),
        name: fighter.name.clone(),
        types: fighter.types.iter().map(|t| t.as_id().to_string()).collect(),
        hp: fighter.current_hp,
        max_hp: fighter.max_hp,
        fainted: fighter.fainted,
        effects: fighter.effects.iter().map(effect_view).collect(),
        cooldowns: fighter.cooldowns.clone(),
    }
}

fn effect_view(effect: &Effect) -> EffectView {
    EffectView {
        kind: effect.kind.as_id().to_string(),
        duration: effect.duration,
        value: effect.magnitude(),
    }
}

fn log_entry_view(seq: usize, entry: &LogEntry) -> LogEntryView {
    LogEntryView {
        seq,
        turn: entry.turn,
        event: event_view(&entry.event),
    }
}

/// Render an engine event in its wire form
pub fn event_view(event: &BattleEvent) -> EventView {
    match event.clone() {
        BattleEvent::BattleStarted => EventView::BattleStarted,
        BattleEvent::TurnStarted => EventView::TurnStarted,
        BattleEvent::EnergyGained {
            side,
            energy,
            amount,
        } => EventView::EnergyGained {
            side,
            energy: energy.as_id().to_string(),
            amount,
        },
        BattleEvent::EnergySpent { side, spent } => EventView::EnergySpent {
            side,
            spent: spent.to_id_map(),
        },
        BattleEvent::ActionUsed {
            actor,
            move_id,
            targets,
        } => EventView::ActionUsed {
            actor,
            move_id,
            targets,
        },
        BattleEvent::ActionFailed {
            actor,
            move_id,
            reason,
        } => EventView::ActionFailed {
            actor,
            move_id,
            reason: reason.as_id().to_string(),
        },
        BattleEvent::Blocked {
            actor,
            target,
            move_id,
        } => EventView::Blocked {
            actor,
            target,
            move_id,
        },
        BattleEvent::Damage {
            source,
            target,
            amount,
            effectiveness,
            critical,
            hp,
        } => EventView::Damage {
            source,
            target,
            amount,
            effectiveness,
            critical,
            hp,
        },
        BattleEvent::Heal {
            source,
            target,
            amount,
            hp,
        } => EventView::Heal {
            source,
            target,
            amount,
            hp,
        },
        BattleEvent::EffectApplied {
            target,
            kind,
            duration,
            value,
        } => EventView::EffectApplied {
            target,
            effect: kind.as_id().to_string(),
            duration,
            value,
        },
        BattleEvent::EffectExpired { target, kind } => EventView::EffectExpired {
            target,
            effect: kind.as_id().to_string(),
        },
        BattleEvent::Fainted { target } => EventView::Fainted { target },
        BattleEvent::TurnSkipped { side, timed_out } => EventView::TurnSkipped { side, timed_out },
        BattleEvent::Surrendered { side } => EventView::Surrendered { side },
        BattleEvent::BattleEnded { winner } => EventView::BattleEnded { winner },
    }
}

fn unix_millis(at: SystemTime) -> Option<u64> {
    let since = at.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(since.as_millis()).ok()
}
