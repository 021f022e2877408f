//! Replay loading, indexing, and playback for pokearena battle logs.
//!
//! A replay is built from a [`BattleSnapshot`] (as returned by the engine
//! or stored after a battle) and indexes its log by turn so it can be
//! stepped through, rewound, or filtered by fighter.
//!
//! ```ignore
//! use pokearena_replay::Replay;
//!
//! let replay = Replay::load("battle-17.json")?;
//! let mut cursor = replay.cursor();
//! while let Some(entry) = cursor.next_entry() {
//!     println!("turn {}: {:?}", entry.turn, entry.event);
//! }
//! ```

mod cursor;
mod summary;

pub use cursor::Cursor;
pub use summary::{FighterTotals, ReplaySummary};

use std::ops::Range;
use std::path::Path;

use anyhow::Context;
use pokearena_protocol::{BattleSnapshot, FighterRef, LogEntryView};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Invalid replay JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Log entries out of order at seq {0}")]
    OutOfOrder(usize),

    #[error("Turn {0} is not in this replay")]
    UnknownTurn(u32),
}

/// Log entries of one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSpan {
    pub turn: u32,
    /// Index range into [`Replay::entries`]
    pub range: Range<usize>,
}

/// An indexed battle log
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    snapshot: BattleSnapshot,
    turns: Vec<TurnSpan>,
}

impl Replay {
    /// Index a snapshot's log. Entries must be in sequence order with
    /// non-decreasing turns.
    pub fn from_snapshot(snapshot: BattleSnapshot) -> Result<Self, ReplayError> {
        let mut turns: Vec<TurnSpan> = Vec::new();
        let mut last_seq = None;

        for (i, entry) in snapshot.log.iter().enumerate() {
            if last_seq.is_some_and(|seq| entry.seq <= seq) {
                return Err(ReplayError::OutOfOrder(entry.seq));
            }
            last_seq = Some(entry.seq);

            match turns.last_mut() {
                Some(span) if span.turn == entry.turn => span.range.end = i + 1,
                Some(span) if span.turn > entry.turn => {
                    return Err(ReplayError::OutOfOrder(entry.seq));
                }
                _ => turns.push(TurnSpan {
                    turn: entry.turn,
                    range: i..i + 1,
                }),
            }
        }

        Ok(Self { snapshot, turns })
    }

    /// Parse a snapshot from JSON
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        Self::from_snapshot(serde_json::from_str(text)?)
    }

    /// Read a stored snapshot from disk
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to index replay {}", path.display()))
    }

    pub fn snapshot(&self) -> &BattleSnapshot {
        &self.snapshot
    }

    pub fn battle_id(&self) -> u64 {
        self.snapshot.battle_id
    }

    pub fn entries(&self) -> &[LogEntryView] {
        &self.snapshot.log
    }

    pub fn len(&self) -> usize {
        self.snapshot.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.log.is_empty()
    }

    /// Whether the log starts at the battle's first event
    pub fn is_complete(&self) -> bool {
        self.snapshot.log.len() == self.snapshot.log_len
    }

    /// Turn index, in order
    pub fn turns(&self) -> &[TurnSpan] {
        &self.turns
    }

    /// Entries of one turn
    pub fn turn(&self, turn: u32) -> Result<&[LogEntryView], ReplayError> {
        let span = self
            .turns
            .iter()
            .find(|span| span.turn == turn)
            .ok_or(ReplayError::UnknownTurn(turn))?;
        Ok(&self.snapshot.log[span.range.clone()])
    }

    /// Entries that concern a fighter
    pub fn for_fighter(&self, fighter: FighterRef) -> Vec<&LogEntryView> {
        self.snapshot
            .log
            .iter()
            .filter(|entry| entry.event.fighters().contains(&fighter))
            .collect()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary::from_replay(self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pokearena_protocol::{EventView, Side};

    fn replay() -> Replay {
        Replay::from_json(fixtures::FINISHED).unwrap()
    }

    #[test]
    fn test_turn_index() {
        let replay = replay();
        assert!(replay.is_complete());
        assert_eq!(replay.len(), 9);
        assert_eq!(
            replay.turns(),
            &[
                TurnSpan { turn: 1, range: 0..4 },
                TurnSpan { turn: 2, range: 4..9 },
            ]
        );
        assert_eq!(replay.turn(2).unwrap().len(), 5);
        assert!(matches!(replay.turn(3), Err(ReplayError::UnknownTurn(3))));
    }

    #[test]
    fn test_for_fighter() {
        let replay = replay();
        let squirtle = replay.for_fighter(FighterRef::new(Side::P2, 0));
        assert_eq!(squirtle.len(), 5);
        assert!(matches!(squirtle.last().unwrap().event, EventView::Fainted { .. }));
        assert!(replay.for_fighter(FighterRef::new(Side::P1, 3)).is_empty());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut snapshot = replay().snapshot().clone();
        snapshot.log.swap(2, 5);
        assert!(matches!(
            Replay::from_snapshot(snapshot),
            Err(ReplayError::OutOfOrder(_))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Replay::from_json("{"), Err(ReplayError::Json(_))));
    }

    #[test]
    fn test_truncated_log_is_incomplete() {
        let mut snapshot = replay().snapshot().clone();
        snapshot.log.drain(..4);
        let replay = Replay::from_snapshot(snapshot).unwrap();
        assert!(!replay.is_complete());
        assert_eq!(replay.turns().len(), 1);
        assert_eq!(replay.turns()[0].range, 0..5);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = Replay::load("/nonexistent/replay.json").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read replay"));
    }
}
