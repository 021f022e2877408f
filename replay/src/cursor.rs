//! Playback position over a replay

use pokearena_protocol::LogEntryView;

use crate::{Replay, ReplayError};

/// Steps through a replay one entry or one turn at a time.
///
/// The position is the number of entries already played: 0 is before the
/// first entry, `len` is after the last.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    replay: &'a Replay,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(replay: &'a Replay) -> Self {
        Self {
            replay,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.replay.len()
    }

    /// Play the next entry
    pub fn next_entry(&mut self) -> Option<&'a LogEntryView> {
        let entry = self.replay.entries().get(self.position)?;
        self.position += 1;
        Some(entry)
    }

    /// Un-play the last entry and return it
    pub fn prev_entry(&mut self) -> Option<&'a LogEntryView> {
        self.position = self.position.checked_sub(1)?;
        self.replay.entries().get(self.position)
    }

    /// Play the rest of the current turn (or the next one when the cursor
    /// sits on a turn boundary)
    pub fn next_turn(&mut self) -> &'a [LogEntryView] {
        let Some(span) = self
            .replay
            .turns()
            .iter()
            .find(|span| span.range.end > self.position)
        else {
            return &[];
        };
        let start = self.position;
        self.position = span.range.end;
        &self.replay.entries()[start..span.range.end]
    }

    /// Move to just before the first entry of `turn`
    pub fn seek_turn(&mut self, turn: u32) -> Result<(), ReplayError> {
        let span = self
            .replay
            .turns()
            .iter()
            .find(|span| span.turn == turn)
            .ok_or(ReplayError::UnknownTurn(turn))?;
        self.position = span.range.start;
        Ok(())
    }

    /// Turn of the entry that would play next
    pub fn current_turn(&self) -> Option<u32> {
        self.replay.entries().get(self.position).map(|e| e.turn)
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a LogEntryView;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry()
    }
}
