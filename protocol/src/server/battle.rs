//! Shared identifiers for battle messages

use serde::{Deserialize, Serialize};

/// Side of a battle (p1 or p2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    P1,
    P2,
}

impl Side {
    /// Both sides, in queue order
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Side::P1),
            "p2" => Some(Side::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::P1 => "p1",
            Side::P2 => "p2",
        }
    }

    /// The other side
    pub fn opponent(&self) -> Self {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Array index (p1 = 0, p2 = 1)
    pub fn index(&self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fighter addressed by side and slot (e.g. "p1:0")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FighterRef {
    pub side: Side,
    pub slot: usize,
}

impl FighterRef {
    pub fn new(side: Side, slot: usize) -> Self {
        Self { side, slot }
    }

    /// Parse a "p1:2" style reference
    pub fn parse(s: &str) -> Option<Self> {
        let (side, slot) = s.split_once(':')?;
        Some(Self {
            side: Side::parse(side)?,
            slot: slot.parse().ok()?,
        })
    }
}

impl std::fmt::Display for FighterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.side, self.slot)
    }
}
