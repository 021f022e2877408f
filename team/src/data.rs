//! Template records as stored in dex files

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::TeamError;
use crate::embedded::embedded;

/// A Pokemon template: identity, typing, HP and its move list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonData {
    pub id: String,
    pub name: String,

    /// One or two type names ("fire", "water", ...)
    #[serde(deserialize_with = "embedded")]
    pub types: Vec<String>,

    #[serde(alias = "hp")]
    pub max_hp: u32,

    #[serde(alias = "skills", default, deserialize_with = "embedded")]
    pub moves: Vec<MoveData>,
}

/// A move (skill) template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub move_type: String,

    /// Energy requirement keyed by energy name; "colorless" is the wildcard
    #[serde(alias = "requirements", default, deserialize_with = "embedded")]
    pub cost: BTreeMap<String, u32>,

    #[serde(default)]
    pub cooldown: u32,

    #[serde(default)]
    pub damage: u32,

    #[serde(default)]
    pub healing: u32,

    #[serde(default, deserialize_with = "embedded")]
    pub effects: Vec<EffectData>,

    /// Targeting rule name ("self", "one_enemy", "all_enemies", ...)
    pub target: String,

    /// Interaction tags ("physical", "special", "piercing", "affliction")
    #[serde(default, deserialize_with = "embedded")]
    pub classes: Vec<String>,

    #[serde(default)]
    pub priority: i8,
}

/// An effect a move applies on hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectData {
    #[serde(alias = "type")]
    pub kind: String,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

impl PokemonData {
    /// Check the record's shape (not its vocabulary, which the engine owns)
    pub fn validate(&self) -> Result<(), TeamError> {
        let invalid = |reason: &str| TeamError::InvalidTemplate {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.types.is_empty() || self.types.len() > 2 {
            return Err(invalid("must have one or two types"));
        }
        if self.max_hp == 0 {
            return Err(invalid("max_hp must be positive"));
        }
        if self.moves.is_empty() {
            return Err(invalid("no moves"));
        }

        let mut seen = HashSet::new();
        for mv in &self.moves {
            if !seen.insert(mv.id.as_str()) {
                return Err(invalid(&format!("duplicate move {}", mv.id)));
            }
            if mv.effects.iter().any(|e| e.duration == 0) {
                return Err(invalid(&format!("move {} has a zero-duration effect", mv.id)));
            }
        }

        Ok(())
    }

    /// Find a move by id
    pub fn find_move(&self, move_id: &str) -> Option<&MoveData> {
        self.moves.iter().find(|m| m.id == move_id)
    }
}
