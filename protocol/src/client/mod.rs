//! Commands that callers send to the battle engine

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// One player joining a new battle: who they are and which templates they bring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub player_id: String,
    /// Pokemon template ids, in slot order
    pub team: Vec<String>,
}

/// A single move submission for one fighter
///
/// The actor is named either by `slot` or by `pokemon_id`; when both are
/// present the slot wins. Target ids are slots on whichever side the move's
/// target rule points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pokemon_id: Option<String>,

    pub move_id: String,

    #[serde(default, alias = "targets")]
    pub target_ids: Vec<usize>,
}

impl ActionRequest {
    /// Request addressed by slot
    pub fn by_slot(slot: usize, move_id: impl Into<String>, target_ids: Vec<usize>) -> Self {
        Self {
            slot: Some(slot),
            pokemon_id: None,
            move_id: move_id.into(),
            target_ids,
        }
    }

    /// Request addressed by template id
    pub fn by_pokemon(
        pokemon_id: impl Into<String>,
        move_id: impl Into<String>,
        target_ids: Vec<usize>,
    ) -> Self {
        Self {
            slot: None,
            pokemon_id: Some(pokemon_id.into()),
            move_id: move_id.into(),
            target_ids,
        }
    }
}

/// Commands accepted by the engine's service layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Start a battle between two matched players
    CreateBattle {
        player1: PlayerEntry,
        player2: PlayerEntry,
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Submit this turn's moves for every fighter the player wants to act with
    SubmitAction {
        battle_id: u64,
        player_id: String,
        actions: Vec<ActionRequest>,
    },

    /// Pass the whole turn
    SkipTurn { battle_id: u64, player_id: String },

    /// Concede the battle
    Surrender { battle_id: u64, player_id: String },

    /// Read the current state
    GetState { battle_id: u64 },
}

impl ClientCommand {
    /// Battle this command is addressed to (None for creation)
    pub fn battle_id(&self) -> Option<u64> {
        match self {
            Self::CreateBattle { .. } => None,
            Self::SubmitAction { battle_id, .. }
            | Self::SkipTurn { battle_id, .. }
            | Self::Surrender { battle_id, .. }
            | Self::GetState { battle_id } => Some(*battle_id),
        }
    }

    /// Serialize command to wire format (JSON)
    pub fn to_wire_format(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Parse a JSON command sent by a caller
pub fn parse_client_command(text: &str) -> Result<ClientCommand> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    let value: serde_json::Value =
        serde_json::from_str(text).context("Command is not valid JSON")?;

    if value.get("command").is_none() {
        return Err(ParseError::MissingField("command".to_string()).into());
    }

    serde_json::from_value(value)
        .map_err(|e| ParseError::InvalidFormat(e.to_string()))
        .context("Failed to decode command")
}
