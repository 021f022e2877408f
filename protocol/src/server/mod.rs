mod battle;
mod snapshot;

pub use battle::{FighterRef, Side};
pub use snapshot::{
    BattleSnapshot, EffectView, EventView, FighterView, LogEntryView, PhaseView, PlayerView,
};

use crate::ParseError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Reply to every client command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<BattleSnapshot>,
}

impl ServerResponse {
    /// Successful reply carrying a snapshot
    pub fn ok(message: impl Into<String>, state: Option<BattleSnapshot>) -> Self {
        Self {
            success: true,
            message: message.into(),
            state,
        }
    }

    /// Rejected command; nothing changed
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            state: None,
        }
    }

    /// Serialize to wire format (JSON)
    pub fn to_wire_format(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to encode response")
    }
}

/// Parse a JSON response produced by the engine
pub fn parse_server_response(text: &str) -> Result<ServerResponse> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    serde_json::from_str(text)
        .map_err(|e| ParseError::InvalidFormat(e.to_string()))
        .context("Failed to decode response")
}
