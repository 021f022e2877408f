use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{ActionRequest, ClientCommand, PlayerEntry, parse_client_command};
pub use server::{
    BattleSnapshot, EffectView, EventView, FighterRef, FighterView, LogEntryView, PhaseView,
    PlayerView, ServerResponse, Side, parse_server_response,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
