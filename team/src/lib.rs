//! Static template data for pokearena battles.
//!
//! Pokemon and move definitions are immutable input to the battle engine.
//! This crate owns their data format: it loads a [`Dex`] from JSON, resolves
//! a [`TeamSpec`] (an ordered list of template ids) into concrete templates,
//! and checks the shape of the data before the engine ever sees it.
//!
//! Older exports stored nested fields (types, costs, effects, classes) as
//! JSON-encoded strings; both that form and plain nested JSON are accepted.
//!
//! ```ignore
//! use pokearena_team::{Dex, TeamSpec};
//!
//! let dex = Dex::from_json(&std::fs::read_to_string("dex.json")?)?;
//! let spec = TeamSpec::parse("charmander|squirtle|bulbasaur")?;
//! let team = dex.resolve(&spec, 3)?;
//! ```

mod data;
mod dex;
mod embedded;
mod format;

pub use data::{EffectData, MoveData, PokemonData};
pub use dex::Dex;
pub use format::TeamSpec;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown pokemon: {0}")]
    UnknownPokemon(String),

    #[error("Team must have {expected} members, found {found}")]
    WrongSize { expected: usize, found: usize },

    #[error("Duplicate team member: {0}")]
    DuplicateMember(String),

    #[error("Invalid template {id}: {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("Empty team")]
    EmptyTeam,
}
