//! Domain types: affinities, energy, effects, moves, fighters and players

mod effect;
mod energy;
mod moves;
mod pokemon;
mod pokemon_type;
mod side;

pub use effect::{Effect, EffectKind, EffectTemplate};
pub use energy::{Energy, EnergyCost, EnergyPool};
pub use moves::{Move, MoveClass, TargetRule};
pub use pokemon::{Fighter, PokemonTemplate};
pub use pokemon_type::{effectiveness_multiplier, Type, TYPE_CHART};
pub use side::Player;
