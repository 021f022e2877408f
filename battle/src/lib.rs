//! Deterministic turn-based battle engine for pokearena.
//!
//! Two players each field a small team of fighters. Every turn both players
//! submit actions for their fighters simultaneously; the engine orders them
//! into one queue, resolves them against a shared state and reports what
//! happened as an append-only event log.
//!
//! # Overview
//!
//! ```text
//! pokearena-team (templates)     pokearena-protocol (wire format)
//!        │                                │
//!        ▼                                ▼
//! pokearena-battle (engine + lifecycle) ← THIS CRATE
//!        │
//!        └─> pokearena-replay (log playback)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Type`] - Affinities with the effectiveness chart
//! - [`Energy`], [`EnergyPool`] - Per-player energy and move costs
//! - [`EffectKind`], [`Effect`] - Timed effects on fighters
//! - [`Move`], [`TargetRule`], [`MoveClass`] - Static move templates
//! - [`Fighter`], [`Player`] - Mutable battle participants
//!
//! ## Engine
//! - [`BattleState`] - The whole state of one battle
//! - [`engine`] - Effects, cooldowns, action resolution and the turn loop
//!
//! ## Lifecycle
//! - [`Battle`] - One live battle with its seeded RNG
//! - [`BattleManager`] - Thread-safe registry of live battles
//! - [`BattleService`] - JSON command front door
//!
//! # Example Usage
//!
//! ```ignore
//! use pokearena_battle::{ActionIntent, BattleConfig, BattleManager, PlayerSetup};
//!
//! let manager = BattleManager::new(BattleConfig::default());
//! let id = manager.create_battle(
//!     PlayerSetup::new("ash", ash_team),
//!     PlayerSetup::new("gary", gary_team),
//!     42,
//! )?;
//!
//! manager.submit_action(id, "ash", vec![ActionIntent::new(0, "ember", vec![1])])?;
//! let receipt = manager.skip_turn(id, "gary")?;
//! assert!(receipt.resolved);
//! ```

pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod manager;
pub mod query;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod template;
pub mod types;

// Re-export main types at crate root for convenience
pub use ai::{GreedyPolicy, Policy, RandomPolicy};
pub use config::BattleConfig;
pub use engine::{ActionIntent, BattleEvent, LogEntry};
pub use error::{ActionFailure, EngineError, FailureReason, ManagerError};
pub use manager::{BattleManager, SubmitReceipt};
pub use service::BattleService;
pub use session::{Battle, PlayerSetup, Submitted};
pub use state::{BattleId, BattleState, Outcome, Phase};
pub use template::{convert_team, TemplateError};
pub use types::{
    effectiveness_multiplier, Effect, EffectKind, EffectTemplate, Energy, EnergyCost, EnergyPool,
    Fighter, Move, MoveClass, Player, PokemonTemplate, TargetRule, Type, TYPE_CHART,
};

// Re-export commonly used protocol types
pub use pokearena_protocol::{BattleSnapshot, FighterRef, Side};
