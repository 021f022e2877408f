//! Query helpers for battle decision making
//!
//! This module provides utilities for analyzing type matchups and picking
//! targets, used by the built-in policies.

mod matchup;

pub use matchup::{
    // Type-level queries
    is_immune_to,
    is_weak_to_any,
    resistances,
    weaknesses,
    // Fighter-level queries
    best_target,
    expected_damage,
    move_effectiveness,
    threatened_by,
};
