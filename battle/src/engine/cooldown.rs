//! Cooldown manager
//!
//! Cooldowns started during a turn are skipped by that turn's sweep, so a
//! move with cooldown N is unusable for the next N turns.

use crate::types::Fighter;

/// Whether `move_id` can be used (no cooldown entry)
pub fn is_available(fighter: &Fighter, move_id: &str) -> bool {
    !fighter.cooldowns.contains_key(move_id)
}

/// Turns left before `move_id` is usable again
pub fn remaining(fighter: &Fighter, move_id: &str) -> u32 {
    fighter.cooldowns.get(move_id).copied().unwrap_or(0)
}

/// Lock `move_id` for `length` turns, overwriting any existing entry
pub fn start(fighter: &mut Fighter, move_id: &str, length: u32) {
    if length == 0 {
        fighter.cooldowns.remove(move_id);
        fighter.fresh_cooldowns.remove(move_id);
        return;
    }
    fighter.cooldowns.insert(move_id.to_string(), length);
    fighter.fresh_cooldowns.insert(move_id.to_string());
}

/// End-of-turn sweep: decrement every entry not started this turn and drop
/// the ones that reach zero
pub fn tick(fighter: &mut Fighter) {
    let fresh = std::mem::take(&mut fighter.fresh_cooldowns);
    fighter.cooldowns.retain(|move_id, turns| {
        if fresh.contains(move_id) {
            return true;
        }
        *turns = turns.saturating_sub(1);
        *turns > 0
    });
}
