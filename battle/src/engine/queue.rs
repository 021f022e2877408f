//! Action queue ordering
//!
//! Order is fixed: move priority (higher first), then p1 before p2, then
//! actor slot ascending, then submission order.

use std::cmp::Reverse;

use pokearena_protocol::Side;

use crate::engine::resolver::ActionIntent;
use crate::state::BattleState;

/// An intent placed in the turn's execution queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedAction {
    pub side: Side,
    pub intent: ActionIntent,
    pub priority: i8,
    /// Position in the side's submission
    pub index: usize,
}

/// Priority of the move an intent names (0 if it cannot be found)
pub fn intent_priority(state: &BattleState, side: Side, intent: &ActionIntent) -> i8 {
    state
        .player(side)
        .fighter(intent.actor_slot)
        .and_then(|f| f.find_move(&intent.move_id))
        .map_or(0, |m| m.priority)
}

/// Merge both sides' submissions into one ordered queue
pub fn build_queue(state: &BattleState, submissions: &[Vec<ActionIntent>; 2]) -> Vec<QueuedAction> {
    let mut queue: Vec<QueuedAction> = Side::BOTH
        .into_iter()
        .flat_map(|side| {
            submissions[side.index()]
                .iter()
                .enumerate()
                .map(move |(index, intent)| QueuedAction {
                    side,
                    priority: intent_priority(state, side, intent),
                    intent: intent.clone(),
                    index,
                })
        })
        .collect();

    queue.sort_by_key(|q| (Reverse(q.priority), q.side, q.intent.actor_slot, q.index));
    queue
}
