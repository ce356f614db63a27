//! Drag-and-drop ordering for finding categories and templates.
//!
//! Order is an explicit `order_index` per row. A reorder moves one item and
//! then renumbers the whole sequence `0..n-1`; only rows whose index moved
//! need persisting.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// A row whose `order_index` must be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    pub id: DbId,
    pub order_index: i32,
}

/// Move the element at `from` to position `to`, shifting the rest.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), CoreError> {
    let len = items.len();
    if from >= len {
        return Err(CoreError::validation(
            "from",
            format!("index {from} out of range for {len} items"),
        ));
    }
    if to >= len {
        return Err(CoreError::validation(
            "to",
            format!("index {to} out of range for {len} items"),
        ));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Assign contiguous indices in sequence order and return only the changes.
///
/// `current` is `(id, order_index)` in the desired final order.
pub fn assign_order_indices(current: &[(DbId, i32)]) -> Vec<OrderChange> {
    current
        .iter()
        .enumerate()
        .filter_map(|(position, (id, index))| {
            let position = position as i32;
            (*index != position).then_some(OrderChange {
                id: *id,
                order_index: position,
            })
        })
        .collect()
}

/// Validate that `ordered_ids` is a permutation of `existing`.
///
/// Reorder requests must name every row exactly once.
pub fn check_complete_ordering(existing: &[DbId], ordered_ids: &[DbId]) -> Result<(), CoreError> {
    let mut a = existing.to_vec();
    let mut b = ordered_ids.to_vec();
    a.sort();
    b.sort();
    if a != b {
        return Err(CoreError::validation(
            "ids",
            "must list every existing item exactly once",
        ));
    }
    Ok(())
}
