//! Target-value detection.

use crate::store::CellStore;
use crate::types::{CellCoord, TokenValue};

/// First value at or above `target`, checking the held token, then the effective
/// value of every displayed cell, then every raw overlay entry.
///
/// The displayed pass sees untouched cells whose base value already qualifies;
/// the overlay pass sees merges that have since scrolled off screen.
pub fn check_win<I>(
    held: Option<TokenValue>,
    displayed: I,
    store: &CellStore,
    target: TokenValue,
) -> Option<TokenValue>
where
    I: IntoIterator<Item = CellCoord>,
{
    let qualifies = |value: &TokenValue| *value >= target;

    held.filter(qualifies)
        .or_else(|| displayed.into_iter().filter_map(|coord| store.get(coord)).find(qualifies))
        .or_else(|| store.entries().filter_map(|(_, value)| value).find(qualifies))
}
