//! Pickup/merge state machine for cell clicks.
//!
//! The player holds at most one token. A click either picks a token up, merges
//! the held token into an equal one (doubling it), or is rejected with a reason.
//! Rejections never touch any state.

use std::fmt;

use crate::store::CellStore;
use crate::types::{CellCoord, TokenValue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Inventory {
    #[default]
    Empty,
    Holding(TokenValue),
}

impl Inventory {
    pub fn from_held(held: Option<TokenValue>) -> Self {
        held.map_or(Self::Empty, Self::Holding)
    }

    pub fn held(self) -> Option<TokenValue> {
        match self {
            Self::Empty => None,
            Self::Holding(value) => Some(value),
        }
    }
}

/// Which cells the player can touch from where they stand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reach {
    pub player_cell: CellCoord,
    pub radius: u32,
}

impl Reach {
    pub fn distance(&self, coord: CellCoord) -> u32 {
        self.player_cell.chebyshev(coord)
    }

    pub fn interactable(&self, coord: CellCoord) -> bool {
        self.distance(coord) <= self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    PickedUp(TokenValue),
    Merged(TokenValue),
    TooFar { distance: u32, radius: u32 },
    Mismatch { cell: TokenValue, held: TokenValue },
    AlreadyHolding(TokenValue),
    NothingHere,
}

impl ClickOutcome {
    /// Whether the click changed inventory and cell state.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::PickedUp(_) | Self::Merged(_))
    }
}

impl fmt::Display for ClickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PickedUp(value) => write!(f, "Picked up token [{value}]."),
            Self::Merged(value) => write!(f, "Crafted new token [{value}]."),
            Self::TooFar { distance, radius } => write!(
                f,
                "Your arms cannot reach that far ({distance} cells away, reach is {radius}). \
                 Move closer, would you?"
            ),
            Self::Mismatch { cell, held } => write!(
                f,
                "Cannot craft that, buddy. Cell has [{cell}] but you're holding [{held}]. \
                 Do you happen to have a third hand?"
            ),
            Self::AlreadyHolding(_) => write!(
                f,
                "Why are you trying to pick up nothing? You're already holding a token."
            ),
            Self::NothingHere => write!(f, "Nothing to do here."),
        }
    }
}

/// Pure transition decision for a click on a cell holding `cell`.
pub fn decide(
    inventory: Inventory,
    cell: Option<TokenValue>,
    distance: u32,
    radius: u32,
) -> ClickOutcome {
    if distance > radius {
        return ClickOutcome::TooFar { distance, radius };
    }

    match (inventory, cell) {
        (Inventory::Empty, Some(value)) => ClickOutcome::PickedUp(value),
        (Inventory::Holding(held), Some(value)) if value == held => {
            ClickOutcome::Merged(held.saturating_mul(2))
        }
        (Inventory::Holding(held), Some(value)) => ClickOutcome::Mismatch { cell: value, held },
        (Inventory::Holding(held), None) => ClickOutcome::AlreadyHolding(held),
        (Inventory::Empty, None) => ClickOutcome::NothingHere,
    }
}

/// Decides a click against the store and applies accepted outcomes.
pub fn apply_click(
    store: &mut CellStore,
    inventory: &mut Inventory,
    reach: Reach,
    coord: CellCoord,
) -> ClickOutcome {
    let outcome = decide(*inventory, store.get(coord), reach.distance(coord), reach.radius);
    match outcome {
        ClickOutcome::PickedUp(value) => {
            store.update(coord, |_| None);
            *inventory = Inventory::Holding(value);
        }
        ClickOutcome::Merged(value) => {
            store.update(coord, |_| Some(value));
            *inventory = Inventory::Empty;
        }
        _ => {}
    }
    outcome
}

#[cfg(test)]
mod tests;
