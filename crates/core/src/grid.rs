//! Window of visual cells around the viewport.
//!
//! Visual cells are disposable projections of the store: they cache a cell's
//! effective value and style for the renderer and can be created or dropped
//! at any time without touching game state.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::config::GameConfig;
use crate::interaction::Reach;
use crate::store::CellStore;
use crate::types::{CellCoord, LatLng, TokenValue};

new_key_type! {
    pub struct VisualCellId;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl ViewportBounds {
    pub fn around(center: LatLng, half_lat: f64, half_lng: f64) -> Self {
        Self {
            south_west: LatLng::new(center.lat - half_lat, center.lng - half_lng),
            north_east: LatLng::new(center.lat + half_lat, center.lng + half_lng),
        }
    }
}

/// Inclusive rectangle of cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellCoord,
    pub max: CellCoord,
}

impl CellRange {
    /// Cells under the viewport corners, widened by `margin` cells on every side.
    pub fn from_viewport(config: &GameConfig, viewport: ViewportBounds, margin: u32) -> Self {
        let margin = i32::try_from(margin).unwrap_or(i32::MAX);
        let south_west = config.cell_of(viewport.south_west);
        let north_east = config.cell_of(viewport.north_east);
        Self {
            min: south_west.offset(-margin, -margin),
            max: north_east.offset(margin, margin),
        }
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.min.i..=self.max.i).contains(&coord.i) && (self.min.j..=self.max.j).contains(&coord.j)
    }

    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.min.i..=self.max.i)
            .flat_map(move |i| (self.min.j..=self.max.j).map(move |j| CellCoord::new(i, j)))
    }

    pub fn len(&self) -> usize {
        let rows = (i64::from(self.max.i) - i64::from(self.min.i) + 1).max(0);
        let cols = (i64::from(self.max.j) - i64::from(self.min.j) + 1).max(0);
        usize::try_from(rows * cols).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellFill {
    EmptyInteractable,
    EmptyFar,
    TokenInteractable,
    TokenFar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fill: CellFill,
    pub interactable: bool,
    pub player_cell: bool,
}

impl CellStyle {
    pub fn new(has_token: bool, interactable: bool, player_cell: bool) -> Self {
        let fill = match (has_token, interactable) {
            (true, true) => CellFill::TokenInteractable,
            (true, false) => CellFill::TokenFar,
            (false, true) => CellFill::EmptyInteractable,
            (false, false) => CellFill::EmptyFar,
        };
        Self { fill, interactable, player_cell }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualCell {
    pub coord: CellCoord,
    pub token: Option<TokenValue>,
    pub style: CellStyle,
}

impl VisualCell {
    fn project(coord: CellCoord, store: &CellStore, reach: &Reach) -> Self {
        let token = store.get(coord);
        let style =
            CellStyle::new(token.is_some(), reach.interactable(coord), coord == reach.player_cell);
        Self { coord, token, style }
    }

    /// Hover label, `None` for cells without a token.
    pub fn tooltip(&self) -> Option<String> {
        let value = self.token?;
        Some(if self.style.interactable {
            format!("Token: [{value}]")
        } else {
            format!("Token (out of reach): [{value}]")
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridPolicy {
    /// Only add missing cells; never drop visuals.
    #[default]
    Incremental,
    /// Drop every visual and recreate exactly the requested range.
    FullRebuild,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridDiff {
    pub created: Vec<CellCoord>,
    pub removed: Vec<CellCoord>,
}

#[derive(Clone, Debug, Default)]
pub struct GridWindow {
    policy: GridPolicy,
    cells: SlotMap<VisualCellId, VisualCell>,
    by_coord: HashMap<CellCoord, VisualCellId>,
}

impl GridWindow {
    pub fn new(policy: GridPolicy) -> Self {
        Self { policy, cells: SlotMap::with_key(), by_coord: HashMap::new() }
    }

    pub fn policy(&self) -> GridPolicy {
        self.policy
    }

    pub fn recompute(&mut self, range: CellRange, store: &CellStore, reach: &Reach) -> GridDiff {
        let mut diff = GridDiff::default();
        if self.policy == GridPolicy::FullRebuild {
            diff.removed = self.clear();
        }

        for coord in range.coords() {
            if self.by_coord.contains_key(&coord) {
                continue;
            }
            let id = self.cells.insert(VisualCell::project(coord, store, reach));
            self.by_coord.insert(coord, id);
            diff.created.push(coord);
        }
        diff
    }

    /// Re-derives one cell's value and style. Returns false when the cell has no visual.
    pub fn restyle(&mut self, coord: CellCoord, store: &CellStore, reach: &Reach) -> bool {
        let Some(&id) = self.by_coord.get(&coord) else {
            return false;
        };
        self.cells[id] = VisualCell::project(coord, store, reach);
        true
    }

    pub fn restyle_all(&mut self, store: &CellStore, reach: &Reach) {
        for cell in self.cells.values_mut() {
            *cell = VisualCell::project(cell.coord, store, reach);
        }
    }

    /// Destroys every visual, returning their coordinates. Game state is untouched.
    pub fn clear(&mut self) -> Vec<CellCoord> {
        let removed = self.cells.values().map(|cell| cell.coord).collect();
        self.cells.clear();
        self.by_coord.clear();
        removed
    }

    pub fn get(&self, coord: CellCoord) -> Option<&VisualCell> {
        self.by_coord.get(&coord).map(|&id| &self.cells[id])
    }

    pub fn id_of(&self, coord: CellCoord) -> Option<VisualCellId> {
        self.by_coord.get(&coord).copied()
    }

    pub fn cell(&self, id: VisualCellId) -> Option<&VisualCell> {
        self.cells.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualCell> {
        self.cells.values()
    }

    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.values().map(|cell| cell.coord)
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
