//! Sparse overlay of mutated cells on top of the procedural generator.
//!
//! Only coordinates that have been written are held in memory, so the store
//! stays bounded by the number of distinct cells ever mutated no matter how
//! much of the grid has been looked at.

use std::collections::HashMap;

use crate::generator::TokenGenerator;
use crate::types::{CellCoord, TokenValue};

/// Immutable record of a cell's current token after it diverged from its base value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellMemento {
    coord: CellCoord,
    token: Option<TokenValue>,
}

impl CellMemento {
    pub const fn new(coord: CellCoord, token: Option<TokenValue>) -> Self {
        Self { coord, token }
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    pub fn token(&self) -> Option<TokenValue> {
        self.token
    }
}

#[derive(Clone, Debug)]
pub struct CellStore {
    generator: TokenGenerator,
    index: HashMap<CellCoord, usize>,
    entries: Vec<CellMemento>,
}

impl CellStore {
    pub fn new(generator: TokenGenerator) -> Self {
        Self { generator, index: HashMap::new(), entries: Vec::new() }
    }

    pub fn generator(&self) -> &TokenGenerator {
        &self.generator
    }

    /// Effective value: the overlay entry if one exists, else the base value.
    /// Reading never writes the base value into the overlay.
    pub fn get(&self, coord: CellCoord) -> Option<TokenValue> {
        match self.index.get(&coord) {
            Some(&slot) => self.entries[slot].token,
            None => self.generator.generate(coord),
        }
    }

    /// Replaces the cell's record with `f(effective value)` and returns the new value.
    pub fn update<F>(&mut self, coord: CellCoord, f: F) -> Option<TokenValue>
    where
        F: FnOnce(Option<TokenValue>) -> Option<TokenValue>,
    {
        let next = CellMemento::new(coord, f(self.get(coord)));
        self.put(next);
        next.token
    }

    /// Repopulates the overlay entry by entry, as when restoring a save.
    pub fn restore<I>(&mut self, mementos: I)
    where
        I: IntoIterator<Item = CellMemento>,
    {
        for memento in mementos {
            self.put(memento);
        }
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Overlay entries in first-write order.
    pub fn entries(&self) -> impl Iterator<Item = (CellCoord, Option<TokenValue>)> + '_ {
        self.entries.iter().map(|memento| (memento.coord, memento.token))
    }

    pub fn snapshot(&self) -> Vec<CellMemento> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, memento: CellMemento) {
        match self.index.get(&memento.coord) {
            // Overwrites keep the slot, so insertion order stays first-write order.
            Some(&slot) => self.entries[slot] = memento,
            None => {
                self.index.insert(memento.coord, self.entries.len());
                self.entries.push(memento);
            }
        }
    }
}
