//! Saved-game record and the durable key-value slot it lives in.
//!
//! The record is one JSON document per slot, overwritten wholesale on each
//! save. Reading tolerates a missing slot and malformed JSON by reporting a
//! fresh start; nothing here is allowed to stop gameplay.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interaction::Inventory;
use crate::movement::MovementMode;
use crate::store::{CellMemento, CellStore};
use crate::types::{CellCoord, LatLng, TokenValue};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("failed to write {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SaveDecodeError {
    #[error("saved game is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved cell key '{0}' is not a coordinate")]
    BadCellKey(String),
    #[error("saved player position is not finite")]
    BadPosition,
    #[error("saved token at {0} is zero")]
    BadToken(String),
}

/// Durable text slots addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedCell {
    pub key: String,
    pub token_value: Option<TokenValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub player_lat: f64,
    pub player_lng: f64,
    pub held_token: Option<TokenValue>,
    pub cell_states: Vec<SavedCell>,
    #[serde(default)]
    pub movement_mode: MovementMode,
}

impl SavedGame {
    pub fn capture(
        position: LatLng,
        inventory: Inventory,
        store: &CellStore,
        movement_mode: MovementMode,
    ) -> Self {
        Self {
            player_lat: position.lat,
            player_lng: position.lng,
            held_token: inventory.held(),
            cell_states: store
                .entries()
                .map(|(coord, token_value)| SavedCell { key: coord.key(), token_value })
                .collect(),
            movement_mode,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveDecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SaveDecodeError> {
        let saved: Self = serde_json::from_str(raw)?;
        if !(saved.player_lat.is_finite() && saved.player_lng.is_finite()) {
            return Err(SaveDecodeError::BadPosition);
        }
        // Tokens are absent or positive.
        if saved.held_token == Some(0) {
            return Err(SaveDecodeError::BadToken("hand".to_string()));
        }
        if let Some(cell) = saved.cell_states.iter().find(|cell| cell.token_value == Some(0)) {
            return Err(SaveDecodeError::BadToken(cell.key.clone()));
        }
        Ok(saved)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.player_lat, self.player_lng)
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::from_held(self.held_token)
    }

    /// Overlay records in saved order. Any unparseable key rejects the whole save.
    pub fn mementos(&self) -> Result<Vec<CellMemento>, SaveDecodeError> {
        self.cell_states
            .iter()
            .map(|cell| {
                CellCoord::parse_key(&cell.key)
                    .map(|coord| CellMemento::new(coord, cell.token_value))
                    .ok_or_else(|| SaveDecodeError::BadCellKey(cell.key.clone()))
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreshReason {
    NoSave,
    StorageUnavailable,
    Corrupt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored { cells: usize },
    Fresh(FreshReason),
}

/// Reads and validates the slot, folding every failure into a fresh-start reason.
pub fn read_save(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Result<(SavedGame, Vec<CellMemento>), FreshReason> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Err(FreshReason::NoSave),
        Err(err) => {
            tracing::warn!(error = %err, key, "save_read_failed");
            return Err(FreshReason::StorageUnavailable);
        }
    };

    let decoded = SavedGame::from_json(&raw)
        .and_then(|saved| saved.mementos().map(|mementos| (saved, mementos)));
    decoded.map_err(|err| {
        tracing::warn!(error = %err, key, "save_corrupt");
        FreshReason::Corrupt
    })
}

pub fn write_save(
    storage: &mut dyn KeyValueStore,
    key: &str,
    saved: &SavedGame,
) -> Result<(), StorageError> {
    let json = saved.to_json().map_err(|err| StorageError::Write(err.to_string()))?;
    storage.set(key, &json)
}
