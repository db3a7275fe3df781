pub mod config;
pub mod generator;
pub mod grid;
pub mod interaction;
pub mod luck;
pub mod movement;
pub mod persistence;
pub mod session;
pub mod store;
pub mod types;
pub mod win;

pub use config::{ConfigError, GameConfig};
pub use generator::TokenGenerator;
pub use grid::{
    CellFill, CellRange, CellStyle, GridDiff, GridPolicy, GridWindow, ViewportBounds,
    VisualCell,
};
pub use interaction::{ClickOutcome, Inventory, Reach};
pub use movement::{
    Direction, LocationError, LocationProvider, MovementController, MovementMode, NoLocationDevice,
    PositionEvent, PositionSource, TrackProvider, TrackSource, UnavailableSource,
};
pub use persistence::{
    FreshReason, KeyValueStore, LoadOutcome, MemoryStorage, SavedGame, StorageError,
};
pub use session::{GameSession, Player, format_snapshot_hash};
pub use store::{CellMemento, CellStore};
pub use types::*;
