//! Game session: the single context object owning every piece of mutable game state.
//!
//! A session is built at startup, loaded from storage once, mutated by clicks and
//! movement, and reset in place for a new game. Every accepted action is saved
//! before the call returns; save failures are logged and otherwise ignored.

use crate::config::GameConfig;
use crate::generator::TokenGenerator;
use crate::grid::{CellRange, GridDiff, GridPolicy, GridWindow, ViewportBounds};
use crate::interaction::{self, ClickOutcome, Inventory, Reach};
use crate::movement::{
    Direction, LocationProvider, MovementController, MovementMode, NoLocationDevice,
    PositionEvent,
};
use crate::persistence::{self, KeyValueStore, LoadOutcome, SavedGame};
use crate::store::CellStore;
use crate::types::{CellCoord, LatLng, TokenValue};
use crate::win;

mod hash;

pub use hash::format_snapshot_hash;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub position: LatLng,
    pub inventory: Inventory,
}

pub struct GameSession {
    config: GameConfig,
    store: CellStore,
    player: Player,
    movement: MovementController,
    location: Box<dyn LocationProvider>,
    storage: Box<dyn KeyValueStore>,
    grid: GridWindow,
    feedback: Option<String>,
    won: Option<TokenValue>,
}

impl GameSession {
    pub fn new(config: GameConfig, storage: Box<dyn KeyValueStore>) -> Self {
        let store = CellStore::new(TokenGenerator::from_config(&config));
        let player = Player { position: config.anchor, inventory: Inventory::Empty };
        Self {
            config,
            store,
            player,
            movement: MovementController::started_buttons(),
            location: Box::new(NoLocationDevice),
            storage,
            grid: GridWindow::new(GridPolicy::Incremental),
            feedback: None,
            won: None,
        }
    }

    pub fn with_location_provider(mut self, provider: Box<dyn LocationProvider>) -> Self {
        self.location = provider;
        self
    }

    pub fn with_grid_policy(mut self, policy: GridPolicy) -> Self {
        self.grid = GridWindow::new(policy);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn grid(&self) -> &GridWindow {
        &self.grid
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn inventory(&self) -> Inventory {
        self.player.inventory
    }

    pub fn player_cell(&self) -> CellCoord {
        self.config.cell_of(self.player.position)
    }

    pub fn reach(&self) -> Reach {
        Reach { player_cell: self.player_cell(), radius: self.config.interact_radius }
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.movement.mode()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// First qualifying value seen by a win check, latched for the rest of the game.
    pub fn won(&self) -> Option<TokenValue> {
        self.won
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }

    /// Restores the saved slot, or starts fresh when it is missing or unreadable.
    /// `mode_override` wins over the saved movement mode.
    pub fn load(&mut self, mode_override: Option<MovementMode>) -> LoadOutcome {
        let outcome = match persistence::read_save(self.storage.as_ref(), &self.config.save_key) {
            Ok((saved, mementos)) => {
                self.store.clear();
                self.store.restore(mementos);
                self.player = Player { position: saved.position(), inventory: saved.inventory() };
                self.activate(mode_override.unwrap_or(saved.movement_mode));
                LoadOutcome::Restored { cells: self.store.len() }
            }
            Err(reason) => {
                self.store.clear();
                self.player = self.default_player();
                self.activate(mode_override.unwrap_or(self.movement.mode()));
                LoadOutcome::Fresh(reason)
            }
        };

        self.won = None;
        let reach = self.reach();
        self.grid.restyle_all(&self.store, &reach);
        self.check_win();
        tracing::info!(?outcome, mode = %self.movement.mode(), "session_loaded");
        outcome
    }

    /// Best-effort save of the whole session. Returns whether the write succeeded.
    pub fn save(&mut self) -> bool {
        let saved = SavedGame::capture(
            self.player.position,
            self.player.inventory,
            &self.store,
            self.movement.mode(),
        );
        match persistence::write_save(self.storage.as_mut(), &self.config.save_key, &saved) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "save_failed");
                false
            }
        }
    }

    /// Erases the save slot and resets the board, player, and movement controller.
    pub fn new_game(&mut self) {
        if let Err(err) = self.storage.remove(&self.config.save_key) {
            tracing::warn!(error = %err, "save_remove_failed");
        }
        self.store.clear();
        self.player = self.default_player();
        self.won = None;
        self.feedback = Some("Started a new game.".to_string());
        self.activate(self.movement.mode());
        let reach = self.reach();
        self.grid.restyle_all(&self.store, &reach);
        tracing::info!("new_game");
    }

    pub fn click(&mut self, coord: CellCoord) -> ClickOutcome {
        let reach = self.reach();
        let outcome =
            interaction::apply_click(&mut self.store, &mut self.player.inventory, reach, coord);
        tracing::debug!(%coord, ?outcome, "cell_click");
        self.feedback = Some(outcome.to_string());

        if outcome.is_accepted() {
            self.grid.restyle(coord, &self.store, &reach);
            self.check_win();
            self.save();
        }
        outcome
    }

    /// One-tile button move. Rejected while another input is active.
    pub fn step(&mut self, direction: Direction) -> bool {
        if !self.movement.accepts_steps() {
            self.feedback =
                Some("Movement buttons are off while following your location.".to_string());
            return false;
        }
        let (di, dj) = direction.delta();
        let target = self.config.cell_center(self.player_cell().offset(di, dj));
        self.set_player_position(target);
        true
    }

    /// The single entry point every movement input goes through.
    pub fn set_player_position(&mut self, position: LatLng) {
        let previous = self.player_cell();
        self.player.position = position;
        let reach = self.reach();
        if reach.player_cell != previous {
            self.grid.restyle_all(&self.store, &reach);
        }
        self.save();
    }

    pub fn select_movement_mode(&mut self, mode: MovementMode) {
        self.activate(mode);
        self.save();
    }

    pub fn toggle_movement_mode(&mut self) {
        self.select_movement_mode(self.movement.mode().toggled());
    }

    /// Applies pending live position events. A feed error falls back to buttons
    /// and drops whatever the stopped feed still had queued.
    pub fn poll_movement(&mut self) -> usize {
        let mut applied = 0;
        for event in self.movement.poll() {
            match event {
                PositionEvent::Fix(position) => {
                    self.set_player_position(position);
                    applied += 1;
                }
                PositionEvent::Error(err) => {
                    tracing::warn!(error = %err, "position_feed_error");
                    self.activate(MovementMode::Buttons);
                    self.feedback = Some(format!("{err}. Using buttons instead."));
                    self.save();
                    break;
                }
            }
        }
        applied
    }

    pub fn recompute_grid(&mut self, viewport: ViewportBounds) -> GridDiff {
        let range = CellRange::from_viewport(&self.config, viewport, self.config.grid_margin);
        let reach = self.reach();
        self.grid.recompute(range, &self.store, &reach)
    }

    pub fn check_win(&mut self) -> Option<TokenValue> {
        let found = win::check_win(
            self.player.inventory.held(),
            self.grid.coords(),
            &self.store,
            self.config.target_value,
        );
        if let Some(value) = found
            && self.won.is_none()
        {
            tracing::info!(value, "target_reached");
            self.won = Some(value);
        }
        found
    }

    pub fn hud_text(&self) -> String {
        let hands = match self.player.inventory {
            Inventory::Empty => "Hands: (empty)".to_string(),
            Inventory::Holding(value) => format!("Hands: holding token [{value}]"),
        };
        match &self.feedback {
            Some(message) => format!("{hands} | {message}"),
            None => hands,
        }
    }

    pub fn win_message(&self) -> Option<String> {
        self.won.map(|value| format!("Success! You crafted a legendary token [{value}]!"))
    }

    fn default_player(&self) -> Player {
        Player { position: self.config.anchor, inventory: Inventory::Empty }
    }

    /// Stops the current controller, then starts one for `mode`, falling back to buttons.
    fn activate(&mut self, mode: MovementMode) {
        self.movement.stop();
        let mut next = match mode {
            MovementMode::Buttons => MovementController::buttons(),
            MovementMode::Geolocation => MovementController::live(self.location.open_source()),
        };
        if let Err(err) = next.start() {
            tracing::warn!(error = %err, "movement_start_failed");
            self.feedback = Some(format!("{err}. Using buttons instead."));
            next = MovementController::started_buttons();
        }
        self.movement = next;
    }
}

#[cfg(test)]
mod tests;
