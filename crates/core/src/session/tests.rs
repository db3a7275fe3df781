use std::mem;

use super::*;
use crate::movement::{LocationError, PositionSource, TrackProvider};
use crate::persistence::{FreshReason, MemoryStorage, StorageError};

fn session_with(config: GameConfig) -> GameSession {
    GameSession::new(config, Box::new(MemoryStorage::new()))
}

fn cells_within_reach(session: &GameSession, value: TokenValue) -> Vec<CellCoord> {
    let reach = session.reach();
    let radius = reach.radius as i32;
    (-radius..=radius)
        .flat_map(|di| (-radius..=radius).map(move |dj| reach.player_cell.offset(di, dj)))
        .filter(|coord| session.store().get(*coord) == Some(value))
        .collect()
}

fn saved_record(session: &GameSession) -> Option<String> {
    session.storage().get(&session.config().save_key).expect("memory storage never fails")
}

#[test]
fn every_generated_cell_holds_a_two_when_spawning_is_certain() {
    let config = GameConfig {
        spawn_probability: 1.0,
        value_options: vec![2],
        target_value: 8,
        ..GameConfig::default()
    };
    let mut session = session_with(config);

    assert_eq!(session.click(CellCoord::new(0, 0)), ClickOutcome::PickedUp(2));
    assert_eq!(session.inventory(), Inventory::Holding(2));
    assert_eq!(session.click(CellCoord::new(0, 1)), ClickOutcome::Merged(4));
    assert_eq!(session.inventory(), Inventory::Empty);
    assert_eq!(session.store().get(CellCoord::new(0, 1)), Some(4));
    assert_eq!(session.store().get(CellCoord::new(0, 0)), None);
}

#[test]
fn merging_up_to_the_target_is_detected() {
    let config = GameConfig {
        spawn_probability: 0.5,
        value_options: vec![2],
        target_value: 8,
        ..GameConfig::default()
    };
    let mut session = session_with(config);
    let twos = cells_within_reach(&session, 2);
    assert!(twos.len() >= 4, "expected at least four spawned cells near the anchor: {twos:?}");
    let (a, b, c, d) = (twos[0], twos[1], twos[2], twos[3]);

    assert_eq!(session.click(a), ClickOutcome::PickedUp(2));
    assert_eq!(session.click(b), ClickOutcome::Merged(4));
    assert_eq!(session.check_win(), None);
    assert_eq!(session.click(c), ClickOutcome::PickedUp(2));
    assert_eq!(session.click(d), ClickOutcome::Merged(4));
    assert_eq!(session.click(d), ClickOutcome::PickedUp(4));
    assert_eq!(session.click(b), ClickOutcome::Merged(8));

    assert_eq!(session.store().get(b), Some(8));
    assert_eq!(session.check_win(), Some(8));
    assert_eq!(session.won(), Some(8));
    assert!(session.win_message().is_some_and(|text| text.contains("[8]")));
}

#[test]
fn out_of_reach_click_changes_nothing() {
    let mut session = session_with(GameConfig { spawn_probability: 1.0, ..GameConfig::default() });
    let before = session.snapshot_hash();

    let outcome = session.click(CellCoord::new(4, 0));

    assert_eq!(outcome, ClickOutcome::TooFar { distance: 4, radius: 3 });
    assert_eq!(session.snapshot_hash(), before);
    assert!(session.store().is_empty());
    assert_eq!(saved_record(&session), None, "rejections must not save");
    assert!(session.hud_text().contains("4 cells away"));
}

#[test]
fn accepted_clicks_are_saved_immediately() {
    let mut session = session_with(GameConfig { spawn_probability: 1.0, ..GameConfig::default() });
    let outcome = session.click(CellCoord::new(1, 1));
    assert!(matches!(outcome, ClickOutcome::PickedUp(_)));

    let raw = saved_record(&session).expect("pickup should have been saved");
    let saved = SavedGame::from_json(&raw).expect("saved record parses");
    assert_eq!(saved.held_token, session.inventory().held());
    assert_eq!(saved.cell_states.len(), 1);
    assert_eq!(saved.cell_states[0].key, "1,1");
    assert_eq!(saved.cell_states[0].token_value, None);
}

#[test]
fn save_then_load_reproduces_the_session() {
    let config =
        GameConfig { spawn_probability: 1.0, value_options: vec![4], ..GameConfig::default() };
    let mut first = session_with(config.clone());
    first.click(CellCoord::new(0, 0));
    first.click(CellCoord::new(1, 0));
    first.click(CellCoord::new(-1, 2));
    first.step(Direction::North);
    first.step(Direction::East);
    assert!(!first.store().is_empty());
    let expected_hash = first.snapshot_hash();
    let expected_player = first.player();
    let expected_overlay = first.store().snapshot();

    let mut second = GameSession::new(config, first.into_storage());
    let outcome = second.load(None);

    assert_eq!(outcome, LoadOutcome::Restored { cells: expected_overlay.len() });
    assert_eq!(second.player(), expected_player);
    assert_eq!(second.store().snapshot(), expected_overlay);
    assert_eq!(second.snapshot_hash(), expected_hash);
}

#[test]
fn corrupt_record_starts_a_fresh_session() {
    let config = GameConfig::default();
    let storage = MemoryStorage::with_slot(&config.save_key, "not json at all");
    let mut session = GameSession::new(config.clone(), Box::new(storage));

    let outcome = session.load(None);

    assert_eq!(outcome, LoadOutcome::Fresh(FreshReason::Corrupt));
    assert!(session.store().is_empty());
    assert_eq!(session.player().position, config.anchor);
    assert_eq!(session.inventory(), Inventory::Empty);
}

#[test]
fn missing_record_starts_a_fresh_session() {
    let mut session = session_with(GameConfig::default());
    assert_eq!(session.load(None), LoadOutcome::Fresh(FreshReason::NoSave));
    assert_eq!(session.player_cell(), CellCoord::new(0, 0));
}

#[test]
fn movement_override_beats_saved_mode() {
    let config = GameConfig::default();
    let track = vec![config.cell_center(CellCoord::new(2, 2))];
    let mut first = session_with(config.clone())
        .with_location_provider(Box::new(TrackProvider::new(track.clone())));
    first.select_movement_mode(MovementMode::Geolocation);
    assert_eq!(first.movement_mode(), MovementMode::Geolocation);
    let storage = first.into_storage();

    let mut restored = GameSession::new(config.clone(), storage)
        .with_location_provider(Box::new(TrackProvider::new(track)));
    restored.load(None);
    assert_eq!(restored.movement_mode(), MovementMode::Geolocation);

    let mut overridden = GameSession::new(config, restored.into_storage());
    overridden.load(Some(MovementMode::Buttons));
    assert_eq!(overridden.movement_mode(), MovementMode::Buttons);
}

#[test]
fn button_step_moves_one_tile_and_saves() {
    let mut session = session_with(GameConfig::default());
    assert!(session.step(Direction::South));
    assert!(session.step(Direction::West));
    assert_eq!(session.player_cell(), CellCoord::new(-1, -1));

    let raw = saved_record(&session).expect("movement should save");
    let saved = SavedGame::from_json(&raw).expect("parses");
    assert_eq!(session.config().cell_of(saved.position()), CellCoord::new(-1, -1));
}

#[test]
fn missing_location_device_falls_back_to_buttons() {
    let mut session = session_with(GameConfig::default());
    session.select_movement_mode(MovementMode::Geolocation);
    assert_eq!(session.movement_mode(), MovementMode::Buttons);
    assert!(session.feedback().is_some_and(|text| text.contains("unavailable")));
    assert!(session.step(Direction::North));
}

#[test]
fn live_feed_moves_player_and_stops_after_switching_away() {
    let config = GameConfig::default();
    let track = vec![
        config.cell_center(CellCoord::new(0, 3)),
        config.cell_center(CellCoord::new(0, 6)),
    ];
    let mut session =
        session_with(config).with_location_provider(Box::new(TrackProvider::new(track)));

    session.select_movement_mode(MovementMode::Geolocation);
    assert!(!session.step(Direction::North), "buttons are inactive while following location");
    assert_eq!(session.poll_movement(), 1);
    assert_eq!(session.player_cell(), CellCoord::new(0, 3));

    session.select_movement_mode(MovementMode::Buttons);
    assert_eq!(session.poll_movement(), 0);
    assert_eq!(session.player_cell(), CellCoord::new(0, 3));
}

/// Delivers its whole script in a single poll batch.
struct ScriptedFeed {
    events: Vec<PositionEvent>,
    active: bool,
}

impl PositionSource for ScriptedFeed {
    fn start(&mut self) -> Result<(), LocationError> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn poll(&mut self) -> Vec<PositionEvent> {
        if !self.active {
            return Vec::new();
        }
        mem::take(&mut self.events)
    }
}

struct ScriptedProvider {
    events: Vec<PositionEvent>,
}

impl LocationProvider for ScriptedProvider {
    fn open_source(&mut self) -> Box<dyn PositionSource> {
        Box::new(ScriptedFeed { events: mem::take(&mut self.events), active: false })
    }
}

#[test]
fn feed_error_mid_batch_falls_back_to_buttons_and_drops_later_fixes() {
    let config = GameConfig::default();
    let events = vec![
        PositionEvent::Fix(config.cell_center(CellCoord::new(0, 2))),
        PositionEvent::Error(LocationError::Failed("denied".to_string())),
        PositionEvent::Fix(config.cell_center(CellCoord::new(0, 5))),
    ];
    let mut session =
        session_with(config).with_location_provider(Box::new(ScriptedProvider { events }));
    session.select_movement_mode(MovementMode::Geolocation);
    assert_eq!(session.movement_mode(), MovementMode::Geolocation);

    assert_eq!(session.poll_movement(), 1);

    assert_eq!(session.player_cell(), CellCoord::new(0, 2));
    assert_eq!(session.movement_mode(), MovementMode::Buttons);
    assert_eq!(session.feedback(), Some("location feed failed: denied. Using buttons instead."));
    let record = saved_record(&session).expect("fallback is saved");
    let value: serde_json::Value = serde_json::from_str(&record).expect("valid json");
    assert_eq!(value["movementMode"], "buttons");

    assert_eq!(session.poll_movement(), 0);
    assert_eq!(session.player_cell(), CellCoord::new(0, 2));
    assert!(session.step(Direction::East));
}

#[test]
fn zero_valued_save_starts_a_fresh_session() {
    let config = GameConfig::default();
    let raw = r#"{"playerLat":37.0,"playerLng":-122.0,"heldToken":0,
        "cellStates":[{"key":"0,0","tokenValue":0}],"movementMode":"buttons"}"#;
    let storage = MemoryStorage::with_slot(&config.save_key, raw);
    let mut session = GameSession::new(config.clone(), Box::new(storage));

    assert_eq!(session.load(None), LoadOutcome::Fresh(FreshReason::Corrupt));
    assert_eq!(session.inventory(), Inventory::Empty);
    assert!(session.store().is_empty());
    assert_eq!(session.player().position, config.anchor);
}

#[test]
fn new_game_erases_slot_and_resets_state() {
    let mut session = session_with(GameConfig { spawn_probability: 1.0, ..GameConfig::default() });
    session.click(CellCoord::new(0, 0));
    session.step(Direction::North);
    assert!(saved_record(&session).is_some());

    session.new_game();

    assert_eq!(saved_record(&session), None);
    assert!(session.store().is_empty());
    assert_eq!(session.inventory(), Inventory::Empty);
    assert_eq!(session.player_cell(), CellCoord::new(0, 0));
    assert_eq!(session.won(), None);
}

#[test]
fn grid_follows_the_store_after_clicks() {
    let config =
        GameConfig { spawn_probability: 1.0, value_options: vec![2], ..GameConfig::default() };
    let mut session = session_with(config);
    let center = session.player().position;
    session.recompute_grid(ViewportBounds::around(center, 0.0, 0.0));
    assert_eq!(session.grid().len(), 11 * 11);

    session.click(CellCoord::new(0, 1));
    let visual = session.grid().get(CellCoord::new(0, 1)).expect("visual exists");
    assert_eq!(visual.token, None);
}

#[test]
fn displayed_untouched_cells_can_win() {
    let config = GameConfig {
        spawn_probability: 1.0,
        value_options: vec![32],
        target_value: 32,
        ..GameConfig::default()
    };
    let mut session = session_with(config);
    assert_eq!(session.check_win(), None, "nothing displayed, nothing mutated");

    let center = session.player().position;
    session.recompute_grid(ViewportBounds::around(center, 0.0, 0.0));
    assert_eq!(session.check_win(), Some(32));
    assert!(session.store().is_empty());
}

struct BrokenStorage;

impl KeyValueStore for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

#[test]
fn storage_faults_never_interrupt_play() {
    let config = GameConfig { spawn_probability: 1.0, ..GameConfig::default() };
    let mut session = GameSession::new(config, Box::new(BrokenStorage));

    assert_eq!(session.load(None), LoadOutcome::Fresh(FreshReason::StorageUnavailable));
    assert!(session.click(CellCoord::new(0, 0)).is_accepted());
    assert!(!session.save());
    assert!(session.step(Direction::East));
    session.new_game();
    assert!(session.store().is_empty());
}

#[test]
fn identical_action_sequences_hash_identically() {
    let run = || {
        let mut session = session_with(GameConfig::default());
        for (i, j) in [(0, 0), (1, 0), (0, 1), (-1, -1), (2, 2), (3, -3)] {
            session.click(CellCoord::new(i, j));
        }
        session.step(Direction::East);
        session.snapshot_hash()
    };
    assert_eq!(run(), run());
}
