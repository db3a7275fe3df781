use cellmerge_core::{CellCoord, ClickOutcome, Direction, GameSession, TokenValue};
use macroquad::prelude::KeyCode;

use crate::map_view::{MapView, PanelRect};

/// On-screen size of one cell, in logical pixels.
pub const CELL_PX: f32 = 28.0;
const EVENT_LOG_CAPACITY: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Playing,
    /// Waiting for the player to confirm or cancel a reset.
    ConfirmingNewGame,
}

/// Input gathered for a single frame.
#[derive(Debug, Default, Clone)]
pub struct FrameInput {
    pub keys_pressed: Vec<KeyCode>,
    pub clicked: Option<CellCoord>,
}

#[derive(Default)]
pub struct AppState {
    pub mode: AppMode,
    pub event_log: Vec<String>,
    view: Option<MapView>,
    announced_win: Option<TokenValue>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The map projection used for the most recent frame.
    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    /// Process one frame of input, then re-centre the map on the player.
    pub fn tick(&mut self, session: &mut GameSession, input: &FrameInput, map_panel: PanelRect) {
        let applied = session.poll_movement();
        if applied > 0 {
            tracing::debug!(applied, "position_fixes_applied");
        }

        match self.mode {
            AppMode::Playing => self.handle_playing(session, input),
            AppMode::ConfirmingNewGame => self.handle_confirm(session, &input.keys_pressed),
        }

        self.refresh_view(session, map_panel);

        if let Some(value) = session.won()
            && self.announced_win != Some(value)
        {
            self.announced_win = Some(value);
            if let Some(message) = session.win_message() {
                self.push_log(message);
            }
        }
    }

    fn handle_playing(&mut self, session: &mut GameSession, input: &FrameInput) {
        let keys = &input.keys_pressed;
        for key in keys {
            if let Some(direction) = direction_for(*key) {
                session.step(direction);
            }
        }

        if keys.contains(&KeyCode::G) {
            session.toggle_movement_mode();
            self.push_log(format!("Movement: {}", session.movement_mode()));
            if let Some(message) = session.feedback() {
                self.push_log(message.to_string());
            }
        }

        if keys.contains(&KeyCode::N) {
            self.mode = AppMode::ConfirmingNewGame;
            return;
        }

        if let Some(coord) = input.clicked {
            let outcome = session.click(coord);
            self.push_log(click_log_line(coord, &outcome));
        }
    }

    fn handle_confirm(&mut self, session: &mut GameSession, keys: &[KeyCode]) {
        if keys.contains(&KeyCode::Y) || keys.contains(&KeyCode::Enter) {
            session.new_game();
            self.announced_win = None;
            self.view = None;
            self.event_log.clear();
            self.push_log("New game started.".to_string());
            self.mode = AppMode::Playing;
        } else if keys.contains(&KeyCode::N) || keys.contains(&KeyCode::Escape) {
            self.mode = AppMode::Playing;
        }
    }

    fn refresh_view(&mut self, session: &mut GameSession, map_panel: PanelRect) {
        let next = MapView::new(map_panel, session.player().position, CELL_PX, session.config());
        let moved = self.view.is_none_or(|view| view.viewport() != next.viewport());
        self.view = Some(next);

        if moved || session.grid().is_empty() {
            let diff = session.recompute_grid(next.viewport());
            tracing::trace!(
                created = diff.created.len(),
                removed = diff.removed.len(),
                "grid_recomputed"
            );
            session.check_win();
        }
    }

    fn push_log(&mut self, line: String) {
        self.event_log.push(line);
        if self.event_log.len() > EVENT_LOG_CAPACITY {
            let overflow = self.event_log.len() - EVENT_LOG_CAPACITY;
            self.event_log.drain(..overflow);
        }
    }
}

pub fn direction_for(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up | KeyCode::W => Some(Direction::North),
        KeyCode::Down | KeyCode::S => Some(Direction::South),
        KeyCode::Right | KeyCode::D => Some(Direction::East),
        KeyCode::Left | KeyCode::A => Some(Direction::West),
        _ => None,
    }
}

fn click_log_line(coord: CellCoord, outcome: &ClickOutcome) -> String {
    format!("{coord}: {outcome}")
}
