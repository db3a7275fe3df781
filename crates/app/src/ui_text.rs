//! Text for the status line, legend, and side panel.

use app::app_loop::AppMode;
use app::format_position;
use cellmerge_core::{GameSession, MovementMode, format_snapshot_hash};

pub const NEW_GAME_PROMPT: &str =
    "Start a new game? All progress will be lost. (Y=confirm, N/Esc=cancel)";

pub fn status_text(session: &GameSession, mode: AppMode) -> String {
    match mode {
        AppMode::ConfirmingNewGame => NEW_GAME_PROMPT.to_string(),
        AppMode::Playing => session.hud_text(),
    }
}

pub fn legend_text(movement: MovementMode, interact_radius: u32) -> String {
    let moving = match movement {
        MovementMode::Buttons => "Arrows/WASD move",
        MovementMode::Geolocation => "Following location feed",
    };
    format!(
        "{moving} | Click a cell within {interact_radius} to pick up or merge | G switch movement | N new game"
    )
}

pub fn session_panel_lines(session: &GameSession) -> Vec<String> {
    let player = session.player();
    vec![
        format!("Movement: {}", session.movement_mode()),
        format!("Position: {}", format_position(player.position)),
        format!("Cell: {}", session.player_cell()),
        format!("Changed cells: {}", session.store().len()),
        format!("Goal: a token of {}", session.config().target_value),
        format!("State: {}", format_snapshot_hash(session.snapshot_hash())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellmerge_core::{GameConfig, MemoryStorage};

    fn session() -> GameSession {
        let mut session = GameSession::new(GameConfig::default(), Box::new(MemoryStorage::new()));
        session.load(None);
        session
    }

    #[test]
    fn confirm_prompt_replaces_hud() {
        let session = session();
        assert_eq!(status_text(&session, AppMode::ConfirmingNewGame), NEW_GAME_PROMPT);
        assert_eq!(status_text(&session, AppMode::Playing), "Hands: (empty)");
    }

    #[test]
    fn legend_names_radius_and_movement() {
        let buttons = legend_text(MovementMode::Buttons, 3);
        assert!(buttons.starts_with("Arrows/WASD move"));
        assert!(buttons.contains("within 3"));

        let live = legend_text(MovementMode::Geolocation, 3);
        assert!(live.starts_with("Following location feed"));
    }

    #[test]
    fn session_panel_reports_mode_and_goal() {
        let session = session();
        let lines = session_panel_lines(&session);
        assert_eq!(lines[0], "Movement: buttons");
        assert!(lines.iter().any(|line| line == "Goal: a token of 32"));
        assert!(lines.iter().any(|line| line == "Changed cells: 0"));
        let state = format!("State: {}", format_snapshot_hash(session.snapshot_hash()));
        assert_eq!(lines.last(), Some(&state));
    }
}
