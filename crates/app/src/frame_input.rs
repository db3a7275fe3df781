//! Keyboard and mouse input collection for one rendered frame.

use app::app_loop::FrameInput;
use app::map_view::MapView;
use cellmerge_core::GameConfig;
use macroquad::prelude::{
    KeyCode, MouseButton, is_key_pressed, is_mouse_button_pressed, mouse_position,
};

const ACTION_KEYS: [KeyCode; 13] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::G,
    KeyCode::N,
    KeyCode::Y,
    KeyCode::Enter,
    KeyCode::Escape,
];

/// Clicks resolve against the view drawn last frame, which is what the player saw.
pub fn capture_frame_input(view: Option<&MapView>, config: &GameConfig) -> FrameInput {
    let keys_pressed = ACTION_KEYS.into_iter().filter(|key| is_key_pressed(*key)).collect();

    let clicked = if is_mouse_button_pressed(MouseButton::Left) {
        let (x, y) = mouse_position();
        view.and_then(|view| view.cell_at(config, x, y))
    } else {
        None
    };

    FrameInput { keys_pressed, clicked }
}
