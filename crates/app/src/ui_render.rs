//! Rendering for the main game frame and UI panels.

use crate::game_layout::FrameLayout;
use crate::ui_text::{legend_text, session_panel_lines, status_text};
use app::app_loop::AppState;
use app::map_view::{MapView, PanelRect};
use cellmerge_core::{CellFill, CellStyle, GameSession};
use macroquad::prelude::*;

const BORDER_COLOR: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };
const BORDER_THICKNESS: f32 = 1.0;
const PANEL_PAD_X: f32 = 15.0;
const PANEL_PAD_Y: f32 = 25.0;
const LINE_HEIGHT: f32 = 18.0;
const TOKEN_FONT_SIZE: f32 = 18.0;

const MAP_BACKGROUND: Color = Color { r: 0.10, g: 0.12, b: 0.11, a: 1.0 };
const REACH_OUTLINE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.67 };
const FAR_OUTLINE: Color = Color { r: 0.27, g: 0.27, b: 0.27, a: 0.4 };
const PLAYER_OUTLINE: Color = Color { r: 0.2, g: 0.9, b: 0.3, a: 1.0 };

pub fn draw_frame(session: &GameSession, app_state: &AppState, layout: &FrameLayout) {
    draw_panel_borders(layout);
    if let Some(view) = app_state.view() {
        draw_map(session, view);
        draw_hover_tooltip(session, view);
    }
    draw_status_panel(session, app_state, layout.status);
    draw_side_panel(session, app_state, layout.event_log);
    draw_legend(session, layout.legend);
}

fn draw_panel_borders(layout: &FrameLayout) {
    for panel in layout.panels() {
        draw_rectangle_lines(
            panel.x,
            panel.y,
            panel.width,
            panel.height,
            BORDER_THICKNESS,
            BORDER_COLOR,
        );
    }
}

fn draw_status_panel(session: &GameSession, app_state: &AppState, panel: PanelRect) {
    let text_x = panel.x + PANEL_PAD_X;
    draw_text(&status_text(session, app_state.mode), text_x, panel.y + 22.0, 20.0, WHITE);
    if let Some(message) = session.win_message() {
        draw_text(&message, text_x, panel.y + 44.0, 20.0, GOLD);
    }
}

fn draw_side_panel(session: &GameSession, app_state: &AppState, panel: PanelRect) {
    let text_x = panel.x + PANEL_PAD_X;
    let mut text_y = panel.y + PANEL_PAD_Y;

    for line in session_panel_lines(session) {
        draw_text(&line, text_x, text_y, 16.0, LIGHTGRAY);
        text_y += LINE_HEIGHT;
    }

    text_y += LINE_HEIGHT;
    draw_text("Event log", text_x, text_y, 22.0, YELLOW);
    text_y += LINE_HEIGHT;

    let remaining = panel.height - (text_y - panel.y);
    let lines = fit_lines_to_panel(&newest_first(&app_state.event_log), remaining, LINE_HEIGHT, 0.0);
    for line in lines {
        draw_text(&line, text_x, text_y, 16.0, LIGHTGRAY);
        text_y += LINE_HEIGHT;
    }
}

fn draw_legend(session: &GameSession, panel: PanelRect) {
    let legend = legend_text(session.movement_mode(), session.config().interact_radius);
    draw_text(&legend, panel.x + PANEL_PAD_X, panel.y + 23.0, 16.0, GRAY);
}

fn draw_map(session: &GameSession, view: &MapView) {
    let panel = view.panel;
    draw_rectangle(panel.x, panel.y, panel.width, panel.height, MAP_BACKGROUND);

    for cell in session.grid().iter() {
        let rect = view.cell_rect(session.config(), cell.coord);
        let Some(visible) = panel.intersect(rect) else {
            continue;
        };

        draw_rectangle(
            visible.x,
            visible.y,
            visible.width,
            visible.height,
            fill_color(cell.style.fill),
        );
        let (thickness, outline) = outline_for(cell.style);
        draw_rectangle_lines(
            visible.x,
            visible.y,
            visible.width,
            visible.height,
            thickness,
            outline,
        );

        // Labels on edge cells would spill out of the panel.
        if let Some(value) = cell.token.filter(|_| rect_within(panel, rect)) {
            let label = value.to_string();
            let size = measure_text(&label, None, TOKEN_FONT_SIZE as u16, 1.0);
            draw_text(
                &label,
                rect.x + (rect.width - size.width) / 2.0,
                rect.y + (rect.height + size.offset_y) / 2.0,
                TOKEN_FONT_SIZE,
                WHITE,
            );
        }
    }

    let (px, py) = view.screen_of(session.player().position);
    if panel.contains(px, py) {
        draw_circle(px, py, 5.0, PLAYER_OUTLINE);
    }
}

fn draw_hover_tooltip(session: &GameSession, view: &MapView) {
    let (x, y) = mouse_position();
    let Some(coord) = view.cell_at(session.config(), x, y) else {
        return;
    };
    let Some(tooltip) = session.grid().get(coord).and_then(|cell| cell.tooltip()) else {
        return;
    };
    let size = measure_text(&tooltip, None, 16, 1.0);
    draw_rectangle(x + 12.0, y - 20.0, size.width + 12.0, 24.0, BLACK);
    draw_text(&tooltip, x + 18.0, y - 3.0, 16.0, WHITE);
}

fn fill_color(fill: CellFill) -> Color {
    match fill {
        CellFill::TokenInteractable => Color { r: 0.72, g: 0.53, b: 0.04, a: 0.8 },
        CellFill::TokenFar => Color { r: 0.2, g: 0.33, b: 0.73, a: 0.33 },
        CellFill::EmptyInteractable => Color { r: 0.07, g: 0.4, b: 0.13, a: 0.4 },
        CellFill::EmptyFar => Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 },
    }
}

fn outline_for(style: CellStyle) -> (f32, Color) {
    if style.player_cell {
        (3.0, PLAYER_OUTLINE)
    } else if style.interactable {
        (1.5, REACH_OUTLINE)
    } else {
        (1.0, FAR_OUTLINE)
    }
}

fn rect_within(outer: PanelRect, inner: PanelRect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.width <= outer.x + outer.width
        && inner.y + inner.height <= outer.y + outer.height
}

fn newest_first(lines: &[String]) -> Vec<String> {
    lines.iter().rev().cloned().collect()
}

fn fit_lines_to_panel(
    lines: &[String],
    panel_height: f32,
    line_step: f32,
    panel_pad_y: f32,
) -> Vec<String> {
    if line_step <= 0.0 {
        return Vec::new();
    }

    let usable_height = (panel_height - panel_pad_y).max(0.0);
    let max_lines = (usable_height / line_step).floor() as usize;
    if lines.len() <= max_lines {
        return lines.to_vec();
    }
    if max_lines == 0 {
        return Vec::new();
    }
    if max_lines == 1 {
        return vec![format!("... and {} more", lines.len())];
    }

    let hidden_count = lines.len() - (max_lines - 1);
    let mut fitted_lines = lines[..max_lines - 1].to_vec();
    fitted_lines.push(format!("... and {hidden_count} more"));
    fitted_lines
}
