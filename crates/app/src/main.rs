mod frame_input;
mod game_layout;
mod ui_render;
mod ui_text;
mod window_config;

use std::env;

use app::app_loop::AppState;
use app::file_storage::FileStorage;
use app::launch::{LaunchOptions, resolve_launch_options_from_args};
use app::track_file::load_track_provider;
use cellmerge_core::{
    GameConfig, GameSession, GridPolicy, KeyValueStore, LoadOutcome, LocationProvider,
    MemoryStorage, NoLocationDevice,
};
use macroquad::prelude::*;
use macroquad::window::Conf;
use taffy::TaffyTree;
use tracing_subscriber::EnvFilter;

use crate::frame_input::capture_frame_input;
use crate::game_layout::{compute_frame_layout, setup_layout};
use crate::ui_render::draw_frame;
use crate::window_config::build_window_conf;

fn window_conf() -> Conf {
    build_window_conf()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

fn load_config(options: &LaunchOptions) -> GameConfig {
    let Some(path) = &options.config_path else {
        return GameConfig::default();
    };
    match GameConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "config_rejected_using_defaults");
            GameConfig::default()
        }
    }
}

fn open_storage() -> Box<dyn KeyValueStore> {
    match FileStorage::get_default_dir() {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "save_directory");
            Box::new(FileStorage::new(dir))
        }
        None => {
            tracing::warn!("no data directory; progress will not survive restart");
            Box::new(MemoryStorage::new())
        }
    }
}

fn open_location_provider(options: &LaunchOptions) -> Box<dyn LocationProvider> {
    let Some(path) = &options.track_path else {
        return Box::new(NoLocationDevice);
    };
    match load_track_provider(path) {
        Ok(provider) => Box::new(provider),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "track_unreadable");
            Box::new(NoLocationDevice)
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let options = resolve_launch_options_from_args(&args).unwrap_or_else(|err| {
        tracing::error!(error = %err, "invalid_launch_arguments");
        LaunchOptions::default()
    });

    let mut session = GameSession::new(load_config(&options), open_storage())
        .with_location_provider(open_location_provider(&options))
        .with_grid_policy(GridPolicy::FullRebuild);
    if let LoadOutcome::Fresh(reason) = session.load(options.movement_override) {
        tracing::debug!(?reason, "starting_fresh");
    }

    let mut taffy = TaffyTree::new();
    let nodes = match setup_layout(&mut taffy) {
        Ok(nodes) => nodes,
        Err(err) => {
            tracing::error!(error = %err, "layout_setup_failed");
            return;
        }
    };
    let mut app_state = AppState::new();

    loop {
        clear_background(BLACK);

        match compute_frame_layout(&mut taffy, &nodes, screen_width(), screen_height()) {
            Ok(layout) => {
                let input = capture_frame_input(app_state.view(), session.config());
                app_state.tick(&mut session, &input, layout.map);
                draw_frame(&session, &app_state, &layout);
            }
            Err(err) => tracing::error!(error = %err, "layout_failed"),
        }

        next_frame().await
    }
}
