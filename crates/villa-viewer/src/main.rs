//! Villa Viewer - Bevy 3D viewer for the villa floor plan
//!
//! Shows the plan either as stacked solid floors or as an interior cutaway
//! with walls, ceilings and clickable rooms. All scene, camera and picking
//! logic lives in `villa-logic`; this crate renders it and feeds it input.
//!
//! Usage:
//!   villa-viewer [--plan plan.json] [--config viewer.json]
//!                [--mode stack|interior] [--view all|floor1..N|roof]

mod camera;
mod controls;
mod highlight;
mod input;
mod labels;
mod scene;
mod state;
mod ui;

use bevy::prelude::*;
use villa_logic::config::ViewerConfig;
use villa_logic::plan::Plan;
use villa_logic::session::Session;

use camera::{draw_ground_grid, setup_camera, sync_camera, tick_session};
use controls::keyboard_controls;
use highlight::apply_highlights;
use input::{hover_picking, pointer_input};
use labels::{spawn_labels, update_labels};
use scene::{spawn_scene, sync_scene};
use state::{PointerState, ViewerArgs, ViewerSession};
use ui::{setup_ui, update_hud};

fn load_session(args: &ViewerArgs) -> Result<Session, String> {
    let mut config = match &args.config_path {
        Some(path) => ViewerConfig::load(path).map_err(|e| format!("{path}: {e}"))?,
        None => ViewerConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.view.mode = mode;
    }
    if let Some(view) = args.view {
        config.view.view = view;
    }

    let plan = match &args.plan_path {
        Some(path) => Plan::load(path).map_err(|e| format!("{path}: {e}"))?,
        None => Plan::builtin().map_err(|e| format!("built-in plan: {e}"))?,
    };
    Session::new(plan, config).map_err(|e| format!("scene: {e}"))
}

fn main() {
    let args = ViewerArgs::from_args();
    let session = match load_session(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start viewer: {e}");
            std::process::exit(1);
        }
    };
    let window = session.config().window.clone();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title,
                resolution: (window.width, window.height).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ViewerSession(session))
        .insert_resource(PointerState::default())
        .add_systems(
            Startup,
            (setup_camera, spawn_scene, spawn_labels, setup_ui),
        )
        .add_systems(
            Update,
            (
                keyboard_controls,
                pointer_input,
                tick_session,
                sync_camera,
                hover_picking,
                sync_scene,
                apply_highlights,
                update_labels,
                update_hud,
                draw_ground_grid,
            )
                .chain(),
        )
        .run();
}
