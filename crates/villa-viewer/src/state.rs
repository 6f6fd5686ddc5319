//! State management for the villa viewer.
//!
//! Contains resource types and Bevy components used throughout the viewer.
//! All interaction state lives in the [`ViewerSession`] resource; the ECS
//! side only mirrors it.

use bevy::prelude::*;
use villa_logic::scene::NodeId;
use villa_logic::session::Session;
use villa_logic::view::{ViewFilter, ViewMode};

// ============================================================================
// RESOURCES
// ============================================================================

#[derive(Resource, Deref, DerefMut)]
pub struct ViewerSession(pub Session);

/// Last cursor position, for pixel deltas while dragging.
#[derive(Resource, Default)]
pub struct PointerState {
    pub last_cursor: Option<Vec2>,
    pub hovering: bool,
}

/// Command-line options.
#[derive(Debug, Clone, Default)]
pub struct ViewerArgs {
    pub plan_path: Option<String>,
    pub config_path: Option<String>,
    pub mode: Option<ViewMode>,
    pub view: Option<ViewFilter>,
}

impl ViewerArgs {
    pub fn from_args() -> Self {
        Self::parse(std::env::args().collect())
    }

    /// Parse `args`, where `args[0]` is the program name. Unknown flags and
    /// unparsable values are skipped.
    pub fn parse(args: Vec<String>) -> Self {
        let mut out = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--plan" | "-p" if i + 1 < args.len() => {
                    out.plan_path = Some(args[i + 1].clone());
                    i += 2;
                }
                "--config" | "-c" if i + 1 < args.len() => {
                    out.config_path = Some(args[i + 1].clone());
                    i += 2;
                }
                "--mode" | "-m" if i + 1 < args.len() => {
                    match args[i + 1].parse() {
                        Ok(mode) => out.mode = Some(mode),
                        Err(e) => eprintln!("Ignoring --mode: {e}"),
                    }
                    i += 2;
                }
                "--view" | "-v" if i + 1 < args.len() => {
                    match args[i + 1].parse() {
                        Ok(view) => out.view = Some(view),
                        Err(e) => eprintln!("Ignoring --view: {e}"),
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }
        out
    }
}

// ============================================================================
// COMPONENTS
// ============================================================================

#[derive(Component)]
pub struct MainCamera;

/// Links an entity to the scene-graph node it mirrors.
#[derive(Component, Clone, Copy)]
pub struct SceneNodeLink(pub NodeId);

/// Pickable room floor; owns a unique material so it can be tinted alone.
#[derive(Component, Clone)]
pub struct RoomFloorTag {
    pub room_id: String,
    pub floor: usize,
}

/// Screen-space text pinned to a label node.
#[derive(Component, Clone, Copy)]
pub struct LabelAnchor(pub NodeId);

#[derive(Component)]
pub struct HudText;

#[derive(Component)]
pub struct StatusText;
