//! View state and its application onto the composed scene.
//!
//! [`apply_view`] is the whole View-State Controller for the scene graph: it
//! re-derives every visibility flag and every vertical offset from the
//! current [`ViewState`] from scratch. It never adds or removes nodes.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{heights, DEFAULT_EXPLODE_SLIDER, EXPLODE_SLIDER_MAX, EXPLODE_SLIDER_SCALE};
use crate::error::ConfigError;
use crate::scene::{ModeRoot, Scene, SceneGraph};
use crate::tween::CameraPose;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Solid per-room blocks.
    #[default]
    Stack,
    /// Walls, floors and ceilings with room picking.
    Interior,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Stack => ViewMode::Interior,
            ViewMode::Interior => ViewMode::Stack,
        }
    }

    /// Camera pose the rig snaps to when this mode becomes active.
    pub fn default_pose(self) -> CameraPose {
        match self {
            ViewMode::Stack => CameraPose::new(
                Vec3::new(220.0, 190.0, 220.0),
                Vec3::new(0.0, 18.0, 0.0),
            ),
            ViewMode::Interior => CameraPose::new(
                Vec3::new(190.0, 210.0, 190.0),
                Vec3::new(0.0, heights::SLAB_THICKNESS + heights::FOCUS_ABOVE_SLAB, 0.0),
            ),
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ViewMode::Stack => "Stack mode: inspect floors • use Explode to separate",
            ViewMode::Interior => {
                "Interior mode: click a room to focus • toggle walls/ceiling/labels"
            }
        }
    }
}

impl FromStr for ViewMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stack" => Ok(ViewMode::Stack),
            "interior" => Ok(ViewMode::Interior),
            _ => Err(ConfigError::InvalidValue {
                field: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Stack => "stack",
            ViewMode::Interior => "interior",
        })
    }
}

/// Which groups are shown: everything, one floor, or the roof.
///
/// Serialized as `"all"`, `"floor1"`…, `"roof"`; floor numbers are 1-based in
/// text and 0-based in [`ViewFilter::Floor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ViewFilter {
    #[default]
    All,
    Floor(usize),
    Roof,
}

impl ViewFilter {
    pub fn shows_floor(self, index: usize) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Floor(i) => i == index,
            ViewFilter::Roof => false,
        }
    }

    pub fn shows_roof(self) -> bool {
        matches!(self, ViewFilter::All | ViewFilter::Roof)
    }

    /// Cycle all → floor1 → … → floorN → roof → all.
    pub fn next(self, floor_count: usize) -> Self {
        match self {
            ViewFilter::All if floor_count > 0 => ViewFilter::Floor(0),
            ViewFilter::All => ViewFilter::Roof,
            ViewFilter::Floor(i) if i + 1 < floor_count => ViewFilter::Floor(i + 1),
            ViewFilter::Floor(_) => ViewFilter::Roof,
            ViewFilter::Roof => ViewFilter::All,
        }
    }
}

impl FromStr for ViewFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue {
            field: "view",
            value: s.to_string(),
        };
        match s {
            "all" => Ok(ViewFilter::All),
            "roof" => Ok(ViewFilter::Roof),
            _ => {
                let n: usize = s
                    .strip_prefix("floor")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(invalid)?;
                if n == 0 {
                    return Err(invalid());
                }
                Ok(ViewFilter::Floor(n - 1))
            }
        }
    }
}

impl TryFrom<String> for ViewFilter {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ViewFilter> for String {
    fn from(v: ViewFilter) -> Self {
        v.to_string()
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewFilter::All => f.write_str("all"),
            ViewFilter::Floor(i) => write!(f, "floor{}", i + 1),
            ViewFilter::Roof => f.write_str("roof"),
        }
    }
}

/// The single, process-wide view state. Re-applied in full on every change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub filter: ViewFilter,
    /// Extra separation per floor, in world units.
    pub explode_amount: f32,
    pub show_walls: bool,
    pub show_ceiling: bool,
    pub show_labels: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: ViewMode::Stack,
            filter: ViewFilter::All,
            explode_amount: DEFAULT_EXPLODE_SLIDER * EXPLODE_SLIDER_SCALE,
            show_walls: true,
            show_ceiling: false,
            show_labels: true,
        }
    }
}

impl ViewState {
    pub fn explode_slider(&self) -> f32 {
        self.explode_amount / EXPLODE_SLIDER_SCALE
    }

    /// Set explode from the 0–100 slider value; out-of-range input is clamped.
    pub fn set_explode_slider(&mut self, value: f32) {
        let v = if value.is_finite() { value } else { 0.0 };
        self.explode_amount = v.clamp(0.0, EXPLODE_SLIDER_MAX) * EXPLODE_SLIDER_SCALE;
    }
}

/// Height of floor `index` above the ground.
pub fn floor_offset(index: usize, explode_amount: f32) -> f32 {
    let i = index as f32;
    i * heights::FLOOR_GAP + i * explode_amount
}

/// Height of the roof group above a stack of `floor_count` floors.
pub fn roof_offset(floor_count: usize, explode_amount: f32) -> f32 {
    floor_count as f32 * (heights::FLOOR_GAP + explode_amount)
}

/// Apply `view` to `scene`: active root, per-floor and roof visibility,
/// vertical offsets and layer toggles.
pub fn apply_view(view: &ViewState, scene: &mut Scene) {
    let graph = &mut scene.graph;
    graph.set_visible(scene.stack.root, view.mode == ViewMode::Stack);
    graph.set_visible(scene.interior.root, view.mode == ViewMode::Interior);

    for root in [&scene.stack, &scene.interior] {
        apply_to_root(view, root, graph);
    }
}

fn apply_to_root(view: &ViewState, root: &ModeRoot, graph: &mut SceneGraph) {
    let count = root.floors.len();
    for (i, floor) in root.floors.iter().enumerate() {
        graph.set_visible(floor.group, view.filter.shows_floor(i));
        graph.set_height(floor.group, floor_offset(i, view.explode_amount));
        if let Some(walls) = floor.walls {
            graph.set_visible(walls, view.show_walls);
        }
        if let Some(ceiling) = floor.ceiling {
            graph.set_visible(ceiling, view.show_ceiling);
        }
        for &label in &floor.labels {
            graph.set_visible(label, view.show_labels);
        }
    }
    graph.set_visible(root.roof.group, view.filter.shows_roof());
    graph.set_height(root.roof.group, roof_offset(count, view.explode_amount));
    graph.set_visible(root.roof.label, view.show_labels);
}
