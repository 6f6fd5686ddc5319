//! Viewer constants: world dimensions, colors and interaction tuning.
//!
//! World units are "scene units": plan coordinates multiplied by
//! [`PLAN_SCALE`]. Heights are authored directly in world units.

/// World units per plan unit. Chosen so the 840×520 footprint sits
/// comfortably inside the default camera distance.
pub const PLAN_SCALE: f32 = 0.22;

pub mod heights {
    pub const SLAB_THICKNESS: f32 = 4.0;
    /// Solid room volume in stack mode.
    pub const ROOM_BLOCK: f32 = 18.0;
    pub const OUTLINE: f32 = 2.2;
    pub const WALL: f32 = 22.0;
    pub const ROOM_FLOOR: f32 = 1.2;
    pub const CEILING: f32 = 1.6;
    /// Gap between the wall tops and the ceiling centre.
    pub const CEILING_CLEARANCE: f32 = 1.0;
    pub const ROOF_DECK: f32 = 10.0;
    pub const ROOF_SIGN: f32 = 8.0;
    /// Centre height of the roof sign box.
    pub const ROOF_SIGN_CENTER: f32 = 14.0;
    /// Vertical pitch between consecutive floors before exploding.
    pub const FLOOR_GAP: f32 = 28.0;
    /// Camera focus point above the slab when framing a room.
    pub const FOCUS_ABOVE_SLAB: f32 = 10.0;
}

pub mod labels {
    /// Stack-mode floor label, above the room blocks.
    pub const STACK_FLOOR_LIFT: f32 = 8.0;
    /// Interior room labels, above the walls.
    pub const ROOM_LIFT: f32 = 8.0;
    /// Interior floor label, above the walls.
    pub const INTERIOR_FLOOR_LIFT: f32 = 12.0;
    pub const ROOF_LABEL_HEIGHT: f32 = 28.0;
    /// Floor labels sit towards the back edge of the footprint
    /// (fraction of its world depth, negative Z).
    pub const BACK_EDGE_FRACTION: f32 = 0.42;
}

/// Wall thickness in plan units (5 px in the drawn plans).
pub const WALL_THICKNESS_PLAN: f32 = 5.0;

/// Colors as `0xRRGGBB`.
pub mod colors {
    pub const BACKGROUND: u32 = 0x0e162f;
    pub const SLAB: u32 = 0x111a35;
    pub const OUTLINE: u32 = 0xffffff;
    pub const WALL: u32 = 0xeaf0ff;
    pub const CEILING: u32 = 0x0f1833;
    pub const GRID_MAJOR: u32 = 0x2e4cff;
    pub const GRID_MINOR: u32 = 0x1e2a52;
    pub const HOVER_EMISSIVE: u32 = 0x2030ff;
    pub const SELECTED_EMISSIVE: u32 = 0x2e4cff;
}

pub mod highlight {
    pub const BASE_INTENSITY: f32 = 0.7;
    pub const SELECTED_INTENSITY: f32 = 1.25;
}

pub const CEILING_OPACITY: f32 = 0.75;

/// Explode slider (0–100) → world units of extra separation per floor.
pub const EXPLODE_SLIDER_SCALE: f32 = 0.15;
pub const EXPLODE_SLIDER_MAX: f32 = 100.0;
pub const DEFAULT_EXPLODE_SLIDER: f32 = 40.0;

pub mod grid {
    pub const SIZE: f32 = 420.0;
    pub const DIVISIONS: u32 = 14;
}

/// Pointer travel (px) beyond which a press/release is a drag, not a click.
pub const CLICK_SLOP_PX: f32 = 4.0;
