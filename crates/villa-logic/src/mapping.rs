//! Plan-space → world-space mapping.
//!
//! Plan X maps to world X, plan Y maps to world Z (the ground plane), both
//! scaled by a fixed factor around the footprint centre. Height (world Y) is
//! independent of the plan. Every builder goes through one mapper so that
//! walls, floors and pick targets always line up.

use glam::Vec3;

use crate::constants::PLAN_SCALE;
use crate::plan::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    center_x: f32,
    center_y: f32,
    scale: f32,
}

impl CoordinateMapper {
    /// Mapper centred on `footprint` with the default [`PLAN_SCALE`].
    pub fn for_footprint(footprint: &Rect) -> Self {
        Self::with_scale(footprint, PLAN_SCALE)
    }

    pub fn with_scale(footprint: &Rect, scale: f32) -> Self {
        let (center_x, center_y) = footprint.center();
        Self {
            center_x,
            center_y,
            scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_world_x(&self, plan_x: f32) -> f32 {
        (plan_x - self.center_x) * self.scale
    }

    pub fn to_world_z(&self, plan_y: f32) -> f32 {
        (plan_y - self.center_y) * self.scale
    }

    /// Plan length → world length.
    pub fn length(&self, plan_len: f32) -> f32 {
        plan_len * self.scale
    }

    /// Plan point at world height `y`.
    pub fn to_world(&self, plan_x: f32, plan_y: f32, y: f32) -> Vec3 {
        Vec3::new(self.to_world_x(plan_x), y, self.to_world_z(plan_y))
    }

    /// Centre of `rect` at world height `y`.
    pub fn rect_center(&self, rect: &Rect, y: f32) -> Vec3 {
        let (cx, cy) = rect.center();
        self.to_world(cx, cy, y)
    }

    /// World footprint of `rect` as `(width, depth)`.
    pub fn rect_size(&self, rect: &Rect) -> (f32, f32) {
        (self.length(rect.w), self.length(rect.h))
    }
}
