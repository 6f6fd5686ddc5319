//! Screen-space rays and room picking.
//!
//! Only the pickable room floors of the interior root are tested, and only
//! while they are visible through every ancestor: hidden floors and stack
//! mode never produce a hit.

use glam::{Vec2, Vec3};

use crate::scene::{NodeRole, Scene, Shape};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from a perspective camera at `eye` looking at `target` through a
    /// point in normalized device coordinates (x right, y up, both `-1..=1`).
    pub fn through_viewport(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32, ndc: Vec2) -> Self {
        let forward = (target - eye).normalize_or_zero();
        let right = match forward.cross(Vec3::Y).try_normalize() {
            Some(r) => r,
            // Looking straight up or down.
            None => Vec3::X,
        };
        let up = right.cross(forward);
        let half = (fov_y * 0.5).tan();
        let dir = forward + right * (ndc.x * aspect * half) + up * (ndc.y * half);
        Self::new(eye, dir)
    }
}

/// Window pixel position (origin top-left) to NDC.
pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        cursor.x / viewport.x * 2.0 - 1.0,
        -(cursor.y / viewport.y * 2.0 - 1.0),
    ))
}

/// Slab test against an axis-aligned box. Returns the entry distance, or 0
/// when the origin is inside.
pub fn intersect_aabb(ray: &Ray, center: Vec3, size: Vec3) -> Option<f32> {
    let half = size * 0.5;
    let min = center - half;
    let max = center + half;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomHit {
    pub room_id: String,
    pub floor: usize,
    pub distance: f32,
}

/// Nearest visible room floor along `ray`.
pub fn pick_room(scene: &Scene, ray: &Ray) -> Option<RoomHit> {
    let mut best: Option<RoomHit> = None;
    for (id, node) in scene.graph.iter() {
        let NodeRole::RoomFloor { room_id, floor } = &node.role else {
            continue;
        };
        let Shape::Cuboid { size, .. } = &node.shape else {
            continue;
        };
        if !scene.graph.is_effectively_visible(id) {
            continue;
        }
        let center = scene.graph.world_translation(id);
        let Some(t) = intersect_aabb(ray, center, *size) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| t < b.distance) {
            best = Some(RoomHit {
                room_id: room_id.clone(),
                floor: *floor,
                distance: t,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;
    use crate::view::{floor_offset, ViewFilter, ViewMode, ViewState};

    #[test]
    fn centre_ray_points_at_target() {
        let eye = Vec3::new(100.0, 80.0, 100.0);
        let ray = Ray::through_viewport(eye, Vec3::ZERO, 45f32.to_radians(), 1.6, Vec2::ZERO);
        let expected = (-eye).normalize();
        assert!((ray.direction - expected).length() < 1e-5);
    }

    #[test]
    fn ndc_corners() {
        let vp = Vec2::new(800.0, 600.0);
        assert_eq!(cursor_to_ndc(Vec2::ZERO, vp), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(cursor_to_ndc(vp, vp), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(cursor_to_ndc(Vec2::ZERO, Vec2::ZERO), None);
    }

    #[test]
    fn aabb_hits_and_misses() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        assert_eq!(intersect_aabb(&ray, Vec3::ZERO, Vec3::splat(2.0)), Some(9.0));
        let miss = Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y);
        assert_eq!(intersect_aabb(&miss, Vec3::ZERO, Vec3::splat(2.0)), None);
        let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert_eq!(intersect_aabb(&away, Vec3::ZERO, Vec3::splat(2.0)), None);
    }

    fn downward_ray_over(scene: &Scene, plan: &Plan, room: &str) -> Ray {
        let r = plan.room(room).unwrap().rect();
        let c = scene.mapper.rect_center(&r, 500.0);
        Ray::new(c, Vec3::NEG_Y)
    }

    #[test]
    fn nearest_visible_floor_wins() {
        let plan = Plan::builtin().unwrap();
        let view = ViewState {
            mode: ViewMode::Interior,
            ..ViewState::default()
        };
        let scene = Scene::compose(&plan, &view).unwrap();
        let hit = pick_room(&scene, &downward_ray_over(&scene, &plan, "bed1")).unwrap();
        assert_eq!(hit.room_id, "bed1");
        // Looking down, the top floor is nearest.
        assert_eq!(hit.floor, plan.floor_count - 1);
    }

    #[test]
    fn hidden_floors_are_not_pickable() {
        let plan = Plan::builtin().unwrap();
        let view = ViewState {
            mode: ViewMode::Interior,
            filter: ViewFilter::Floor(0),
            ..ViewState::default()
        };
        let scene = Scene::compose(&plan, &view).unwrap();
        let hit = pick_room(&scene, &downward_ray_over(&scene, &plan, "bed1")).unwrap();
        assert_eq!(hit.floor, 0);
        assert!(hit.distance > 500.0 - floor_offset(1, view.explode_amount));
    }

    #[test]
    fn stack_mode_is_inert() {
        let plan = Plan::builtin().unwrap();
        let scene = Scene::compose(&plan, &ViewState::default()).unwrap();
        assert!(pick_room(&scene, &downward_ray_over(&scene, &plan, "bed1")).is_none());
    }
}
