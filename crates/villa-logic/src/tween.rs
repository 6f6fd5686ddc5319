//! Eased camera transitions and room framing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::heights;
use crate::mapping::CoordinateMapper;
use crate::plan::Rect;

/// Quadratic ease-in-out on `[0, 1]`; input outside the range is clamped.
pub fn ease_in_out_quad(t: f32) -> f32 {
    let k = t.clamp(0.0, 1.0);
    if k < 0.5 {
        2.0 * k * k
    } else {
        1.0 - (-2.0 * k + 2.0).powi(2) / 2.0
    }
}

/// Camera position and look-at point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            eye: self.eye.lerp(other.eye, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

/// A time-based interpolation between two poses.
///
/// Eye and target are interpolated independently with the same eased
/// parameter. Times are seconds on any monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTween {
    pub from: CameraPose,
    pub to: CameraPose,
    pub start: f64,
    pub duration: f32,
}

impl CameraTween {
    pub fn new(from: CameraPose, to: CameraPose, start: f64, duration: f32) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`. A non-positive duration is complete at once.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start) / f64::from(self.duration)) as f32).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: f64) -> CameraPose {
        let k = self.progress(now);
        if k >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, ease_in_out_quad(k))
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn destination(&self) -> CameraPose {
        self.to
    }
}

/// Pose that frames `rect`, aiming just above the ground-floor slab.
///
/// The eye sits diagonally above the room at a distance proportional to the
/// room's larger side; the distance is clamped into `[min_radius, max_radius]`
/// so the rig can take over without jumping.
pub fn framing_pose(
    rect: &Rect,
    mapper: &CoordinateMapper,
    min_radius: f32,
    max_radius: f32,
) -> CameraPose {
    let target = mapper.rect_center(
        rect,
        heights::SLAB_THICKNESS + heights::FOCUS_ABOVE_SLAB,
    );
    let size = mapper.length(rect.max_side());
    let mut offset = Vec3::new(size * 1.2, size * 0.95 + 40.0, size * 1.2);

    let len = offset.length();
    let clamped = len.clamp(min_radius, max_radius);
    if len > f32::EPSILON && clamped != len {
        offset *= clamped / len;
    }
    CameraPose::new(target + offset, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-6);
        assert_eq!(ease_in_out_quad(-1.0), 0.0);
        assert_eq!(ease_in_out_quad(3.0), 1.0);
    }

    #[test]
    fn ease_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out_quad(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn tween_hits_endpoints() {
        let a = CameraPose::new(Vec3::new(100.0, 100.0, 100.0), Vec3::ZERO);
        let b = CameraPose::new(Vec3::new(10.0, 50.0, 10.0), Vec3::new(5.0, 14.0, 5.0));
        let tw = CameraTween::new(a, b, 2.0, 0.65);
        assert_eq!(tw.sample(2.0), a);
        assert_eq!(tw.sample(1.0), a);
        assert_eq!(tw.sample(2.65), b);
        assert_eq!(tw.sample(10.0), b);
        assert!(!tw.is_finished(2.3));
        assert!(tw.is_finished(2.65));

        let mid = tw.sample(2.325);
        assert!((mid.eye - a.eye.lerp(b.eye, 0.5)).length() < 1e-3);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let a = CameraPose::new(Vec3::ONE, Vec3::ZERO);
        let b = CameraPose::new(Vec3::X, Vec3::Y);
        let tw = CameraTween::new(a, b, 5.0, 0.0);
        assert!(tw.is_finished(5.0));
        assert_eq!(tw.sample(5.0), b);
    }

    #[test]
    fn framing_targets_room_centre_above_slab() {
        let fp = Rect::new(70.0, 120.0, 840.0, 520.0);
        let mapper = CoordinateMapper::for_footprint(&fp);
        let room = Rect::new(640.0, 130.0, 190.0, 140.0);
        let pose = framing_pose(&room, &mapper, 120.0, 900.0);

        let centre = mapper.rect_center(&room, 0.0);
        assert!((pose.target.x - centre.x).abs() < 1e-4);
        assert!((pose.target.z - centre.z).abs() < 1e-4);
        assert!((pose.target.y - 14.0).abs() < 1e-4);
        assert!(pose.eye.y > pose.target.y);
        assert!(pose.distance() >= 120.0 - 1e-3);
    }

    #[test]
    fn framing_distance_clamped() {
        let fp = Rect::new(0.0, 0.0, 10000.0, 10000.0);
        let mapper = CoordinateMapper::for_footprint(&fp);
        let huge = Rect::new(0.0, 0.0, 10000.0, 10000.0);
        let pose = framing_pose(&huge, &mapper, 120.0, 900.0);
        assert!((pose.distance() - 900.0).abs() < 1e-2);
    }
}
