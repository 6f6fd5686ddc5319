//! Orbit camera rig with inertial damping.
//!
//! Pointer drags and wheel notches never move the camera directly; they add
//! to angular, pan and radius velocities. [`OrbitRig::update`] runs once per
//! frame: velocities decay by `1 - damping`, are integrated into the
//! spherical coordinates and the target, and the eye is placed back on the
//! sphere. Left drag rotates, right drag (or Shift + left) pans, the wheel
//! zooms.
//!
//! Spherical convention: `theta` is the azimuth around +Y measured from +Z,
//! `phi` the polar angle from +Y.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::tween::CameraPose;

/// `phi` stays this far from the poles.
const PHI_EPSILON: f32 = 1e-4;
/// Velocity magnitude below which a component counts as stopped.
const REST_EPSILON: f32 = 1e-5;

/// Rig tuning. Every field falls back to its default when absent from config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    /// Fraction of every velocity removed each frame.
    pub damping: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radians of velocity per pixel of drag.
    pub rotate_speed: f32,
    /// Pan velocity per pixel of drag.
    pub pan_speed: f32,
    /// Radius velocity per wheel notch.
    pub zoom_step: f32,
    /// Pan distance scales with `radius / pan_radius_divisor`.
    pub pan_radius_divisor: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            damping: 0.10,
            min_radius: 120.0,
            max_radius: 900.0,
            rotate_speed: 0.006,
            pan_speed: 0.004,
            zoom_step: 18.0,
            pan_radius_divisor: 500.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Rotating,
    Panning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Integrated rig state: where the camera is and how fast it is moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub target: Vec3,
    pub spherical: Spherical,
    pub vel_theta: f32,
    pub vel_phi: f32,
    pub vel_pan: Vec2,
    pub vel_radius: f32,
}

impl CameraState {
    fn from_pose(pose: &CameraPose) -> Self {
        Self {
            target: pose.target,
            spherical: Spherical::from_offset(pose.eye - pose.target),
            vel_theta: 0.0,
            vel_phi: 0.0,
            vel_pan: Vec2::ZERO,
            vel_radius: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }
}

#[derive(Debug, Clone)]
pub struct OrbitRig {
    settings: RigSettings,
    state: CameraState,
    gesture: Gesture,
}

impl OrbitRig {
    pub fn new(settings: RigSettings, pose: CameraPose) -> Self {
        let mut rig = Self {
            settings,
            state: CameraState::from_pose(&pose),
            gesture: Gesture::Idle,
        };
        rig.reset(pose);
        rig
    }

    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Begin a drag. Secondary button or Shift pans, anything else rotates.
    pub fn pointer_down(&mut self, button: PointerButton, shift: bool) {
        self.gesture = if button == PointerButton::Secondary || shift {
            Gesture::Panning
        } else {
            Gesture::Rotating
        };
    }

    /// Feed a pointer delta in pixels. Ignored while idle.
    pub fn pointer_move(&mut self, dx: f32, dy: f32) {
        let s = &self.settings;
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Rotating => {
                self.state.vel_theta += -dx * s.rotate_speed;
                self.state.vel_phi += -dy * s.rotate_speed;
            }
            Gesture::Panning => {
                self.state.vel_pan += Vec2::new(dx, dy) * s.pan_speed;
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Wheel input; positive notches zoom out. Only the sign is used.
    pub fn wheel(&mut self, notches: f32) {
        if notches != 0.0 && notches.is_finite() {
            self.state.vel_radius += notches.signum() * self.settings.zoom_step;
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        let keep = 1.0 - self.settings.damping;
        let st = &mut self.state;
        st.vel_theta *= keep;
        st.vel_phi *= keep;
        st.vel_pan *= keep;
        st.vel_radius *= keep;

        st.spherical.theta += st.vel_theta;
        st.spherical.phi =
            (st.spherical.phi + st.vel_phi).clamp(PHI_EPSILON, std::f32::consts::PI - PHI_EPSILON);
        st.spherical.radius = (st.spherical.radius + st.vel_radius)
            .clamp(self.settings.min_radius, self.settings.max_radius);

        if st.vel_pan.x.abs() > REST_EPSILON || st.vel_pan.y.abs() > REST_EPSILON {
            self.pan(self.state.vel_pan);
        }
    }

    /// Translate the target in the camera's screen plane.
    fn pan(&mut self, delta: Vec2) {
        let speed = self.state.spherical.radius / self.settings.pan_radius_divisor;
        let forward = (self.state.target - self.state.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        self.state.target += right * (-delta.x * speed) + Vec3::Y * (delta.y * speed);
    }

    /// Snap to `pose` and stop all motion. The radius is clamped into range.
    pub fn reset(&mut self, pose: CameraPose) {
        self.state = CameraState::from_pose(&pose);
        self.state.spherical.phi = self
            .state
            .spherical
            .phi
            .clamp(PHI_EPSILON, std::f32::consts::PI - PHI_EPSILON);
        self.state.spherical.radius = self
            .state
            .spherical
            .radius
            .clamp(self.settings.min_radius, self.settings.max_radius);
    }

    /// Place the camera exactly at `pose` (used by tweens); clears velocities
    /// without clamping, so the sampled pose is reproduced as-is.
    pub fn look_from(&mut self, pose: CameraPose) {
        self.state = CameraState::from_pose(&pose);
    }

    pub fn eye(&self) -> Vec3 {
        self.state.eye()
    }

    pub fn target(&self) -> Vec3 {
        self.state.target
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye(), self.target())
    }

    pub fn radius(&self) -> f32 {
        self.state.spherical.radius
    }

    pub fn phi(&self) -> f32 {
        self.state.spherical.phi
    }

    pub fn is_at_rest(&self) -> bool {
        let st = &self.state;
        st.vel_theta.abs() < REST_EPSILON
            && st.vel_phi.abs() < REST_EPSILON
            && st.vel_pan.abs().max_element() < REST_EPSILON
            && st.vel_radius.abs() < REST_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn stack_pose() -> CameraPose {
        CameraPose::new(Vec3::new(220.0, 190.0, 220.0), Vec3::new(0.0, 18.0, 0.0))
    }

    fn rig() -> OrbitRig {
        OrbitRig::new(RigSettings::default(), stack_pose())
    }

    #[test]
    fn spherical_round_trips_offset() {
        let off = Vec3::new(220.0, 172.0, 220.0);
        let back = Spherical::from_offset(off).to_offset();
        assert!((back - off).length() < 1e-3, "{back:?}");
    }

    #[test]
    fn reset_reproduces_pose() {
        let r = rig();
        assert!((r.eye() - stack_pose().eye).length() < 1e-3);
        assert_eq!(r.target(), stack_pose().target);
        assert!(r.is_at_rest());
    }

    #[test]
    fn idle_frames_are_a_fixed_point() {
        let mut r = rig();
        let radius = r.radius();
        let eye = r.eye();
        for _ in 0..500 {
            r.update();
        }
        assert!((r.radius() - radius).abs() < 1e-4);
        assert!((r.eye() - eye).length() < 1e-3);
    }

    #[test]
    fn velocities_decay_to_rest() {
        let mut r = rig();
        r.pointer_down(PointerButton::Primary, false);
        r.pointer_move(120.0, -40.0);
        r.pointer_up();
        r.wheel(1.0);
        assert!(!r.is_at_rest());
        for _ in 0..300 {
            r.update();
        }
        assert!(r.is_at_rest());
    }

    #[test]
    fn phi_never_reaches_the_poles() {
        let mut r = rig();
        r.pointer_down(PointerButton::Primary, false);
        for _ in 0..200 {
            r.pointer_move(0.0, 5000.0);
            r.update();
            assert!(r.phi() > 0.0 && r.phi() < PI, "phi={}", r.phi());
        }
        for _ in 0..200 {
            r.pointer_move(0.0, -5000.0);
            r.update();
            assert!(r.phi() > 0.0 && r.phi() < PI, "phi={}", r.phi());
        }
        assert!(r.eye().is_finite());
    }

    #[test]
    fn radius_stays_in_range() {
        let mut r = rig();
        for _ in 0..200 {
            r.wheel(1.0);
            r.update();
        }
        assert!((r.radius() - 900.0).abs() < 1e-3);
        for _ in 0..400 {
            r.wheel(-1.0);
            r.update();
        }
        assert!((r.radius() - 120.0).abs() < 1e-3);
    }

    #[test]
    fn shift_drag_pans_target() {
        let mut r = rig();
        r.pointer_down(PointerButton::Primary, true);
        assert_eq!(r.gesture(), Gesture::Panning);
        let before = r.target();
        let radius = r.radius();
        r.pointer_move(0.0, 50.0);
        r.update();
        // Vertical drag moves the target straight up; orbit is unchanged.
        let moved = r.target() - before;
        assert!(moved.y > 0.0);
        assert!(moved.x.abs() < 1e-4 && moved.z.abs() < 1e-4);
        assert!((r.radius() - radius).abs() < 1e-4);
    }

    #[test]
    fn moves_without_a_gesture_are_ignored() {
        let mut r = rig();
        r.pointer_move(100.0, 100.0);
        assert!(r.is_at_rest());
        r.pointer_down(PointerButton::Secondary, false);
        assert_eq!(r.gesture(), Gesture::Panning);
        r.pointer_up();
        assert_eq!(r.gesture(), Gesture::Idle);
    }

    #[test]
    fn reset_clamps_radius() {
        let mut r = rig();
        r.reset(CameraPose::new(Vec3::new(10.0, 10.0, 10.0), Vec3::ZERO));
        assert!((r.radius() - 120.0).abs() < 1e-3);
    }
}
