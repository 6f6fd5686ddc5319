//! Pure viewer logic for the villa floor-plan model.
//!
//! This crate contains everything that is independent of the rendering
//! engine: plan data, plan → world mapping, wall extraction, scene
//! composition, the orbit camera rig and room picking. Functions take plain
//! data and return results, so they are unit-testable and can drive the Bevy
//! viewer as well as the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`builders`] | Stack (block) and interior (wall) floor builders |
//! | [`camera`] | Orbit/pan/zoom rig with inertial damping |
//! | [`config`] | Viewer configuration (rig tuning, UI defaults) |
//! | [`constants`] | World dimensions, colors, tuning constants |
//! | [`error`] | Plan and config error types |
//! | [`mapping`] | Plan-space → world-space coordinate mapper |
//! | [`picking`] | Ray construction and ray/box room picking |
//! | [`plan`] | Plan model: footprint, rooms, roof sign |
//! | [`scene`] | Renderer-neutral scene graph and composer |
//! | [`session`] | Per-frame viewer state: view, rig, selection, tween |
//! | [`tween`] | Eased camera tween and room framing pose |
//! | [`view`] | View state (mode, filter, explode, toggles) and its application |
//! | [`walls`] | Deduplicated wall-segment extraction |

pub mod builders;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod mapping;
pub mod picking;
pub mod plan;
pub mod scene;
pub mod session;
pub mod tween;
pub mod view;
pub mod walls;

pub use error::{ConfigError, PlanError};
