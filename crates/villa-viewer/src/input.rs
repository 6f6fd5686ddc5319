//! Pointer input for the villa viewer.
//!
//! Left drag rotates, right drag or Shift + left drag pans, the wheel zooms.
//! The cursor is ray-cast against the room floors on every move for hover;
//! a left press/release that barely moved selects the room under it.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use villa_logic::camera::PointerButton;
use villa_logic::picking::{cursor_to_ndc, Ray};

use crate::state::{PointerState, ViewerSession};

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Ray from the session camera through a window pixel.
fn cursor_ray(session: &ViewerSession, window: &Window, cursor: Vec2) -> Option<Ray> {
    let viewport = Vec2::new(window.width(), window.height());
    let ndc = cursor_to_ndc(cursor, viewport)?;
    let pose = session.camera_pose();
    let rig = session.rig().settings();
    Some(Ray::through_viewport(
        pose.eye,
        pose.target,
        rig.fov_degrees.to_radians(),
        viewport.x / viewport.y,
        ndc,
    ))
}

pub fn pointer_input(
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut wheel_events: EventReader<MouseWheel>,
    mut pointer: ResMut<PointerState>,
    mut session: ResMut<ViewerSession>,
) {
    let Ok(window) = window_q.get_single() else {
        return;
    };
    let cursor = window.cursor_position();
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
        if mouse.just_pressed(button) {
            if let Some(b) = pointer_button(button) {
                session.pointer_down(b, shift);
            }
        }
    }

    if let (Some(now), Some(last)) = (cursor, pointer.last_cursor) {
        let delta = now - last;
        if delta != Vec2::ZERO {
            session.pointer_move(delta.x, delta.y);
        }
    }
    pointer.last_cursor = cursor;

    let released = [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
        .into_iter()
        .any(|b| mouse.just_released(b));
    if released {
        let ray = cursor.and_then(|c| cursor_ray(&session, window, c));
        if let Some(room) = session.pointer_up(ray.as_ref(), time.elapsed_secs_f64()) {
            info!("Selected {} (floor {})", room.room_id, room.floor + 1);
        }
    }

    for ev in wheel_events.read() {
        // Scrolling down zooms out.
        session.wheel(-ev.y);
    }
}

/// Hover picking plus pointer-cursor feedback.
pub fn hover_picking(
    mut commands: Commands,
    window_q: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
    mut session: ResMut<ViewerSession>,
) {
    let Ok((window_entity, window)) = window_q.get_single() else {
        return;
    };
    let ray = window
        .cursor_position()
        .and_then(|c| cursor_ray(&session, window, c));
    let hovering = session.hover(ray.as_ref());

    if hovering != pointer.hovering {
        let icon = if hovering {
            SystemCursorIcon::Pointer
        } else {
            SystemCursorIcon::Default
        };
        commands.entity(window_entity).insert(CursorIcon::from(icon));
        pointer.hovering = hovering;
    }
}
