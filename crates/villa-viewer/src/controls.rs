//! Keyboard controls: the viewer's stand-in for the select/slider/checkbox
//! panel.
//!
//! | Key | Action |
//! |-----|--------|
//! | `M` / `Tab` | Toggle stack / interior |
//! | `V` | Cycle view: all → floor 1..N → roof |
//! | `0` | All floors |
//! | `1`–`9` | Single floor |
//! | `T` | Roof only |
//! | `-` / `=` | Explode slider down / up |
//! | `W` / `C` / `L` | Toggle walls / ceiling / labels |
//! | `R` | Reset camera |
//! | `F` | Fit selected room |

use bevy::prelude::*;
use villa_logic::view::ViewFilter;

use crate::state::ViewerSession;

/// Explode slider change per key press.
const EXPLODE_STEP: f32 = 10.0;

const DIGITS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub fn keyboard_controls(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<ViewerSession>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) || keyboard.just_pressed(KeyCode::Tab) {
        let mode = session.view().mode.toggled();
        session.set_mode(mode);
        info!("Mode: {}", mode);
    }

    let floors = session.scene().floor_count();
    let mut filter = None;
    if keyboard.just_pressed(KeyCode::KeyV) {
        filter = Some(session.view().filter.next(floors));
    }
    if keyboard.just_pressed(KeyCode::Digit0) {
        filter = Some(ViewFilter::All);
    }
    for (i, key) in DIGITS.iter().enumerate().take(floors) {
        if keyboard.just_pressed(*key) {
            filter = Some(ViewFilter::Floor(i));
        }
    }
    if keyboard.just_pressed(KeyCode::KeyT) {
        filter = Some(ViewFilter::Roof);
    }
    if let Some(filter) = filter {
        session.set_filter(filter);
    }

    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        let v = session.view().explode_slider();
        session.set_explode_slider(v - EXPLODE_STEP);
    }
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        let v = session.view().explode_slider();
        session.set_explode_slider(v + EXPLODE_STEP);
    }

    if keyboard.just_pressed(KeyCode::KeyW) {
        session.update_view(|v| v.show_walls = !v.show_walls);
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        session.update_view(|v| v.show_ceiling = !v.show_ceiling);
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        session.update_view(|v| v.show_labels = !v.show_labels);
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        session.reset();
    }
    if keyboard.just_pressed(KeyCode::KeyF) && !session.fit_selected(time.elapsed_secs_f64()) {
        info!("Nothing selected to fit");
    }
}
