//! UI rendering for the villa viewer.
//!
//! Handles the HUD overlay (current view state and key help) and the status
//! hint line at the bottom of the window.

use bevy::prelude::*;
use villa_logic::session::Session;

use crate::state::{HudText, StatusText, ViewerSession};

const KEY_HELP: &str = "M mode · V/0-9/T view · -/= explode · W/C/L walls/ceiling/labels · R reset · F fit";

pub fn setup_ui(mut commands: Commands) {
    // HUD - view state (top-left)
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));

    // Status hint (bottom-left)
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgb(0.75, 0.82, 1.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        StatusText,
    ));
}

fn hud_text(s: &Session) -> String {
    let v = s.view();
    let on = |b: bool| if b { "on" } else { "off" };
    let mut out = format!(
        "{}\nMode: {}  View: {}  Explode: {:.0}\nWalls: {}  Ceiling: {}  Labels: {}",
        s.plan().name,
        v.mode,
        v.filter,
        v.explode_slider(),
        on(v.show_walls),
        on(v.show_ceiling),
        on(v.show_labels),
    );
    if let Some(label) = s.hovered_label() {
        out.push_str(&format!("\nHover: {label}"));
    }
    out.push('\n');
    out.push_str(KEY_HELP);
    out
}

pub fn update_hud(
    session: Res<ViewerSession>,
    mut hud_q: Query<&mut Text, (With<HudText>, Without<StatusText>)>,
    mut status_q: Query<&mut Text, (With<StatusText>, Without<HudText>)>,
) {
    if let Ok(mut text) = hud_q.get_single_mut() {
        let next = hud_text(&session);
        if text.0 != next {
            text.0 = next;
        }
    }
    if let Ok(mut text) = status_q.get_single_mut() {
        let next = session.status_text();
        if text.0 != next {
            text.0 = next;
        }
    }
}
