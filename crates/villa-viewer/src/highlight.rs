//! Emissive tint for hovered and selected room floors.

use bevy::prelude::*;
use villa_logic::session::SelectionState;

use crate::scene::srgb;
use crate::state::{RoomFloorTag, ViewerSession};

/// Re-tint room floors whenever hover or selection changes. Selection wins
/// over hover on the same floor.
pub fn apply_highlights(
    session: Res<ViewerSession>,
    mut last: Local<Option<SelectionState>>,
    floors: Query<(&RoomFloorTag, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let current = session.selection();
    if last.as_ref() == Some(current) {
        return;
    }

    for (tag, handle) in &floors {
        let Some(material) = materials.get_mut(&handle.0) else {
            continue;
        };
        let emissive = match session.highlight_for(&tag.room_id, tag.floor).emissive() {
            Some((color, intensity)) => {
                let c = srgb(color).to_linear();
                LinearRgba::rgb(c.red * intensity, c.green * intensity, c.blue * intensity)
            }
            None => LinearRgba::BLACK,
        };
        if material.emissive != emissive {
            material.emissive = emissive;
        }
    }
    *last = Some(current.clone());
}
