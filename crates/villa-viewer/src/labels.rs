//! Camera-facing text labels.
//!
//! Every `Label` node in the scene graph gets a UI text entity that is
//! re-projected to screen space each frame and hidden whenever its node is
//! not visible through all of its ancestors.

use bevy::prelude::*;
use villa_logic::scene::Shape;

use crate::state::{LabelAnchor, MainCamera, ViewerSession};

pub fn spawn_labels(mut commands: Commands, session: Res<ViewerSession>) {
    let graph = &session.scene().graph;
    let mut count = 0;
    for (id, node) in graph.iter() {
        let Shape::Label { text } = &node.shape else {
            continue;
        };
        commands.spawn((
            Text::new(text.clone()),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgba(0.92, 0.94, 1.0, 0.95)),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            LabelAnchor(id),
        ));
        count += 1;
    }
    info!("Spawned {} labels", count);
}

pub fn update_labels(
    session: Res<ViewerSession>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut labels: Query<(&LabelAnchor, &ComputedNode, &mut Node, &mut Visibility)>,
) {
    let Ok((camera, cam_tf)) = camera_q.get_single() else {
        return;
    };
    let graph = &session.scene().graph;

    for (anchor, computed, mut node, mut vis) in &mut labels {
        let screen = if graph.is_effectively_visible(anchor.0) {
            camera
                .world_to_viewport(cam_tf, graph.world_translation(anchor.0))
                .ok()
        } else {
            None
        };
        match screen {
            Some(p) => {
                let half = computed.size() * computed.inverse_scale_factor() / 2.0;
                node.left = Val::Px(p.x - half.x);
                node.top = Val::Px(p.y - half.y);
                vis.set_if_neq(Visibility::Inherited);
            }
            None => {
                vis.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
