//! Mirrors the logic crate's scene graph into Bevy entities.
//!
//! Geometry is spawned once at startup. Afterwards only visibility and
//! translations are copied over, and only when the session reports a new
//! scene revision.

use std::collections::HashMap;

use bevy::prelude::*;
use villa_logic::plan::Rgb;
use villa_logic::scene::{MaterialSpec, NodeRole, Shape};

use crate::state::{RoomFloorTag, SceneNodeLink, ViewerSession};

pub fn srgb(c: Rgb) -> Color {
    Color::srgb_u8(c.r(), c.g(), c.b())
}

fn standard_material(spec: &MaterialSpec) -> StandardMaterial {
    let opacity = spec.opacity();
    StandardMaterial {
        base_color: srgb(spec.color).with_alpha(opacity),
        perceptual_roughness: spec.roughness(),
        metallic: spec.metallic(),
        alpha_mode: if opacity < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        emissive: LinearRgba::BLACK,
        ..default()
    }
}

/// Shared materials keyed by (color, finish). Room floors bypass the cache.
#[derive(Default)]
struct MaterialCache {
    shared: HashMap<MaterialSpec, Handle<StandardMaterial>>,
}

impl MaterialCache {
    fn get(
        &mut self,
        spec: &MaterialSpec,
        materials: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        if !spec.is_shared() {
            return materials.add(standard_material(spec));
        }
        self.shared
            .entry(*spec)
            .or_insert_with(|| materials.add(standard_material(spec)))
            .clone()
    }
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Spawn one entity per scene node, parented like the graph.
pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<ViewerSession>,
) {
    let graph = &session.scene().graph;
    let mut cache = MaterialCache::default();
    let mut entities: Vec<Entity> = Vec::with_capacity(graph.len());

    for (id, node) in graph.iter() {
        let mut cmd = commands.spawn((
            Transform::from_translation(node.translation),
            visibility(node.visible),
            SceneNodeLink(id),
        ));
        if let Shape::Cuboid { size, material } = &node.shape {
            cmd.insert((
                Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
                MeshMaterial3d(cache.get(material, &mut materials)),
            ));
        }
        if let NodeRole::RoomFloor { room_id, floor } = &node.role {
            cmd.insert(RoomFloorTag {
                room_id: room_id.clone(),
                floor: *floor,
            });
        }
        let entity = cmd.id();
        if let Some(parent) = node.parent.and_then(|p| entities.get(p.0).copied()) {
            commands.entity(parent).add_child(entity);
        }
        entities.push(entity);
    }

    info!(
        "Spawned {} scene entities ({} shared materials)",
        entities.len(),
        cache.shared.len()
    );
}

/// Copy visibility and translation from the graph after a view change.
pub fn sync_scene(
    session: Res<ViewerSession>,
    mut synced: Local<Option<u64>>,
    mut nodes: Query<(&SceneNodeLink, &mut Transform, &mut Visibility)>,
) {
    let revision = session.scene_revision();
    if *synced == Some(revision) {
        return;
    }
    let graph = &session.scene().graph;
    for (link, mut transform, mut vis) in &mut nodes {
        let Some(node) = graph.get(link.0) else {
            continue;
        };
        transform.translation = node.translation;
        vis.set_if_neq(visibility(node.visible));
    }
    *synced = Some(revision);
}
