//! Floor geometry builders.
//!
//! Both modes build from the same plan through the same
//! [`CoordinateMapper`]:
//! - [`BlockBuilder`]: stack mode, one solid block per room.
//! - [`WallBuilder`]: interior mode, deduplicated walls, pickable room
//!   floors, a ceiling and per-room labels.
//!
//! The roof is identical in both modes and built by [`build_roof`].

use glam::Vec3;

use crate::constants::{colors, heights, labels};
use crate::error::PlanError;
use crate::mapping::CoordinateMapper;
use crate::plan::{Plan, Rgb};
use crate::scene::{
    Finish, FloorNodes, MaterialSpec, NodeId, NodeRole, RoofNodes, SceneGraph, Shape,
};
use crate::view::ViewMode;
use crate::walls::{extract_segments, wall_box, WallSegment};

/// Builds the contents of one floor group for a given mode.
pub trait FloorGeometryBuilder {
    fn mode(&self) -> ViewMode;

    /// Add floor `floor_index` under `parent` and return its toggleable parts.
    fn build_floor(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        floor_index: usize,
    ) -> Result<FloorNodes, PlanError>;
}

/// Pick the builder for `mode`.
pub fn builder_for<'a>(
    mode: ViewMode,
    plan: &'a Plan,
    mapper: &'a CoordinateMapper,
) -> Result<Box<dyn FloorGeometryBuilder + 'a>, PlanError> {
    Ok(match mode {
        ViewMode::Stack => Box::new(BlockBuilder::new(plan, mapper)),
        ViewMode::Interior => Box::new(WallBuilder::new(plan, mapper)?),
    })
}

fn cuboid(size: Vec3, color: Rgb, finish: Finish) -> Shape {
    Shape::Cuboid {
        size,
        material: MaterialSpec::new(color, finish),
    }
}

fn label(text: impl Into<String>) -> Shape {
    Shape::Label { text: text.into() }
}

/// Footprint-sized box of `height` centred at `y`.
fn footprint_box(mapper: &CoordinateMapper, plan: &Plan, height: f32) -> Vec3 {
    let (w, d) = mapper.rect_size(&plan.footprint);
    Vec3::new(w, height, d)
}

/// Floor labels sit near the back edge of the footprint.
fn back_edge_z(mapper: &CoordinateMapper, plan: &Plan) -> f32 {
    -mapper.length(plan.footprint.h) * labels::BACK_EDGE_FRACTION
}

fn add_slab(graph: &mut SceneGraph, group: NodeId, plan: &Plan, mapper: &CoordinateMapper) {
    graph.add(
        Some(group),
        NodeRole::Slab,
        cuboid(
            footprint_box(mapper, plan, heights::SLAB_THICKNESS),
            Rgb(colors::SLAB),
            Finish::Slab,
        ),
        Vec3::new(0.0, heights::SLAB_THICKNESS / 2.0, 0.0),
    );
}

pub struct BlockBuilder<'a> {
    plan: &'a Plan,
    mapper: &'a CoordinateMapper,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(plan: &'a Plan, mapper: &'a CoordinateMapper) -> Self {
        Self { plan, mapper }
    }
}

impl FloorGeometryBuilder for BlockBuilder<'_> {
    fn mode(&self) -> ViewMode {
        ViewMode::Stack
    }

    fn build_floor(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        floor_index: usize,
    ) -> Result<FloorNodes, PlanError> {
        let (plan, mapper) = (self.plan, self.mapper);
        let group = graph.add_group(Some(parent), NodeRole::Floor { index: floor_index });

        add_slab(graph, group, plan, mapper);
        graph.add(
            Some(group),
            NodeRole::Outline,
            cuboid(
                footprint_box(mapper, plan, heights::OUTLINE),
                Rgb(colors::OUTLINE),
                Finish::Outline,
            ),
            Vec3::new(0.0, heights::OUTLINE / 2.0, 0.0),
        );

        let block_y = heights::SLAB_THICKNESS + heights::ROOM_BLOCK / 2.0;
        for room in &plan.rooms {
            let rect = room.rect();
            let (w, d) = mapper.rect_size(&rect);
            graph.add(
                Some(group),
                NodeRole::RoomBlock {
                    room_id: room.id.clone(),
                },
                cuboid(Vec3::new(w, heights::ROOM_BLOCK, d), room.color, Finish::Matte),
                mapper.rect_center(&rect, block_y),
            );
        }

        let floor_label = graph.add(
            Some(group),
            NodeRole::Label,
            label(format!("Floor {}", floor_index + 1)),
            Vec3::new(
                0.0,
                heights::SLAB_THICKNESS + heights::ROOM_BLOCK + labels::STACK_FLOOR_LIFT,
                back_edge_z(mapper, plan),
            ),
        );

        Ok(FloorNodes {
            group,
            walls: None,
            ceiling: None,
            labels: vec![floor_label],
        })
    }
}

pub struct WallBuilder<'a> {
    plan: &'a Plan,
    mapper: &'a CoordinateMapper,
    segments: Vec<WallSegment>,
}

impl<'a> WallBuilder<'a> {
    /// Extracts the wall segments once; every floor reuses them.
    pub fn new(plan: &'a Plan, mapper: &'a CoordinateMapper) -> Result<Self, PlanError> {
        let segments = extract_segments(&plan.footprint, &plan.rooms)?;
        log::info!("Interior walls: {} unique segments", segments.len());
        Ok(Self {
            plan,
            mapper,
            segments,
        })
    }

    pub fn segments(&self) -> &[WallSegment] {
        &self.segments
    }
}

impl FloorGeometryBuilder for WallBuilder<'_> {
    fn mode(&self) -> ViewMode {
        ViewMode::Interior
    }

    fn build_floor(
        &self,
        graph: &mut SceneGraph,
        parent: NodeId,
        floor_index: usize,
    ) -> Result<FloorNodes, PlanError> {
        let (plan, mapper) = (self.plan, self.mapper);
        let group = graph.add_group(Some(parent), NodeRole::Floor { index: floor_index });
        add_slab(graph, group, plan, mapper);

        // Room floors, tagged for picking
        let room_floors = graph.add_group(Some(group), NodeRole::RoomFloors);
        let floor_y = heights::SLAB_THICKNESS + heights::ROOM_FLOOR / 2.0;
        for room in &plan.rooms {
            let rect = room.rect();
            let (w, d) = mapper.rect_size(&rect);
            graph.add(
                Some(room_floors),
                NodeRole::RoomFloor {
                    room_id: room.id.clone(),
                    floor: floor_index,
                },
                cuboid(Vec3::new(w, heights::ROOM_FLOOR, d), room.color, Finish::RoomFloor),
                mapper.rect_center(&rect, floor_y),
            );
        }

        let walls = graph.add_group(Some(group), NodeRole::Walls);
        for seg in &self.segments {
            let b = wall_box(seg, mapper, heights::SLAB_THICKNESS);
            graph.add(
                Some(walls),
                NodeRole::Wall,
                cuboid(b.size, Rgb(colors::WALL), Finish::Wall),
                b.center,
            );
        }

        let wall_top = heights::SLAB_THICKNESS + heights::WALL;
        let ceiling = graph.add(
            Some(group),
            NodeRole::Ceiling,
            cuboid(
                footprint_box(mapper, plan, heights::CEILING),
                Rgb(colors::CEILING),
                Finish::Ceiling,
            ),
            Vec3::new(0.0, wall_top + heights::CEILING_CLEARANCE, 0.0),
        );
        graph.set_visible(ceiling, false);

        let label_group = graph.add_group(Some(group), NodeRole::Labels);
        for room in &plan.rooms {
            graph.add(
                Some(label_group),
                NodeRole::Label,
                label(room.label.clone()),
                mapper.rect_center(&room.rect(), wall_top + labels::ROOM_LIFT),
            );
        }
        graph.add(
            Some(label_group),
            NodeRole::Label,
            label(format!("Floor {}", floor_index + 1)),
            Vec3::new(
                0.0,
                wall_top + labels::INTERIOR_FLOOR_LIFT,
                back_edge_z(mapper, plan),
            ),
        );

        Ok(FloorNodes {
            group,
            walls: Some(walls),
            ceiling: Some(ceiling),
            labels: vec![label_group],
        })
    }
}

/// Roof deck, sign and label. Same structure for both modes.
pub fn build_roof(
    graph: &mut SceneGraph,
    parent: NodeId,
    plan: &Plan,
    mapper: &CoordinateMapper,
) -> RoofNodes {
    let roof = &plan.roof;
    let group = graph.add_group(Some(parent), NodeRole::Roof);

    graph.add(
        Some(group),
        NodeRole::RoofDeck,
        cuboid(
            footprint_box(mapper, plan, heights::ROOF_DECK),
            roof.deck_color,
            Finish::Slab,
        ),
        Vec3::new(0.0, heights::ROOF_DECK / 2.0, 0.0),
    );

    let (w, d) = mapper.rect_size(&roof.sign);
    graph.add(
        Some(group),
        NodeRole::RoofSign,
        cuboid(Vec3::new(w, heights::ROOF_SIGN, d), roof.sign_color, Finish::Matte),
        mapper.rect_center(&roof.sign, heights::ROOF_SIGN_CENTER),
    );

    let label = graph.add(
        Some(group),
        NodeRole::Label,
        label(roof.label.clone()),
        Vec3::new(0.0, labels::ROOF_LABEL_HEIGHT, back_edge_z(mapper, plan)),
    );

    RoofNodes { group, label }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLAN_SCALE;

    fn setup() -> (Plan, CoordinateMapper) {
        let plan = Plan::builtin().unwrap();
        let mapper = CoordinateMapper::for_footprint(&plan.footprint);
        (plan, mapper)
    }

    fn shapes_with_role<'g>(
        graph: &'g SceneGraph,
        under: NodeId,
        pred: impl Fn(&NodeRole) -> bool,
    ) -> Vec<&'g crate::scene::SceneNode> {
        graph
            .descendants(under)
            .into_iter()
            .map(|id| graph.node(id))
            .filter(|n| pred(&n.role))
            .collect()
    }

    #[test]
    fn block_builder_one_block_per_room() {
        let (plan, mapper) = setup();
        let mut g = SceneGraph::new();
        let root = g.add_group(None, NodeRole::Root(ViewMode::Stack));
        let b = BlockBuilder::new(&plan, &mapper);
        assert_eq!(b.mode(), ViewMode::Stack);
        let floor = b.build_floor(&mut g, root, 2).unwrap();

        let blocks = shapes_with_role(&g, floor.group, |r| matches!(r, NodeRole::RoomBlock { .. }));
        assert_eq!(blocks.len(), plan.rooms.len());
        for n in &blocks {
            // Blocks sit on top of the slab.
            let Shape::Cuboid { size, .. } = &n.shape else {
                panic!("block without cuboid");
            };
            let bottom = n.translation.y - size.y / 2.0;
            assert!((bottom - heights::SLAB_THICKNESS).abs() < 1e-4);
        }
        assert!(floor.walls.is_none());
        assert_eq!(floor.labels.len(), 1);
        assert_eq!(
            g.node(floor.labels[0]).shape,
            Shape::Label {
                text: "Floor 3".into()
            }
        );
    }

    #[test]
    fn wall_builder_tags_room_floors() {
        let (plan, mapper) = setup();
        let mut g = SceneGraph::new();
        let root = g.add_group(None, NodeRole::Root(ViewMode::Interior));
        let b = WallBuilder::new(&plan, &mapper).unwrap();
        assert_eq!(b.segments().len(), 44);
        let floor = b.build_floor(&mut g, root, 0).unwrap();

        let floors = shapes_with_role(&g, floor.group, |r| matches!(r, NodeRole::RoomFloor { .. }));
        assert_eq!(floors.len(), plan.rooms.len());
        let bed1 = floors
            .iter()
            .find(|n| matches!(&n.role, NodeRole::RoomFloor { room_id, .. } if room_id == "bed1"))
            .unwrap();
        let Shape::Cuboid { size, material } = &bed1.shape else {
            panic!("room floor without cuboid");
        };
        assert!((size.x - 270.0 * PLAN_SCALE).abs() < 1e-4);
        assert!((size.z - 160.0 * PLAN_SCALE).abs() < 1e-4);
        assert_eq!(material.finish, Finish::RoomFloor);

        let ceiling = floor.ceiling.unwrap();
        assert!(!g.node(ceiling).visible);
        assert!(g.node(floor.walls.unwrap()).children.len() == 44);
    }

    #[test]
    fn roof_sign_uses_shared_mapper() {
        let (plan, mapper) = setup();
        let mut g = SceneGraph::new();
        let root = g.add_group(None, NodeRole::Root(ViewMode::Stack));
        let roof = build_roof(&mut g, root, &plan, &mapper);
        let sign = shapes_with_role(&g, roof.group, |r| *r == NodeRole::RoofSign);
        assert_eq!(sign.len(), 1);
        let expected = mapper.rect_center(&plan.roof.sign, heights::ROOF_SIGN_CENTER);
        assert!((sign[0].translation - expected).length() < 1e-4);
    }
}
