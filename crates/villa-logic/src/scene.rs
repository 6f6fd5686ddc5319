//! Renderer-neutral scene graph and the scene composer.
//!
//! The composer builds every floor of both modes once, under two parallel
//! roots, and never rebuilds them: view changes only flip `visible` flags and
//! rewrite translations (see [`crate::view::apply_view`]). The Bevy viewer
//! mirrors this graph into entities one-to-one.
//!
//! Nodes carry translation only (no rotation or scale), so a node's world
//! position is the sum of its ancestors' translations.

use glam::Vec3;

use crate::builders::{build_roof, builder_for};
use crate::constants::CEILING_OPACITY;
use crate::error::PlanError;
use crate::mapping::CoordinateMapper;
use crate::plan::{Plan, Rgb};
use crate::view::{apply_view, ViewMode, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Surface treatment; together with a color it identifies a shared material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finish {
    /// Room blocks, roof sign.
    Matte,
    Slab,
    Outline,
    Wall,
    /// Translucent.
    Ceiling,
    /// Pickable floor of one room; never shared so it can be tinted alone.
    RoomFloor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialSpec {
    pub color: Rgb,
    pub finish: Finish,
}

impl MaterialSpec {
    pub fn new(color: Rgb, finish: Finish) -> Self {
        Self { color, finish }
    }

    pub fn roughness(&self) -> f32 {
        match self.finish {
            Finish::Matte => 0.9,
            Finish::Slab | Finish::RoomFloor => 0.95,
            Finish::Outline => 1.0,
            Finish::Wall => 0.92,
            Finish::Ceiling => 0.98,
        }
    }

    pub fn metallic(&self) -> f32 {
        match self.finish {
            Finish::Matte => 0.05,
            Finish::Slab | Finish::RoomFloor | Finish::Wall => 0.02,
            Finish::Outline | Finish::Ceiling => 0.0,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.finish {
            Finish::Ceiling => CEILING_OPACITY,
            _ => 1.0,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.finish != Finish::RoomFloor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Pure container.
    Group,
    /// Axis-aligned box centred on the node translation.
    Cuboid { size: Vec3, material: MaterialSpec },
    /// Camera-facing text anchored at the node translation.
    Label { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeRole {
    Root(ViewMode),
    Floor { index: usize },
    Roof,
    Slab,
    Outline,
    RoomBlock { room_id: String },
    RoomFloors,
    RoomFloor { room_id: String, floor: usize },
    Walls,
    Wall,
    Ceiling,
    Labels,
    Label,
    RoofDeck,
    RoofSign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub role: NodeRole,
    pub shape: Shape,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub translation: Vec3,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visible node under `parent`.
    pub fn add(
        &mut self,
        parent: Option<NodeId>,
        role: NodeRole,
        shape: Shape,
        translation: Vec3,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            role,
            shape,
            parent,
            children: Vec::new(),
            translation,
            visible: true,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    pub fn add_group(&mut self, parent: Option<NodeId>, role: NodeRole) -> NodeId {
        self.add(parent, role, Shape::Group, Vec3::ZERO)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Nodes in creation order; parents always precede their children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn set_height(&mut self, id: NodeId, y: f32) {
        self.nodes[id.0].translation.y = y;
    }

    /// Visible itself and through every ancestor.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let node = &self.nodes[c.0];
            if !node.visible {
                return false;
            }
            cur = node.parent;
        }
        true
    }

    pub fn world_translation(&self, id: NodeId) -> Vec3 {
        let mut cur = Some(id);
        let mut acc = Vec3::ZERO;
        while let Some(c) = cur {
            let node = &self.nodes[c.0];
            acc += node.translation;
            cur = node.parent;
        }
        acc
    }

    /// All descendants of `id` (depth-first, excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }
}

/// Toggleable parts of one floor group.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorNodes {
    pub group: NodeId,
    pub walls: Option<NodeId>,
    pub ceiling: Option<NodeId>,
    /// Label nodes or label containers governed by the labels toggle.
    pub labels: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoofNodes {
    pub group: NodeId,
    pub label: NodeId,
}

/// One mode's root and its floor/roof groups.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeRoot {
    pub mode: ViewMode,
    pub root: NodeId,
    pub floors: Vec<FloorNodes>,
    pub roof: RoofNodes,
}

/// The composed scene: graph plus handles into both mode roots.
#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: SceneGraph,
    pub stack: ModeRoot,
    pub interior: ModeRoot,
    pub mapper: CoordinateMapper,
}

impl Scene {
    /// Build both modes for every floor and apply `view`.
    pub fn compose(plan: &Plan, view: &ViewState) -> Result<Self, PlanError> {
        plan.validate()?;
        let mapper = CoordinateMapper::for_footprint(&plan.footprint);
        let mut graph = SceneGraph::new();

        let stack = compose_mode(&mut graph, plan, &mapper, ViewMode::Stack)?;
        let interior = compose_mode(&mut graph, plan, &mapper, ViewMode::Interior)?;

        let mut scene = Self {
            graph,
            stack,
            interior,
            mapper,
        };
        apply_view(view, &mut scene);
        log::info!(
            "Composed scene: {} nodes, {} floors per mode",
            scene.graph.len(),
            plan.floor_count
        );
        Ok(scene)
    }

    pub fn root(&self, mode: ViewMode) -> &ModeRoot {
        match mode {
            ViewMode::Stack => &self.stack,
            ViewMode::Interior => &self.interior,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.stack.floors.len()
    }

    /// Currently visible mode root, if exactly one is shown.
    pub fn active_mode(&self) -> Option<ViewMode> {
        let s = self.graph.node(self.stack.root).visible;
        let i = self.graph.node(self.interior.root).visible;
        match (s, i) {
            (true, false) => Some(ViewMode::Stack),
            (false, true) => Some(ViewMode::Interior),
            _ => None,
        }
    }
}

fn compose_mode(
    graph: &mut SceneGraph,
    plan: &Plan,
    mapper: &CoordinateMapper,
    mode: ViewMode,
) -> Result<ModeRoot, PlanError> {
    let root = graph.add_group(None, NodeRole::Root(mode));
    let builder = builder_for(mode, plan, mapper)?;
    let floors = (0..plan.floor_count)
        .map(|i| builder.build_floor(graph, root, i))
        .collect::<Result<Vec<_>, _>>()?;
    let roof = build_roof(graph, root, plan, mapper);
    Ok(ModeRoot {
        mode,
        root,
        floors,
        roof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_translation_accumulates() {
        let mut g = SceneGraph::new();
        let a = g.add(None, NodeRole::Roof, Shape::Group, Vec3::new(0.0, 10.0, 0.0));
        let b = g.add(Some(a), NodeRole::Slab, Shape::Group, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(g.world_translation(b), Vec3::new(1.0, 12.0, 3.0));
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut g = SceneGraph::new();
        let a = g.add_group(None, NodeRole::Roof);
        let b = g.add_group(Some(a), NodeRole::Labels);
        let c = g.add_group(Some(b), NodeRole::Label);
        assert!(g.is_effectively_visible(c));
        g.set_visible(a, false);
        assert!(!g.is_effectively_visible(c));
        assert!(g.node(c).visible);
        assert_eq!(g.descendants(a), vec![b, c]);
    }

    #[test]
    fn compose_builds_both_modes() {
        let plan = Plan::builtin().unwrap();
        let scene = Scene::compose(&plan, &ViewState::default()).unwrap();
        assert_eq!(scene.stack.floors.len(), 4);
        assert_eq!(scene.interior.floors.len(), 4);
        assert_eq!(scene.active_mode(), Some(ViewMode::Stack));

        let room_floors = scene
            .graph
            .iter()
            .filter(|(_, n)| matches!(n.role, NodeRole::RoomFloor { .. }))
            .count();
        assert_eq!(room_floors, 4 * plan.rooms.len());

        // 44 unique segments per interior floor for the villa plan.
        let walls = scene
            .graph
            .iter()
            .filter(|(_, n)| n.role == NodeRole::Wall)
            .count();
        assert_eq!(walls, 4 * 44);
    }

    #[test]
    fn only_room_floor_materials_are_unique() {
        let floor = MaterialSpec::new(Rgb(1), Finish::RoomFloor);
        let wall = MaterialSpec::new(Rgb(1), Finish::Wall);
        assert!(!floor.is_shared());
        assert!(wall.is_shared());
        assert!(MaterialSpec::new(Rgb(1), Finish::Ceiling).opacity() < 1.0);
    }
}
