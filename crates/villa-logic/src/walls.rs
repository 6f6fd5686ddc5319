//! Wall-segment extraction for interior mode.
//!
//! Every room edge and every footprint edge becomes a candidate segment.
//! Each candidate is normalized to a canonical key (orientation, fixed axis
//! coordinate and ordered interval, quantized to 1/100 plan unit), and
//! identical keys collapse to one wall. Matching is exact on the key,
//! never overlap-based: two rooms sharing an edge get one wall, not a
//! double-thickness one.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::Serialize;

use crate::constants::{heights, WALL_THICKNESS_PLAN};
use crate::error::PlanError;
use crate::mapping::CoordinateMapper;
use crate::plan::{Rect, Room};

/// Quantization steps per plan unit.
const QUANTUM: f64 = 100.0;

fn quantize(v: f32) -> i64 {
    (f64::from(v) * QUANTUM).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Orientation {
    /// Constant plan Y, runs along X.
    Horizontal,
    /// Constant plan X, runs along Y.
    Vertical,
}

/// Canonical dedup key: `(orientation, axis, min, max)` in quantized units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub orientation: Orientation,
    pub axis: i64,
    pub start: i64,
    pub end: i64,
}

/// An axis-aligned wall run in plan space with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallSegment {
    pub orientation: Orientation,
    /// Y for horizontal segments, X for vertical ones.
    pub axis: f32,
    pub start: f32,
    pub end: f32,
}

impl WallSegment {
    /// Normalize an edge. Non-axis-aligned or zero-length edges are a data
    /// contract violation.
    pub fn from_edge(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, PlanError> {
        let same_y = quantize(y1) == quantize(y2);
        let same_x = quantize(x1) == quantize(x2);
        match (same_x, same_y) {
            (true, true) => Err(PlanError::DegenerateEdge { x: x1, y: y1 }),
            (false, true) => Ok(Self {
                orientation: Orientation::Horizontal,
                axis: y1,
                start: x1.min(x2),
                end: x1.max(x2),
            }),
            (true, false) => Ok(Self {
                orientation: Orientation::Vertical,
                axis: x1,
                start: y1.min(y2),
                end: y1.max(y2),
            }),
            (false, false) => Err(PlanError::DiagonalEdge { x1, y1, x2, y2 }),
        }
    }

    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            orientation: self.orientation,
            axis: quantize(self.axis),
            start: quantize(self.start),
            end: quantize(self.end),
        }
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Midpoint in plan space.
    pub fn midpoint(&self) -> (f32, f32) {
        let mid = (self.start + self.end) / 2.0;
        match self.orientation {
            Orientation::Horizontal => (mid, self.axis),
            Orientation::Vertical => (self.axis, mid),
        }
    }
}

/// Deduplicating segment collection. Iteration order is the key order, so
/// the result does not depend on insertion order.
#[derive(Debug, Default, Clone)]
pub struct SegmentSet {
    segments: BTreeMap<SegmentKey, WallSegment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one edge; returns `false` when an identical segment exists.
    pub fn insert_edge(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<bool, PlanError> {
        let seg = WallSegment::from_edge(x1, y1, x2, y2)?;
        let key = seg.key();
        if self.segments.contains_key(&key) {
            return Ok(false);
        }
        self.segments.insert(key, seg);
        Ok(true)
    }

    pub fn insert_rect(&mut self, rect: &Rect) -> Result<(), PlanError> {
        for (x1, y1, x2, y2) in rect.edges() {
            self.insert_edge(x1, y1, x2, y2)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WallSegment> {
        self.segments.values()
    }

    pub fn into_vec(self) -> Vec<WallSegment> {
        self.segments.into_values().collect()
    }
}

/// Footprint perimeter plus every room's four edges, deduplicated.
pub fn extract_segments(footprint: &Rect, rooms: &[Room]) -> Result<Vec<WallSegment>, PlanError> {
    let mut set = SegmentSet::new();
    set.insert_rect(footprint)?;
    for room in rooms {
        set.insert_rect(&room.rect())?;
    }
    log::debug!(
        "Extracted {} wall segments from {} edges",
        set.len(),
        4 * (rooms.len() + 1)
    );
    Ok(set.into_vec())
}

/// World-space box for one wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBox {
    pub center: Vec3,
    pub size: Vec3,
}

/// Wall volume for `seg`, standing on `base_y`, centred on the segment
/// midpoint. Thickness and height are fixed.
pub fn wall_box(seg: &WallSegment, mapper: &CoordinateMapper, base_y: f32) -> WallBox {
    let (mx, my) = seg.midpoint();
    let len = mapper.length(seg.length());
    let thickness = mapper.length(WALL_THICKNESS_PLAN);
    let size = match seg.orientation {
        Orientation::Horizontal => Vec3::new(len, heights::WALL, thickness),
        Orientation::Vertical => Vec3::new(thickness, heights::WALL, len),
    };
    WallBox {
        center: mapper.to_world(mx, my, base_y + heights::WALL / 2.0),
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Rgb;

    fn room(id: &str, x: f32, y: f32, w: f32, h: f32) -> Room {
        Room {
            id: id.into(),
            x,
            y,
            w,
            h,
            color: Rgb(0),
            label: id.into(),
        }
    }

    #[test]
    fn reversed_edge_normalizes_to_same_key() {
        let a = WallSegment::from_edge(10.0, 5.0, 30.0, 5.0).unwrap();
        let b = WallSegment::from_edge(30.0, 5.0, 10.0, 5.0).unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.start, 10.0);
        assert_eq!(a.end, 30.0);
    }

    #[test]
    fn diagonal_edge_fails_fast() {
        let err = WallSegment::from_edge(0.0, 0.0, 10.0, 10.0).unwrap_err();
        assert!(matches!(err, PlanError::DiagonalEdge { .. }));
    }

    #[test]
    fn zero_length_edge_rejected() {
        let err = WallSegment::from_edge(3.0, 3.0, 3.0, 3.0).unwrap_err();
        assert!(matches!(err, PlanError::DegenerateEdge { .. }));
    }

    #[test]
    fn shared_edge_produces_one_segment() {
        // Two 10×10 rooms side by side share x = 10 from y 0..10.
        let fp = Rect::new(0.0, 0.0, 20.0, 10.0);
        let rooms = [room("a", 0.0, 0.0, 10.0, 10.0), room("b", 10.0, 0.0, 10.0, 10.0)];
        let segs = extract_segments(&fp, &rooms).unwrap();

        let shared: Vec<_> = segs
            .iter()
            .filter(|s| s.orientation == Orientation::Vertical && s.axis == 10.0)
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!((shared[0].start, shared[0].end), (0.0, 10.0));

        // Footprint: 4; room edges flush with the footprint (left of a,
        // right of b) collapse, the partial top/bottom edges stay.
        // Unique: fp top, fp bottom, fp left, fp right, a top, a bottom,
        // b top, b bottom, shared middle.
        assert_eq!(segs.len(), 9);
    }

    #[test]
    fn room_flush_with_footprint_collapses() {
        let fp = Rect::new(0.0, 0.0, 10.0, 10.0);
        let segs = extract_segments(&fp, &[room("full", 0.0, 0.0, 10.0, 10.0)]).unwrap();
        assert_eq!(segs.len(), 4);
    }

    #[test]
    fn overlapping_but_unequal_edges_are_kept() {
        // Exact matching only: a shorter collinear edge is its own segment.
        let mut set = SegmentSet::new();
        assert!(set.insert_edge(0.0, 0.0, 10.0, 0.0).unwrap());
        assert!(set.insert_edge(0.0, 0.0, 5.0, 0.0).unwrap());
        assert!(!set.insert_edge(10.0, 0.0, 0.0, 0.0).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn quantization_absorbs_float_noise() {
        let mut set = SegmentSet::new();
        assert!(set.insert_edge(0.0, 0.1 + 0.2, 10.0, 0.1 + 0.2).unwrap());
        assert!(!set.insert_edge(0.0, 0.3, 10.0, 0.3).unwrap());
    }

    #[test]
    fn extraction_is_order_independent_and_idempotent() {
        let fp = Rect::new(0.0, 0.0, 30.0, 20.0);
        let mut rooms = vec![
            room("a", 0.0, 0.0, 10.0, 20.0),
            room("b", 10.0, 0.0, 20.0, 10.0),
            room("c", 10.0, 10.0, 20.0, 10.0),
        ];
        let first = extract_segments(&fp, &rooms).unwrap();
        let again = extract_segments(&fp, &rooms).unwrap();
        assert_eq!(first, again);

        rooms.reverse();
        let reversed = extract_segments(&fp, &rooms).unwrap();
        assert_eq!(first, reversed);

        rooms.swap(0, 1);
        assert_eq!(first, extract_segments(&fp, &rooms).unwrap());
    }

    #[test]
    fn wall_box_centered_on_midpoint() {
        let fp = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mapper = CoordinateMapper::for_footprint(&fp);
        let seg = WallSegment::from_edge(0.0, 0.0, 100.0, 0.0).unwrap();
        let b = wall_box(&seg, &mapper, 4.0);
        assert!((b.center.x - 0.0).abs() < 1e-4);
        assert!((b.center.z - mapper.to_world_z(0.0)).abs() < 1e-4);
        assert!((b.center.y - (4.0 + heights::WALL / 2.0)).abs() < 1e-4);
        assert!((b.size.x - 100.0 * mapper.scale()).abs() < 1e-4);
        assert!((b.size.z - WALL_THICKNESS_PLAN * mapper.scale()).abs() < 1e-4);

        let v = WallSegment::from_edge(50.0, 0.0, 50.0, 40.0).unwrap();
        let vb = wall_box(&v, &mapper, 0.0);
        assert!((vb.size.z - 40.0 * mapper.scale()).abs() < 1e-4);
        assert!((vb.size.x - WALL_THICKNESS_PLAN * mapper.scale()).abs() < 1e-4);
    }
}
