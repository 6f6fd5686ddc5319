//! Plan model: the declarative floor-plan data every floor is built from.
//!
//! Rectangles are in plan space (the coordinate system of the drawn plans,
//! Y pointing down the page). The same footprint and room list is used for
//! every floor; the roof has its own small description.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Built-in dataset shipped with the viewer.
const VILLA_PLAN_JSON: &str = include_str!("../../../data/villa_plan.json");

/// A 24-bit sRGB color, serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl FromStr for Rgb {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(PlanError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| PlanError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Axis-aligned rectangle: origin `(x, y)` is the top-left corner in plan space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn max_side(&self) -> f32 {
        self.w.max(self.h)
    }

    /// The four edges as `(x1, y1, x2, y2)`: top, bottom, left, right.
    pub fn edges(&self) -> [(f32, f32, f32, f32); 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.w, self.y + self.h);
        [
            (x0, y0, x1, y0),
            (x0, y1, x1, y1),
            (x0, y0, x0, y1),
            (x1, y0, x1, y1),
        ]
    }

    fn validate(&self, id: &str) -> Result<(), PlanError> {
        if ![self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) {
            return Err(PlanError::NonFinite { id: id.to_string() });
        }
        if self.w <= 0.0 || self.h <= 0.0 {
            return Err(PlanError::InvalidDimensions {
                id: id.to_string(),
                w: self.w,
                h: self.h,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgb,
    pub label: String,
}

impl Room {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSpec {
    pub label: String,
    pub deck_color: Rgb,
    /// Sign box footprint, in the same plan space as the floors.
    pub sign: Rect,
    pub sign_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub floor_count: usize,
    pub footprint: Rect,
    pub rooms: Vec<Room>,
    pub roof: RoofSpec,
}

impl Plan {
    /// The villa dataset compiled into the binary.
    pub fn builtin() -> Result<Self, PlanError> {
        Self::from_json_str(VILLA_PLAN_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let plan: Plan = serde_json::from_str(json)?;
        plan.validate()?;
        log::info!(
            "Loaded plan '{}': {} floors, {} rooms",
            plan.name,
            plan.floor_count,
            plan.rooms.len()
        );
        Ok(plan)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the data contract: at least one floor, finite positive
    /// rectangles, unique room ids.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.floor_count == 0 {
            return Err(PlanError::NoFloors);
        }
        self.footprint.validate("footprint")?;
        self.roof.sign.validate("roof sign")?;

        let mut seen = HashSet::new();
        for room in &self.rooms {
            room.rect().validate(&room.id)?;
            if !seen.insert(room.id.as_str()) {
                return Err(PlanError::DuplicateRoomId(room.id.clone()));
            }
        }
        Ok(())
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }
}
