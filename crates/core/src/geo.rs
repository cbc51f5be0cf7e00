//! Fixed-point geographic primitives.
//!
//! Coordinates and bounding boxes are expressed in micro-degrees
//! (1e-6 of a degree) as signed 32-bit integers, matching the wire
//! representation of the upstream transit APIs. Containment tests are
//! inclusive on every edge.

use serde::{Deserialize, Serialize};

/// A point on the globe in micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: i32,
    pub longitude: i32,
}

impl Coordinates {
    pub const fn new(latitude: i32, longitude: i32) -> Self {
        Self { latitude, longitude }
    }
}

/// An axis-aligned bounding box in micro-degrees.
///
/// The normalized form has `west <= east` and `south <= north`. Callers
/// normalize before comparing boxes; [`BoundingBox::normalized`] is
/// idempotent so applying it twice is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: i32,
    pub east: i32,
    pub south: i32,
    pub north: i32,
}

impl BoundingBox {
    /// The full valid latitude/longitude range.
    ///
    /// Used as the coverage value for upstream APIs that have no spatial
    /// filter: after a successful full fetch the whole world counts as
    /// explored.
    pub const WORLD: Self = Self { west: -180_000_000, east: 180_000_000, south: -90_000_000, north: 90_000_000 };

    pub const fn new(west: i32, east: i32, south: i32, north: i32) -> Self {
        Self { west, east, south, north }
    }

    /// Reorder corners so that `west <= east` and `south <= north`.
    pub fn normalized(self) -> Self {
        Self {
            west: self.west.min(self.east),
            east: self.west.max(self.east),
            south: self.south.min(self.north),
            north: self.south.max(self.north),
        }
    }

    /// Full containment test (not mere overlap), inclusive on all edges.
    ///
    /// Both boxes are expected to be normalized.
    pub fn contains(&self, other: &Self) -> bool {
        self.west <= other.west && self.east >= other.east && self.south <= other.south && self.north >= other.north
    }

    /// Whether a point falls inside this box, inclusive on all edges.
    pub fn contains_point(&self, point: Coordinates) -> bool {
        point.longitude >= self.west
            && point.longitude <= self.east
            && point.latitude >= self.south
            && point.latitude <= self.north
    }
}
