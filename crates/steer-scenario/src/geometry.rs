//! Geometry primitives shared by the scenario document model.

use serde::{Deserialize, Serialize};

/// A point or direction in scenario space.
///
/// The simulation plane is x/z; y is vertical and is usually zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new vector.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Vec3) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// An axis-aligned box, used both for world bounds and for box obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisAlignedBox {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
    pub zmin: f32,
    pub zmax: f32,
}

/// World bounds are an axis-aligned box over the whole scenario.
pub type WorldBounds = AxisAlignedBox;

impl AxisAlignedBox {
    /// Creates a box from its six extents.
    pub fn new(xmin: f32, xmax: f32, ymin: f32, ymax: f32, zmin: f32, zmax: f32) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        }
    }

    /// Derives world bounds from a spatial database origin.
    ///
    /// The historical test-case writer read the world "size" through the
    /// origin accessor rather than a size accessor, so the emitted maxima
    /// are twice the origin and the y bounds are always zero. Existing
    /// consumers of the format depend on these values, so the derivation
    /// is kept as-is.
    pub fn from_spatial_origin(origin_x: f32, origin_z: f32) -> Self {
        let size_x = origin_x;
        let size_z = origin_z;
        Self {
            xmin: origin_x,
            xmax: origin_x + size_x,
            ymin: 0.0,
            ymax: 0.0,
            zmin: origin_z,
            zmax: origin_z + size_z,
        }
    }
}
