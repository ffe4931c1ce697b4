//! Three-component vectors used for text baselines and anchor positions.
//!
//! Coordinates are in the page's user space with the origin at the
//! bottom-left corner. Text never leaves the `z = 0` plane, but the third
//! axis is kept so that perpendicular distances can be taken from a cross
//! product.

use std::fmt;

/// Names a component of a [`Vector3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x component (parallel to unrotated text).
    Parallel,
    /// The y component (perpendicular to unrotated text).
    Perpendicular,
    /// The z component, out of the page plane.
    Third,
}

/// An immutable point or direction in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f32,
}

impl Vector3 {
    /// Unit vector along the x axis; the orientation given to degenerate baselines.
    pub const UNIT_X: Vector3 = Vector3::new(1.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A point in the page plane (`z = 0`).
    pub const fn planar(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Component access by axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Parallel => self.x,
            Axis::Perpendicular => self.y,
            Axis::Third => self.z,
        }
    }

    pub fn sub(&self, other: &Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length.
    ///
    /// The vector must be non-zero; a zero vector yields NaN components.
    /// Callers substitute [`Vector3::UNIT_X`] for degenerate directions first.
    pub fn normalize(&self) -> Vector3 {
        let len = self.length();
        Vector3::new(self.x / len, self.y / len, self.z / len)
    }

    /// Shift within the page plane.
    pub fn translate(&self, dx: f32, dy: f32) -> Vector3 {
        Vector3::new(self.x + dx, self.y + dy, self.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Vector3::new(v[0], v[1], v[2])
    }
}

impl From<[f32; 2]> for Vector3 {
    fn from(v: [f32; 2]) -> Self {
        Vector3::planar(v[0], v[1])
    }
}
