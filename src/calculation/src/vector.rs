//! Minimal 3D vector used when comparing positions.

/// 3D vector in trap coordinates (µm).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Magnitude (length) of the vector.
    #[inline(always)]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_sq().sqrt()
    }

    /// Squared magnitude (avoids sqrt).
    #[inline(always)]
    pub fn magnitude_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length of the projection onto the xy-plane.
    #[inline(always)]
    pub fn radius_xy(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Element-wise subtraction.
    #[inline(always)]
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Euclidean distance to another point.
    #[inline(always)]
    pub fn distance(&self, other: &Self) -> f64 {
        self.sub(other).magnitude()
    }
}
