//! Trigger cells and detector coordinates.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque detector-cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CellId(pub u64);

impl CellId {
    /// Creates a new cell id.
    #[inline]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Endcap side, derived from the sign of z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Negative-z endcap.
    Minus,
    /// Positive-z endcap.
    Plus,
}

impl Side {
    /// Side of a z coordinate.
    #[inline]
    pub fn from_z(z: f64) -> Self {
        if z < 0.0 {
            Side::Minus
        } else {
            Side::Plus
        }
    }

    /// Dense index for per-side storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Minus => 0,
            Side::Plus => 1,
        }
    }
}

/// Global detector position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3 {
    /// Global x.
    pub x: f64,
    /// Global y.
    pub y: f64,
    /// Global z (signed, selects the endcap).
    pub z: f64,
}

impl Point3 {
    /// Creates a new position.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Transverse radius sqrt(x^2 + y^2).
    #[inline]
    pub fn rho(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Azimuthal angle in (-pi, pi].
    #[inline]
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Pseudorapidity, asinh(z / rho).
    #[inline]
    pub fn eta(&self) -> f64 {
        (self.z / self.rho()).asinh()
    }

    /// Radial proxy r/|z| used for histogram binning.
    #[inline]
    pub fn r_over_z(&self) -> f64 {
        self.rho() / self.z.abs()
    }

    /// Endcap side of this position.
    #[inline]
    pub fn side(&self) -> Side {
        Side::from_z(self.z)
    }

    /// In-layer Euclidean distance (x-y plane only).
    #[inline]
    pub fn distance_xy(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A single calibrated energy deposit for one bunch-crossing.
///
/// Layer, subdetector, side and position are resolved through the
/// geometry capability; the cell itself only carries its id and energy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriggerCell {
    /// Detector cell id.
    pub id: CellId,
    /// Calibrated energy (transverse, in MIP-equivalent units).
    pub energy: f64,
}

impl TriggerCell {
    /// Creates a new trigger cell.
    #[inline]
    pub fn new(id: u64, energy: f64) -> Self {
        Self {
            id: CellId::new(id),
            energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_distance_xy() {
        let a = Point3::new(0.0, 0.0, 320.0);
        let b = Point3::new(3.0, 4.0, 320.0);
        assert_relative_eq!(a.distance_xy(&b), 5.0);
    }

    #[test]
    fn test_point_angles() {
        let p = Point3::new(0.0, 50.0, 320.0);
        assert_relative_eq!(p.phi(), std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(p.r_over_z(), 50.0 / 320.0);
        assert_relative_eq!(p.eta(), (320.0f64 / 50.0).asinh());
    }

    #[test]
    fn test_side_from_z() {
        assert_eq!(Side::from_z(-320.0), Side::Minus);
        assert_eq!(Side::from_z(320.0), Side::Plus);
        assert_eq!(Point3::new(1.0, 0.0, -320.0).side(), Side::Minus);
    }

    #[test]
    fn test_r_over_z_sign_independent() {
        let plus = Point3::new(30.0, 40.0, 320.0);
        let minus = Point3::new(30.0, 40.0, -320.0);
        assert_relative_eq!(plus.r_over_z(), minus.r_over_z());
    }
}
