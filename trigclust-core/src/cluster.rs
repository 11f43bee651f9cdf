//! Per-layer 2D clusters of trigger cells.

use crate::cell::{CellId, Point3, Side, TriggerCell};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A group of trigger cells within one detector layer, grown around a
/// seed cell by the nearest-neighbor clustering stage.
///
/// All members share layer, subdetector and side. Energy and the
/// energy-weighted centroid are accumulated as cells are added; the
/// cluster is treated as immutable once clustering has finished.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster2D {
    seed_id: CellId,
    seed_position: Point3,
    layer: u32,
    subdetector: u32,
    side: Side,
    cells: Vec<CellId>,
    energy: f64,
    // Energy-weighted and plain position sums for the centroid.
    weighted_sum: [f64; 3],
    position_sum: [f64; 3],
}

impl Cluster2D {
    /// Starts a new cluster at a seed cell.
    pub fn new(
        seed: &TriggerCell,
        layer: u32,
        subdetector: u32,
        side: Side,
        position: Point3,
    ) -> Self {
        let mut cluster = Self {
            seed_id: seed.id,
            seed_position: position,
            layer,
            subdetector,
            side,
            cells: Vec::new(),
            energy: 0.0,
            weighted_sum: [0.0; 3],
            position_sum: [0.0; 3],
        };
        cluster.add_cell(seed, position);
        cluster
    }

    /// Adds a member cell, accumulating energy and centroid sums.
    pub fn add_cell(&mut self, cell: &TriggerCell, position: Point3) {
        self.cells.push(cell.id);
        self.energy += cell.energy;
        self.weighted_sum[0] += cell.energy * position.x;
        self.weighted_sum[1] += cell.energy * position.y;
        self.weighted_sum[2] += cell.energy * position.z;
        self.position_sum[0] += position.x;
        self.position_sum[1] += position.y;
        self.position_sum[2] += position.z;
    }

    /// Seed cell id.
    #[inline]
    pub fn seed_id(&self) -> CellId {
        self.seed_id
    }

    /// Seed cell position; pertinence distances are measured from here.
    #[inline]
    pub fn seed_position(&self) -> Point3 {
        self.seed_position
    }

    /// Detector layer shared by all members.
    #[inline]
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Subdetector shared by all members.
    #[inline]
    pub fn subdetector(&self) -> u32 {
        self.subdetector
    }

    /// Endcap side shared by all members.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Member cell ids, in insertion order (seed first).
    #[inline]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Number of member cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A cluster always holds at least its seed cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Accumulated energy of all members.
    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Energy-weighted centroid, falling back to the arithmetic mean
    /// when all member energies are zero.
    pub fn centroid(&self) -> Point3 {
        if self.energy > 0.0 {
            Point3::new(
                self.weighted_sum[0] / self.energy,
                self.weighted_sum[1] / self.energy,
                self.weighted_sum[2] / self.energy,
            )
        } else {
            let n = self.cells.len().max(1) as f64;
            Point3::new(
                self.position_sum[0] / n,
                self.position_sum[1] / n,
                self.position_sum[2] / n,
            )
        }
    }

    /// Pseudorapidity of the centroid.
    #[inline]
    pub fn eta(&self) -> f64 {
        self.centroid().eta()
    }

    /// Azimuth of the centroid.
    #[inline]
    pub fn phi(&self) -> f64 {
        self.centroid().phi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centroid_energy_weighted() {
        let seed = TriggerCell::new(1, 30.0);
        let mut cluster = Cluster2D::new(&seed, 5, 3, Side::Plus, Point3::new(0.0, 0.0, 320.0));
        cluster.add_cell(&TriggerCell::new(2, 10.0), Point3::new(2.0, 0.0, 320.0));

        assert_eq!(cluster.len(), 2);
        assert_relative_eq!(cluster.energy(), 40.0);
        // (0*30 + 2*10) / 40 = 0.5
        assert_relative_eq!(cluster.centroid().x, 0.5);
        assert_relative_eq!(cluster.centroid().z, 320.0);
    }

    #[test]
    fn test_centroid_zero_energy_fallback() {
        let seed = TriggerCell::new(1, 0.0);
        let mut cluster = Cluster2D::new(&seed, 5, 3, Side::Plus, Point3::new(0.0, 0.0, 320.0));
        cluster.add_cell(&TriggerCell::new(2, 0.0), Point3::new(4.0, 0.0, 320.0));

        let centroid = cluster.centroid();
        assert_relative_eq!(centroid.x, 2.0);
        assert!(!centroid.x.is_nan());
    }

    #[test]
    fn test_seed_is_first_member() {
        let seed = TriggerCell::new(7, 12.0);
        let cluster = Cluster2D::new(&seed, 1, 3, Side::Minus, Point3::new(1.0, 1.0, -320.0));
        assert_eq!(cluster.seed_id(), CellId::new(7));
        assert_eq!(cluster.cells(), &[CellId::new(7)]);
        assert!(!cluster.is_empty());
    }
}
