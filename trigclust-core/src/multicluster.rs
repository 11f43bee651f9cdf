//! Multiclusters: 3D aggregations of 2D clusters across detector depth.

use crate::cell::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A candidate particle shower built from weighted 2D clusters.
///
/// Members are `(cluster index, weight)` pairs referring into the
/// cluster collection the multicluster was built from. Aggregate energy
/// is the weighted sum of member energies, the centroid their
/// energy-weighted average position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Multicluster {
    members: Vec<(usize, f64)>,
    energy: f64,
    weighted_sum: [f64; 3],
    score: f64,
    accepted: bool,
}

impl Multicluster {
    /// Creates an empty multicluster.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            energy: 0.0,
            weighted_sum: [0.0; 3],
            score: 0.0,
            accepted: false,
        }
    }

    /// Adds a member cluster with its association weight.
    pub fn add_member(&mut self, index: usize, weight: f64, energy: f64, centroid: Point3) {
        let contribution = weight * energy;
        self.members.push((index, weight));
        self.energy += contribution;
        self.weighted_sum[0] += contribution * centroid.x;
        self.weighted_sum[1] += contribution * centroid.y;
        self.weighted_sum[2] += contribution * centroid.z;
    }

    /// Member `(cluster index, weight)` pairs in association order.
    #[inline]
    pub fn members(&self) -> &[(usize, f64)] {
        &self.members
    }

    /// Number of member clusters.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no clusters were associated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Aggregate energy, sum of weight x member energy.
    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Energy-weighted centroid of the member clusters.
    pub fn centroid(&self) -> Point3 {
        if self.energy > 0.0 {
            Point3::new(
                self.weighted_sum[0] / self.energy,
                self.weighted_sum[1] / self.energy,
                self.weighted_sum[2] / self.energy,
            )
        } else {
            Point3::default()
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

    /// Transverse energy, E / cosh(eta).
    #[inline]
    pub fn transverse_energy(&self) -> f64 {
        self.energy / self.eta().cosh()
    }

    /// Identification score assigned at finalization.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Sets the identification score.
    pub fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    /// Identification decision assigned at finalization.
    #[inline]
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Sets the identification decision.
    pub fn set_accepted(&mut self, accepted: bool) {
        self.accepted = accepted;
    }
}

impl Default for Multicluster {
    fn default() -> Self {
        Self::new()
    }
}
