//! Per-side (r/z, phi) energy histogram used for multicluster seeding.

use std::f64::consts::PI;

use trigclust_core::{Cluster2D, Side};

/// Lower edge of the radial-proxy (r/z) axis.
pub const R_OVER_Z_MIN: f64 = 0.09;
/// Upper edge of the radial-proxy (r/z) axis.
pub const R_OVER_Z_MAX: f64 = 0.52;

/// Dense 2D energy histogram, one (r/z, phi) grid per endcap side.
///
/// The radial axis is a fixed-count partition of
/// [`R_OVER_Z_MIN`, `R_OVER_Z_MAX`]; out-of-range values clamp into the
/// edge bins. The phi axis covers [-pi, pi) and is circular: indices
/// wrap modulo the bin count.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    n_bins_r: usize,
    n_bins_phi: usize,
    bins: Vec<f64>,
}

impl Histogram {
    /// Creates an empty histogram.
    pub fn new(n_bins_r: usize, n_bins_phi: usize) -> Self {
        Self {
            n_bins_r,
            n_bins_phi,
            bins: vec![0.0; 2 * n_bins_r * n_bins_phi],
        }
    }

    /// Builds the histogram from 2D clusters: each cluster centroid
    /// maps to exactly one bin, which receives the cluster energy.
    pub fn from_clusters(clusters: &[Cluster2D], n_bins_r: usize, n_bins_phi: usize) -> Self {
        let mut histogram = Self::new(n_bins_r, n_bins_phi);
        for cluster in clusters {
            let centroid = cluster.centroid();
            let r_bin = histogram.r_bin(centroid.r_over_z());
            let phi_bin = histogram.phi_bin(centroid.phi());
            histogram.add(cluster.side(), r_bin, phi_bin, cluster.energy());
        }
        histogram
    }

    /// Radial bin count.
    #[inline]
    pub fn n_bins_r(&self) -> usize {
        self.n_bins_r
    }

    /// Azimuthal bin count.
    #[inline]
    pub fn n_bins_phi(&self) -> usize {
        self.n_bins_phi
    }

    #[inline]
    fn index(&self, side: Side, r_bin: usize, phi_bin: usize) -> usize {
        (side.index() * self.n_bins_r + r_bin) * self.n_bins_phi + phi_bin
    }

    /// Energy of one bin.
    #[inline]
    pub fn get(&self, side: Side, r_bin: usize, phi_bin: usize) -> f64 {
        self.bins[self.index(side, r_bin, phi_bin)]
    }

    /// Adds energy to one bin.
    #[inline]
    pub fn add(&mut self, side: Side, r_bin: usize, phi_bin: usize, energy: f64) {
        let index = self.index(side, r_bin, phi_bin);
        self.bins[index] += energy;
    }

    /// Overwrites one bin.
    #[inline]
    pub fn set(&mut self, side: Side, r_bin: usize, phi_bin: usize, energy: f64) {
        let index = self.index(side, r_bin, phi_bin);
        self.bins[index] = energy;
    }

    /// Sum of all bin energies over both sides.
    pub fn total_energy(&self) -> f64 {
        self.bins.iter().sum()
    }

    /// Radial bin width.
    #[inline]
    pub fn r_bin_width(&self) -> f64 {
        (R_OVER_Z_MAX - R_OVER_Z_MIN) / self.n_bins_r as f64
    }

    /// Azimuthal bin width.
    #[inline]
    pub fn phi_bin_width(&self) -> f64 {
        2.0 * PI / self.n_bins_phi as f64
    }

    /// Radial bin of an r/z value, clamped into range.
    pub fn r_bin(&self, r_over_z: f64) -> usize {
        let offset = (r_over_z - R_OVER_Z_MIN) / self.r_bin_width();
        if offset <= 0.0 {
            0
        } else {
            (offset as usize).min(self.n_bins_r - 1)
        }
    }

    /// Azimuthal bin of a phi value, wrapped circularly.
    pub fn phi_bin(&self, phi: f64) -> usize {
        let offset = (phi + PI) / self.phi_bin_width();
        let bin = offset.floor() as isize;
        bin.rem_euclid(self.n_bins_phi as isize) as usize
    }

    /// Center r/z of a radial bin.
    #[inline]
    pub fn r_bin_center(&self, r_bin: usize) -> f64 {
        R_OVER_Z_MIN + (r_bin as f64 + 0.5) * self.r_bin_width()
    }

    /// Center phi of an azimuthal bin.
    #[inline]
    pub fn phi_bin_center(&self, phi_bin: usize) -> f64 {
        -PI + (phi_bin as f64 + 0.5) * self.phi_bin_width()
    }

    /// Wraps a signed phi-bin offset back into range.
    #[inline]
    pub fn wrap_phi_bin(&self, phi_bin: isize) -> usize {
        phi_bin.rem_euclid(self.n_bins_phi as isize) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trigclust_core::{Point3, TriggerCell};

    fn cluster_at(x: f64, y: f64, z: f64, energy: f64) -> Cluster2D {
        let cell = TriggerCell::new(0, energy);
        Cluster2D::new(&cell, 1, 3, Point3::new(x, y, z).side(), Point3::new(x, y, z))
    }

    #[test]
    fn test_total_energy_matches_input() {
        let clusters = vec![
            cluster_at(50.0, 0.0, 320.0, 30.0),
            cluster_at(0.0, 80.0, 320.0, 20.0),
            cluster_at(60.0, 10.0, -320.0, 25.0),
        ];
        let histogram = Histogram::from_clusters(&clusters, 36, 216);
        assert_relative_eq!(histogram.total_energy(), 75.0);
    }

    #[test]
    fn test_one_bin_per_cluster() {
        let clusters = vec![cluster_at(50.0, 0.0, 320.0, 30.0)];
        let histogram = Histogram::from_clusters(&clusters, 36, 216);

        let r_bin = histogram.r_bin(50.0 / 320.0);
        let phi_bin = histogram.phi_bin(0.0);
        assert_relative_eq!(histogram.get(Side::Plus, r_bin, phi_bin), 30.0);
        assert_relative_eq!(histogram.get(Side::Minus, r_bin, phi_bin), 0.0);
    }

    #[test]
    fn test_r_bin_clamps() {
        let histogram = Histogram::new(36, 216);
        assert_eq!(histogram.r_bin(0.0), 0);
        assert_eq!(histogram.r_bin(1.0), 35);
        assert_eq!(histogram.r_bin(R_OVER_Z_MIN), 0);
    }

    #[test]
    fn test_phi_bin_wraps() {
        let histogram = Histogram::new(36, 216);
        // pi is the same angle as -pi
        assert_eq!(histogram.phi_bin(PI), histogram.phi_bin(-PI));
        assert_eq!(histogram.phi_bin(-PI), 0);
        assert_eq!(histogram.wrap_phi_bin(-1), 215);
        assert_eq!(histogram.wrap_phi_bin(216), 0);
    }

    #[test]
    fn test_bin_centers() {
        let histogram = Histogram::new(36, 216);
        let r_bin = histogram.r_bin(0.3);
        let center = histogram.r_bin_center(r_bin);
        assert!((center - 0.3).abs() <= histogram.r_bin_width() / 2.0);

        let phi_bin = histogram.phi_bin(1.0);
        let center = histogram.phi_bin_center(phi_bin);
        assert!((center - 1.0).abs() <= histogram.phi_bin_width() / 2.0);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::from_clusters(&[], 36, 216);
        assert_relative_eq!(histogram.total_energy(), 0.0);
    }
}
