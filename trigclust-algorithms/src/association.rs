//! Cluster-to-seed association with selectable weighting and radius.

use trigclust_core::{AlgoConfig, AssociationStrategy, Cluster2D, RadiusStrategy};

use crate::seeding::Seed;

/// Midpoint of the tracker-calorimeter eta coverage, anchor of the
/// `LinearWithEta` radius scaling.
const MID_RADIUS_ETA: f64 = 2.3;

/// Assigns 2D clusters to seeds with weights.
///
/// Distances are Euclidean in the projected (x/z, y/z) plane and only
/// seeds on the cluster's side are considered. Weights across a
/// cluster's assigned seeds sum to 1; clusters outside every seed's
/// effective radius stay unassociated. Ties go to the seed discovered
/// first.
#[derive(Debug, Clone)]
pub struct ClusterAssociator {
    strategy: AssociationStrategy,
    radius_strategy: RadiusStrategy,
    radius: f64,
    coefficients: (f64, f64),
}

impl ClusterAssociator {
    /// Creates an associator from the algorithm configuration.
    pub fn new(config: &AlgoConfig) -> Self {
        Self {
            strategy: config.association_strategy,
            radius_strategy: config.radius_strategy,
            radius: config.association_radius,
            coefficients: config.radius_coefficients,
        }
    }

    /// Effective association radius for a cluster.
    fn effective_radius(&self, cluster: &Cluster2D) -> f64 {
        match self.radius_strategy {
            RadiusStrategy::Fixed => self.radius,
            RadiusStrategy::LinearWithEta => {
                let (a, b) = self.coefficients;
                (a + b * (MID_RADIUS_ETA - cluster.eta().abs())).max(0.0)
            }
        }
    }

    /// Associates each cluster with seeds; entry `i` of the result
    /// holds the `(seed index, weight)` assignments of cluster `i`
    /// (empty when unassociated).
    pub fn associate(&self, clusters: &[Cluster2D], seeds: &[Seed]) -> Vec<Vec<(usize, f64)>> {
        clusters
            .iter()
            .map(|cluster| self.associate_one(cluster, seeds))
            .collect()
    }

    fn associate_one(&self, cluster: &Cluster2D, seeds: &[Seed]) -> Vec<(usize, f64)> {
        let radius = self.effective_radius(cluster);
        let centroid = cluster.centroid();
        let x_over_z = centroid.x / centroid.z.abs();
        let y_over_z = centroid.y / centroid.z.abs();

        let mut in_range: Vec<(usize, f64)> = Vec::new();
        for (index, seed) in seeds.iter().enumerate() {
            if seed.side != cluster.side() {
                continue;
            }
            let distance =
                (x_over_z - seed.x_over_z()).hypot(y_over_z - seed.y_over_z());
            if distance < radius {
                in_range.push((index, distance));
            }
        }
        if in_range.is_empty() {
            return Vec::new();
        }

        match self.strategy {
            AssociationStrategy::NearestNeighbour => {
                // strict < keeps the earliest-discovered seed on ties
                let mut nearest = in_range[0];
                for &(index, distance) in &in_range[1..] {
                    if distance < nearest.1 {
                        nearest = (index, distance);
                    }
                }
                vec![(nearest.0, 1.0)]
            }
            AssociationStrategy::EnergySplit => {
                // Inverse-distance weights, normalized to 1. A cluster
                // sitting exactly on a seed takes that seed outright.
                if let Some(&(index, _)) = in_range.iter().find(|&&(_, d)| d == 0.0) {
                    return vec![(index, 1.0)];
                }
                let total: f64 = in_range.iter().map(|&(_, d)| 1.0 / d).sum();
                in_range
                    .iter()
                    .map(|&(index, d)| (index, (1.0 / d) / total))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trigclust_core::{Point3, Side, TriggerCell};

    fn cluster_at(x: f64, y: f64, z: f64, energy: f64) -> Cluster2D {
        let cell = TriggerCell::new(0, energy);
        let position = Point3::new(x, y, z);
        Cluster2D::new(&cell, 1, 3, position.side(), position)
    }

    fn seed_at(r_over_z: f64, phi: f64, side: Side) -> Seed {
        Seed {
            side,
            r_over_z,
            phi,
            energy: 30.0,
        }
    }

    fn associator(strategy: AssociationStrategy, radius: f64) -> ClusterAssociator {
        ClusterAssociator::new(
            &AlgoConfig::new()
                .with_association_strategy(strategy)
                .with_association_radius(radius),
        )
    }

    #[test]
    fn test_nearest_neighbour_full_weight() {
        // cluster at r/z = 0.25, phi = 0, flanked symmetrically in phi
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![
            seed_at(0.25, 0.01, Side::Plus),
            seed_at(0.25, -0.01, Side::Plus),
        ];

        let assignments =
            associator(AssociationStrategy::NearestNeighbour, 0.05).associate(&clusters, &seeds);
        // equidistant: earliest seed wins
        assert_eq!(assignments[0], vec![(0, 1.0)]);
    }

    #[test]
    fn test_out_of_range_cluster_unassociated() {
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![seed_at(0.45, 0.0, Side::Plus)];

        let assignments =
            associator(AssociationStrategy::NearestNeighbour, 0.05).associate(&clusters, &seeds);
        assert!(assignments[0].is_empty());
    }

    #[test]
    fn test_wrong_side_seed_ignored() {
        let clusters = vec![cluster_at(80.0, 0.0, -320.0, 40.0)];
        let seeds = vec![seed_at(0.25, 0.0, Side::Plus)];

        let assignments =
            associator(AssociationStrategy::NearestNeighbour, 0.05).associate(&clusters, &seeds);
        assert!(assignments[0].is_empty());
    }

    #[test]
    fn test_energy_split_equidistant_is_half_half() {
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![
            seed_at(0.25, 0.02, Side::Plus),
            seed_at(0.25, -0.02, Side::Plus),
        ];

        let assignments =
            associator(AssociationStrategy::EnergySplit, 0.05).associate(&clusters, &seeds);
        assert_eq!(assignments[0].len(), 2);
        assert_relative_eq!(assignments[0][0].1, 0.5);
        assert_relative_eq!(assignments[0][1].1, 0.5);
        let total: f64 = assignments[0].iter().map(|&(_, w)| w).sum();
        assert_relative_eq!(total, 1.0);
    }

    #[test]
    fn test_energy_split_favors_closer_seed() {
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![
            seed_at(0.26, 0.0, Side::Plus), // distance 0.01
            seed_at(0.28, 0.0, Side::Plus), // distance 0.03
        ];

        let assignments =
            associator(AssociationStrategy::EnergySplit, 0.05).associate(&clusters, &seeds);
        // 1/d weights: (100, 33.3) -> (0.75, 0.25)
        assert_relative_eq!(assignments[0][0].1, 0.75, max_relative = 1e-9);
        assert_relative_eq!(assignments[0][1].1, 0.25, max_relative = 1e-9);
    }

    #[test]
    fn test_energy_split_single_seed_in_range() {
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![
            seed_at(0.26, 0.0, Side::Plus),
            seed_at(0.45, 0.0, Side::Plus),
        ];

        let assignments =
            associator(AssociationStrategy::EnergySplit, 0.05).associate(&clusters, &seeds);
        assert_eq!(assignments[0], vec![(0, 1.0)]);
    }

    #[test]
    fn test_energy_split_on_seed_takes_all() {
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        let seeds = vec![
            seed_at(0.25, 0.0, Side::Plus),
            seed_at(0.26, 0.0, Side::Plus),
        ];

        let assignments =
            associator(AssociationStrategy::EnergySplit, 0.05).associate(&clusters, &seeds);
        assert_eq!(assignments[0], vec![(0, 1.0)]);
    }

    #[test]
    fn test_linear_with_eta_radius_grows_at_low_eta() {
        let config = AlgoConfig::new()
            .with_radius_strategy(RadiusStrategy::LinearWithEta)
            .with_radius_coefficients(0.02, 0.05);
        let associator = ClusterAssociator::new(&config);

        // |eta| ~ 1.93 (r/z = 0.29): radius = 0.02 + 0.05*(2.3 - 1.93)
        let low_eta = cluster_at(92.8, 0.0, 320.0, 40.0);
        // |eta| ~ 2.9 (r/z = 0.055): radius clamps towards A - |..|B
        let high_eta = cluster_at(17.6, 0.0, 320.0, 40.0);

        assert!(
            associator.effective_radius(&low_eta) > associator.effective_radius(&high_eta)
        );
        assert!(associator.effective_radius(&high_eta) >= 0.0);
    }
}
