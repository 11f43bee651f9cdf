//! Histogram-based multiclustering: the second stage of the pipeline.

use trigclust_core::{AlgoConfig, Cluster2D, Identification, Multicluster};

use crate::association::ClusterAssociator;
use crate::histogram::Histogram;
use crate::seeding::SeedFinder;
use crate::smoothing::{smooth_phi, smooth_r_phi};

/// Aggregates 2D clusters into scored multiclusters.
///
/// Runs the histogram build, the configured smoothing passes, seed
/// finding, association, per-seed aggregation, and finalization
/// (identification score and transverse-energy cut). Output order is
/// seed discovery order.
pub struct HistoMulticlusterer<'a> {
    config: &'a AlgoConfig,
    identification: &'a dyn Identification,
}

impl<'a> HistoMulticlusterer<'a> {
    /// Creates a multiclusterer over a validated configuration.
    pub fn new(config: &'a AlgoConfig, identification: &'a dyn Identification) -> Self {
        Self {
            config,
            identification,
        }
    }

    /// Builds the multicluster collection for one batch of clusters.
    pub fn multicluster(&self, clusters: &[Cluster2D]) -> Vec<Multicluster> {
        let raw = Histogram::from_clusters(clusters, self.config.n_bins_r, self.config.n_bins_phi);

        // Smoothing passes chain onto a working copy; the raw histogram
        // is kept intact.
        let mut working = raw.clone();
        if let Some(bin_sums) = &self.config.phi_smoothing_bin_sums {
            working = smooth_phi(&working, bin_sums);
        }
        if let Some(kernel) = &self.config.rphi_smoothing_kernel {
            working = smooth_r_phi(&working, kernel);
        }

        let seeds = SeedFinder::new(self.config).find(&working);
        let assignments = ClusterAssociator::new(self.config).associate(clusters, &seeds);

        let mut candidates: Vec<Multicluster> = vec![Multicluster::new(); seeds.len()];
        for (cluster_index, cluster_assignments) in assignments.iter().enumerate() {
            let cluster = &clusters[cluster_index];
            for &(seed_index, weight) in cluster_assignments {
                candidates[seed_index].add_member(
                    cluster_index,
                    weight,
                    cluster.energy(),
                    cluster.centroid(),
                );
            }
        }

        self.finalize(candidates)
    }

    /// Scores candidates and applies the transverse-energy cut; empty
    /// candidates (seeds with no associated cluster) are dropped.
    fn finalize(&self, candidates: Vec<Multicluster>) -> Vec<Multicluster> {
        let mut multiclusters = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            if candidate.is_empty() {
                continue;
            }
            if candidate.transverse_energy() < self.config.pt_threshold {
                continue;
            }
            candidate.set_score(self.identification.score(&candidate));
            candidate.set_accepted(self.identification.decision(&candidate));
            multiclusters.push(candidate);
        }
        multiclusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trigclust_core::{AcceptAll, Point3, SeedingStrategy, TriggerCell};

    fn cluster_at(x: f64, y: f64, z: f64, energy: f64) -> Cluster2D {
        let cell = TriggerCell::new(0, energy);
        let position = Point3::new(x, y, z);
        Cluster2D::new(&cell, 1, 3, position.side(), position)
    }

    fn config() -> AlgoConfig {
        AlgoConfig::new()
            .with_histo_threshold(10.0)
            .with_association_radius(0.02)
    }

    #[test]
    fn test_empty_input_yields_no_multiclusters() {
        let config = config();
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);
        assert!(algo.multicluster(&[]).is_empty());
    }

    #[test]
    fn test_one_multicluster_per_isolated_cluster() {
        let config = config();
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);

        let clusters = vec![
            cluster_at(80.0, 0.0, 320.0, 40.0),
            cluster_at(0.0, 140.0, 320.0, 35.0),
        ];
        let multiclusters = algo.multicluster(&clusters);

        assert_eq!(multiclusters.len(), 2);
        for mc in &multiclusters {
            assert_eq!(mc.len(), 1);
            assert!(mc.accepted());
            assert_relative_eq!(mc.score(), 1.0);
        }
        let energies: Vec<f64> = multiclusters.iter().map(Multicluster::energy).collect();
        assert!(energies.contains(&40.0) && energies.contains(&35.0));
    }

    #[test]
    fn test_energy_is_weighted_member_sum() {
        let config = config();
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);

        // two clusters in the same bin: one seed, both members
        let clusters = vec![
            cluster_at(80.0, 0.0, 320.0, 40.0),
            cluster_at(80.1, 0.0, 320.0, 20.0),
        ];
        let multiclusters = algo.multicluster(&clusters);

        assert_eq!(multiclusters.len(), 1);
        assert_eq!(multiclusters[0].len(), 2);
        assert_relative_eq!(multiclusters[0].energy(), 60.0);
    }

    #[test]
    fn test_pt_threshold_drops_soft_candidates() {
        let config = config().with_pt_threshold(5.0);
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);

        // eta ~ 2.09, cosh(eta) ~ 4.1: pt ~ 3.6 for E = 15
        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 15.0)];
        assert!(algo.multicluster(&clusters).is_empty());

        let clusters = vec![cluster_at(80.0, 0.0, 320.0, 40.0)];
        assert_eq!(algo.multicluster(&clusters).len(), 1);
    }

    #[test]
    fn test_sides_stay_separate() {
        let config = config();
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);

        let clusters = vec![
            cluster_at(80.0, 0.0, 320.0, 40.0),
            cluster_at(80.0, 0.0, -320.0, 40.0),
        ];
        let multiclusters = algo.multicluster(&clusters);
        assert_eq!(multiclusters.len(), 2);
        assert_eq!(multiclusters[0].len(), 1);
        assert_eq!(multiclusters[1].len(), 1);
    }

    #[test]
    fn test_smoothing_config_is_applied() {
        // With a wide flat phi window the histogram max flattens out and
        // threshold seeding sees the summed energy.
        let mut config = config()
            .with_bins(8, 16)
            .with_seeding_strategy(SeedingStrategy::Threshold)
            .with_histo_threshold(45.0)
            .with_association_radius(0.1);
        config.phi_smoothing_bin_sums = Some(vec![3; 8]);
        let algo = HistoMulticlusterer::new(&config, &AcceptAll);

        // two neighbouring-bin clusters of 30 each: raw bins stay below
        // the 45 threshold, the sliding sum reaches 60
        let phi_width = 2.0 * std::f64::consts::PI / 16.0;
        let r = 80.0;
        let clusters = vec![
            cluster_at(r, 0.0, 320.0, 30.0),
            cluster_at(
                r * (phi_width).cos(),
                r * (phi_width).sin(),
                320.0,
                30.0,
            ),
        ];
        let multiclusters = algo.multicluster(&clusters);
        assert!(!multiclusters.is_empty());
    }
}
