//! Nearest-neighbor 2D clustering of trigger cells.

use trigclust_core::{AlgoConfig, Cluster2D, Geometry, Point3, Result, Side, TriggerCell};

/// Groups trigger cells into per-layer 2D clusters.
///
/// Cells are processed in input order: the greedy growth is
/// order-dependent by design, and reordering the input can change
/// cluster boundaries. A cell above the seed threshold opens a new
/// cluster only when no pertinent cluster exists; otherwise it joins the
/// pertinent cluster with the nearest seed, ties going to the
/// earliest-created one.
#[derive(Debug, Clone)]
pub struct TwoDClusterer {
    seed_threshold: f64,
    member_threshold: f64,
    max_distance: f64,
}

struct ResolvedCell {
    layer: u32,
    subdetector: u32,
    side: Side,
    position: Point3,
}

impl TwoDClusterer {
    /// Creates a clusterer from the algorithm configuration.
    pub fn new(config: &AlgoConfig) -> Self {
        Self {
            seed_threshold: config.seed_threshold,
            member_threshold: config.member_threshold,
            max_distance: config.max_distance,
        }
    }

    /// Clusters one batch of cells.
    ///
    /// All geometry lookups are resolved up front; the first failure
    /// aborts the batch. Cells below the membership threshold are
    /// dropped.
    pub fn clusterize<G: Geometry + ?Sized>(
        &self,
        cells: &[TriggerCell],
        geometry: &G,
    ) -> Result<Vec<Cluster2D>> {
        let mut resolved = Vec::with_capacity(cells.len());
        for cell in cells {
            resolved.push(ResolvedCell {
                layer: geometry.layer(cell.id)?,
                subdetector: geometry.subdetector(cell.id)?,
                side: geometry.side(cell.id)?,
                position: geometry.position(cell.id)?,
            });
        }

        let is_seed: Vec<bool> = cells
            .iter()
            .map(|cell| cell.energy > self.seed_threshold)
            .collect();

        let mut clusters: Vec<Cluster2D> = Vec::new();

        for ((cell, info), &seed_candidate) in cells.iter().zip(&resolved).zip(&is_seed) {
            if cell.energy < self.member_threshold {
                continue;
            }

            // Nearest pertinent cluster; strict < keeps the earliest on ties.
            let mut nearest: Option<(usize, f64)> = None;
            for (index, cluster) in clusters.iter().enumerate() {
                if cluster.layer() != info.layer
                    || cluster.subdetector() != info.subdetector
                    || cluster.side() != info.side
                {
                    continue;
                }
                let distance =
                    geometry.distance_in_layer(&cluster.seed_position(), &info.position);
                if distance < self.max_distance
                    && nearest.is_none_or(|(_, best)| distance < best)
                {
                    nearest = Some((index, distance));
                }
            }

            match nearest {
                Some((index, _)) => clusters[index].add_cell(cell, info.position),
                None if seed_candidate => {
                    clusters.push(Cluster2D::new(
                        cell,
                        info.layer,
                        info.subdetector,
                        info.side,
                        info.position,
                    ));
                }
                None => {}
            }
        }

        Ok(clusters)
    }
}
