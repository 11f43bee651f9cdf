//! Full-pipeline helpers combining both clustering stages.

use rayon::prelude::*;

use trigclust_core::{
    AlgoConfig, Cluster2D, Geometry, Identification, Multicluster, Result, TriggerCell,
};

use crate::clustering::TwoDClusterer;
use crate::multiclustering::HistoMulticlusterer;

/// Both clustering stages behind one call.
///
/// Each batch (one bunch-crossing) is a pure, single-threaded pass over
/// the shared read-only geometry and configuration; independent batches
/// can run in parallel through [`Pipeline::process_batches`].
pub struct Pipeline<'a, G: Geometry> {
    geometry: &'a G,
    config: AlgoConfig,
    identification: &'a dyn Identification,
}

impl<G: Geometry> std::fmt::Debug for Pipeline<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("identification", &self.identification.name())
            .finish_non_exhaustive()
    }
}

impl<'a, G: Geometry> Pipeline<'a, G> {
    /// Creates a pipeline, validating the configuration up front.
    pub fn new(
        geometry: &'a G,
        config: AlgoConfig,
        identification: &'a dyn Identification,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            geometry,
            config,
            identification,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AlgoConfig {
        &self.config
    }

    /// Runs only the 2D clustering stage.
    pub fn clusterize(&self, cells: &[TriggerCell]) -> Result<Vec<Cluster2D>> {
        TwoDClusterer::new(&self.config).clusterize(cells, self.geometry)
    }

    /// Runs both stages for one batch of cells.
    pub fn process(&self, cells: &[TriggerCell]) -> Result<Vec<Multicluster>> {
        let clusters = self.clusterize(cells)?;
        Ok(HistoMulticlusterer::new(&self.config, self.identification).multicluster(&clusters))
    }

    /// Processes independent batches in parallel. The first failing
    /// batch aborts the call; no partial output is produced.
    pub fn process_batches(&self, batches: &[Vec<TriggerCell>]) -> Result<Vec<Vec<Multicluster>>> {
        batches
            .par_iter()
            .map(|batch| self.process(batch))
            .collect()
    }
}
