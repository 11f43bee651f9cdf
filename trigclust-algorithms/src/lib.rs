//! trigclust-algorithms: The two clustering stages of the trigger path.
//!
//! - **TwoDClusterer** - seeded nearest-neighbor growth of per-layer
//!   2D clusters from trigger cells, in input order.
//! - **Histogram / smoothing / seeding / association** - projection of
//!   cluster centroids into a per-side (r/z, phi) energy histogram,
//!   optional smoothing passes, four seed-finding strategies, and two
//!   cluster-to-seed association strategies.
//! - **HistoMulticlusterer** - aggregation of associated clusters into
//!   scored multiclusters.
//! - **Pipeline** - both stages behind one call, with a rayon helper for
//!   independent batches.
//!
#![warn(missing_docs)]

mod association;
mod clustering;
mod histogram;
mod multiclustering;
mod pipeline;
mod seeding;
mod smoothing;

pub use association::ClusterAssociator;
pub use clustering::TwoDClusterer;
pub use histogram::{Histogram, R_OVER_Z_MAX, R_OVER_Z_MIN};
pub use multiclustering::HistoMulticlusterer;
pub use pipeline::Pipeline;
pub use seeding::{Seed, SeedFinder};
pub use smoothing::{smooth_phi, smooth_r_phi};

// Re-export core configuration types
pub use trigclust_core::config::{
    AlgoConfig, AssociationStrategy, RadiusStrategy, SeedingStrategy,
};
