//! trigclust-core: Core traits and types for trigger-primitive clustering.
//!
//! This crate provides the foundational abstractions shared by the
//! clustering stages: trigger cells and detector coordinates, 2D cluster
//! and multicluster records, the geometry capability, configuration, and
//! the identification (scoring) capability.
//!

pub mod cell;
pub mod cluster;
pub mod config;
pub mod error;
pub mod geometry;
pub mod identification;
pub mod multicluster;

pub use cell::{CellId, Point3, Side, TriggerCell};
pub use cluster::Cluster2D;
pub use config::{AlgoConfig, AssociationStrategy, RadiusStrategy, SeedingStrategy};
pub use error::{ConfigError, Error, GeometryError, Result};
pub use geometry::{CellRecord, Geometry, MapGeometry};
pub use identification::{AcceptAll, Identification};
pub use multicluster::Multicluster;
