//! Error types for trigclust-core.

use crate::cell::CellId;
use thiserror::Error;

/// Result type alias for trigclust operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for trigclust operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, fatal before any batch is processed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Geometry lookup error, fatal for the current batch.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised by [`crate::AlgoConfig::validate`] and strategy parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Strategy name not recognized.
    #[error("unknown {kind} strategy: {value:?}")]
    UnknownStrategy {
        /// Which selector was being parsed.
        kind: &'static str,
        /// The offending value.
        value: String,
    },

    /// A histogram axis has zero bins.
    #[error("histogram axis {axis} must have at least one bin")]
    EmptyAxis {
        /// Axis name ("r" or "phi").
        axis: &'static str,
    },

    /// Phi smoothing window list does not match the radial bin count.
    #[error("phi smoothing bin sums: expected {expected} entries, got {got}")]
    BinSumsLength {
        /// Number of radial bins.
        expected: usize,
        /// Entries supplied.
        got: usize,
    },

    /// Phi smoothing windows must be odd so they center on a bin.
    #[error("phi smoothing window must be odd, got {0}")]
    EvenWindow(usize),

    /// Smoothing kernel weight is NaN or infinite.
    #[error("r-phi smoothing kernel weight {index} is not finite")]
    NonFiniteKernelWeight {
        /// Index into the 9-weight kernel.
        index: usize,
    },

    /// A threshold that must be non-negative is negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeThreshold {
        /// Configuration field name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A distance or radius that must be positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveDistance {
        /// Configuration field name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Errors raised by [`crate::Geometry`] lookups.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// No geometry record for the given cell id.
    #[error("no geometry record for cell {0}")]
    UnknownCell(CellId),
}
