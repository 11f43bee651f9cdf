//! Geometry capability: cell id to layer/side/position resolution.

use std::collections::HashMap;

use crate::cell::{CellId, Point3, Side};
use crate::error::GeometryError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Read-only geometry capability, immutable for the run.
///
/// Implementations resolve a cell id into its detector coordinates and
/// provide the in-layer distance metric used by the 2D clustering stage.
/// A failed lookup is an input-consistency defect and aborts the batch.
pub trait Geometry: Send + Sync {
    /// Detector layer of the cell.
    fn layer(&self, id: CellId) -> Result<u32, GeometryError>;

    /// Subdetector of the cell.
    fn subdetector(&self, id: CellId) -> Result<u32, GeometryError>;

    /// Endcap side of the cell.
    fn side(&self, id: CellId) -> Result<Side, GeometryError>;

    /// Global position of the cell.
    fn position(&self, id: CellId) -> Result<Point3, GeometryError>;

    /// In-layer distance between two positions.
    #[inline]
    fn distance_in_layer(&self, a: &Point3, b: &Point3) -> f64 {
        a.distance_xy(b)
    }
}

/// Geometry record for a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRecord {
    /// Cell id.
    pub id: CellId,
    /// Detector layer.
    pub layer: u32,
    /// Subdetector.
    pub subdetector: u32,
    /// Global position; the sign of z fixes the side.
    pub position: Point3,
}

/// Map-backed [`Geometry`] implementation.
///
/// Used by the CLI (loaded from JSON) and by tests; a production service
/// would back the same trait with the real detector description.
#[derive(Debug, Clone, Default)]
pub struct MapGeometry {
    cells: HashMap<CellId, CellRecord>,
}

impl MapGeometry {
    /// Creates an empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a geometry from cell records; later duplicates win.
    pub fn from_records<I: IntoIterator<Item = CellRecord>>(records: I) -> Self {
        Self {
            cells: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Adds or replaces a cell record.
    pub fn insert(&mut self, record: CellRecord) {
        self.cells.insert(record.id, record);
    }

    /// Number of known cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cells are known.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn record(&self, id: CellId) -> Result<&CellRecord, GeometryError> {
        self.cells.get(&id).ok_or(GeometryError::UnknownCell(id))
    }
}

impl Geometry for MapGeometry {
    fn layer(&self, id: CellId) -> Result<u32, GeometryError> {
        Ok(self.record(id)?.layer)
    }

    fn subdetector(&self, id: CellId) -> Result<u32, GeometryError> {
        Ok(self.record(id)?.subdetector)
    }

    fn side(&self, id: CellId) -> Result<Side, GeometryError> {
        Ok(self.record(id)?.position.side())
    }

    fn position(&self, id: CellId) -> Result<Point3, GeometryError> {
        Ok(self.record(id)?.position)
    }
}
