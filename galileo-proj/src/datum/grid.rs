use crate::coord::LatLon;
use crate::ellipsoid::Ellipsoid;
use crate::ntv2::GridShiftFile;
use std::sync::Arc;

/// Datum defined by an NTv2 grid whose source is the local datum and target is WGS84.
///
/// Points outside of the grid are left unchanged.
#[derive(Debug, Clone)]
pub struct GridDatum {
    name: String,
    ellipsoid: Ellipsoid,
    grid: Arc<GridShiftFile>,
}

impl GridDatum {
    /// Creates a new grid datum. The `name` is the grid file name.
    pub fn new(name: impl Into<String>, ellipsoid: Ellipsoid, grid: Arc<GridShiftFile>) -> Self {
        Self {
            name: name.into(),
            ellipsoid,
            grid,
        }
    }

    /// Grid file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// The grid.
    pub fn grid(&self) -> &GridShiftFile {
        &self.grid
    }

    pub(super) fn to_wgs84(&self, point: &LatLon) -> LatLon {
        match self.grid.shift_forward(point) {
            Some(shift) => shift.apply(point),
            None => *point,
        }
    }

    pub(super) fn from_wgs84(&self, point: &LatLon) -> LatLon {
        match self.grid.shift_reverse(point) {
            Some(shift) => shift.apply(point),
            None => *point,
        }
    }
}

impl PartialEq for GridDatum {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.ellipsoid == other.ellipsoid
            && Arc::ptr_eq(&self.grid, &other.grid)
    }
}
