use super::GridShift;

/// Single rectangular grid of an NTv2 file.
///
/// Coordinates are in seconds of arc, longitudes are positive to the west. Nodes are stored row by row
/// from south to north, each row from east to west.
#[derive(Debug, Clone)]
pub struct SubGrid {
    pub(super) name: String,
    pub(super) parent_name: String,
    pub(super) created: String,
    pub(super) updated: String,
    pub(super) min_lat: f64,
    pub(super) max_lat: f64,
    pub(super) min_lon: f64,
    pub(super) max_lon: f64,
    pub(super) lat_interval: f64,
    pub(super) lon_interval: f64,
    pub(super) lon_columns: usize,
    pub(super) lat_rows: usize,
    pub(super) lat_shift: Vec<f32>,
    pub(super) lon_shift: Vec<f32>,
    pub(super) lat_accuracy: Option<Vec<f32>>,
    pub(super) lon_accuracy: Option<Vec<f32>>,
    pub(super) children: Vec<SubGrid>,
}

impl SubGrid {
    /// Name of the sub-grid.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parent sub-grid, `NONE` for top level grids.
    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }

    /// Creation date as written in the file.
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Update date as written in the file.
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Nested finer sub-grids.
    pub fn children(&self) -> &[SubGrid] {
        &self.children
    }

    /// Number of nodes in the grid.
    pub fn node_count(&self) -> usize {
        self.lon_columns * self.lat_rows
    }

    /// Returns true if the point is inside the grid. The southern and eastern borders are inclusive,
    /// the northern and western ones are not.
    pub fn is_coord_within(&self, lon_positive_west: f64, lat: f64) -> bool {
        lon_positive_west >= self.min_lon
            && lon_positive_west < self.max_lon
            && lat >= self.min_lat
            && lat < self.max_lat
    }

    /// Returns the finest grid in this grid's subtree that contains the point. The point must be
    /// within this grid.
    pub fn sub_grid_for_coord(&self, lon_positive_west: f64, lat: f64) -> &SubGrid {
        self.children
            .iter()
            .find(|child| child.is_coord_within(lon_positive_west, lat))
            .map(|child| child.sub_grid_for_coord(lon_positive_west, lat))
            .unwrap_or(self)
    }

    /// Bilinear interpolation of the shift values at the given point. The point must be within the grid.
    pub(super) fn interpolate(&self, lon_positive_west: f64, lat: f64) -> GridShift {
        let lon_index = ((lon_positive_west - self.min_lon) / self.lon_interval) as usize;
        let lat_index = ((lat - self.min_lat) / self.lat_interval) as usize;

        let x = (lon_positive_west - (self.min_lon + self.lon_interval * lon_index as f64))
            / self.lon_interval;
        let y = (lat - (self.min_lat + self.lat_interval * lat_index as f64)) / self.lat_interval;

        let index_a = lon_index + lat_index * self.lon_columns;
        let index_b = (index_a + 1).min(self.node_count() - 1);
        let index_c = (index_a + self.lon_columns).min(self.node_count() - 1);
        let index_d = (index_c + 1).min(self.node_count() - 1);
        let corners = [index_a, index_b, index_c, index_d];

        let value = |values: &[f32]| interpolate(values, corners, x, y);

        GridShift {
            lat_shift: value(&self.lat_shift),
            lon_shift_positive_west: value(&self.lon_shift),
            lat_accuracy: self.lat_accuracy.as_deref().map(value),
            lon_accuracy: self.lon_accuracy.as_deref().map(value),
            sub_grid: self.name.clone(),
        }
    }
}

fn interpolate(values: &[f32], [a, b, c, d]: [usize; 4], x: f64, y: f64) -> f64 {
    let a = values[a] as f64;
    let b = values[b] as f64;
    let c = values[c] as f64;
    let d = values[d] as f64;

    a + (b - a) * x + (c - a) * y + (a + d - b - c) * x * y
}
