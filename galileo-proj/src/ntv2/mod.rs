//! Reader for grid shift files in the NTv2 format and interpolation of datum shifts over them.
//!
//! An NTv2 file consists of 16-byte records: an 8-byte ASCII label followed by an 8-byte value.
//! The overview header (11 records) is followed by the sub-grids, each of them a header of 11
//! records and one record per grid node holding four `f32` values: latitude shift, longitude shift,
//! latitude accuracy and longitude accuracy, all in seconds of arc. Longitudes in the file are
//! positive to the west.
//!
//! Both little- and big-endian files are accepted. The byte order is detected from the value of the
//! first record (`NUM_OREC`), which is always 11.

use crate::coord::{GeoPoint, LatLon};
use bytes::Buf;
use log::{debug, warn};

mod error;
mod sub_grid;

pub use error::Ntv2Error;
pub use sub_grid::SubGrid;

const RECORD_LEN: usize = 16;
const OVERVIEW_RECORDS: i32 = 11;
const SUB_GRID_HEADER_RECORDS: usize = 11;
const NO_PARENT: &str = "NONE";
const MAX_REVERSE_ITERATIONS: usize = 4;

/// Decoded NTv2 grid shift file.
#[derive(Debug, Clone)]
pub struct GridShiftFile {
    header: Header,
    top_level: Vec<SubGrid>,
}

/// Metadata of the overview header of an NTv2 file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Number of sub-grids declared by the file.
    pub sub_grid_count: usize,
    /// Units of the shift values (normally `SECONDS`).
    pub shift_type: String,
    /// Version label.
    pub version: String,
    /// Name of the source datum.
    pub from_system: String,
    /// Name of the target datum.
    pub to_system: String,
    /// Semi-major axis of the source ellipsoid.
    pub from_semi_major: f64,
    /// Semi-minor axis of the source ellipsoid.
    pub from_semi_minor: f64,
    /// Semi-major axis of the target ellipsoid.
    pub to_semi_major: f64,
    /// Semi-minor axis of the target ellipsoid.
    pub to_semi_minor: f64,
}

/// Datum shift interpolated at a point.
///
/// Values are kept in seconds of arc with positive-west longitude, as they are stored in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct GridShift {
    lat_shift: f64,
    lon_shift_positive_west: f64,
    lat_accuracy: Option<f64>,
    lon_accuracy: Option<f64>,
    sub_grid: String,
}

impl GridShift {
    /// Latitude shift in seconds of arc.
    pub fn lat_shift_seconds(&self) -> f64 {
        self.lat_shift
    }

    /// Longitude shift in seconds of arc, positive to the west.
    pub fn lon_shift_positive_west_seconds(&self) -> f64 {
        self.lon_shift_positive_west
    }

    /// Latitude shift in degrees.
    pub fn lat_shift_degrees(&self) -> f64 {
        self.lat_shift / 3600.0
    }

    /// Longitude shift in degrees, positive to the east.
    pub fn lon_shift_positive_east_degrees(&self) -> f64 {
        -self.lon_shift_positive_west / 3600.0
    }

    /// Interpolated latitude accuracy in seconds of arc, if accuracy values were loaded.
    pub fn lat_accuracy_seconds(&self) -> Option<f64> {
        self.lat_accuracy
    }

    /// Interpolated longitude accuracy in seconds of arc, if accuracy values were loaded.
    pub fn lon_accuracy_seconds(&self) -> Option<f64> {
        self.lon_accuracy
    }

    /// Name of the sub-grid the shift was taken from.
    pub fn sub_grid_name(&self) -> &str {
        &self.sub_grid
    }

    /// Returns the point moved by the shift.
    pub fn apply(&self, point: &LatLon) -> LatLon {
        LatLon::new(
            point.lat() + self.lat_shift_degrees(),
            point.lon() + self.lon_shift_positive_east_degrees(),
        )
    }
}

impl GridShiftFile {
    /// Decodes a grid file. Accuracy values are kept only if `load_accuracy` is set.
    pub fn from_bytes(mut data: impl Buf, load_accuracy: bool) -> Result<Self, Ntv2Error> {
        if data.remaining() < RECORD_LEN {
            return Err(Ntv2Error::Truncated("overview header".into()));
        }

        let big_endian = detect_byte_order(data.chunk())?;
        let mut reader = RecordReader {
            data: &mut data,
            big_endian,
        };

        let header = reader.overview()?;
        debug!(
            "Reading NTv2 grid {} -> {} with {} sub-grids",
            header.from_system, header.to_system, header.sub_grid_count
        );

        let headers_len = header
            .sub_grid_count
            .checked_mul(SUB_GRID_HEADER_RECORDS * RECORD_LEN)
            .ok_or_else(|| Ntv2Error::Truncated("sub-grid headers".into()))?;
        reader.ensure(headers_len, "sub-grid headers")?;

        let mut sub_grids = Vec::with_capacity(header.sub_grid_count);
        for _ in 0..header.sub_grid_count {
            sub_grids.push(reader.sub_grid(load_accuracy)?);
        }

        Ok(Self {
            header,
            top_level: build_tree(sub_grids)?,
        })
    }

    /// Overview header metadata.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Top level sub-grids in file order.
    pub fn sub_grids(&self) -> &[SubGrid] {
        &self.top_level
    }

    /// Finds the finest sub-grid that contains the point given in seconds with positive-west longitude.
    pub fn sub_grid_for_coord(&self, lon_positive_west: f64, lat: f64) -> Option<&SubGrid> {
        self.top_level
            .iter()
            .find(|grid| grid.is_coord_within(lon_positive_west, lat))
            .map(|grid| grid.sub_grid_for_coord(lon_positive_west, lat))
    }

    /// Interpolates the shift that converts a point in the source datum of the grid into the target datum.
    ///
    /// Returns `None` if the point is outside of all grids.
    pub fn shift_forward(&self, point: &LatLon) -> Option<GridShift> {
        let lat = point.lat() * 3600.0;
        let lon = -point.lon() * 3600.0;

        self.sub_grid_for_coord(lon, lat)
            .map(|grid| grid.interpolate(lon, lat))
    }

    /// Interpolates the shift that converts a point in the target datum of the grid back into the source
    /// datum.
    ///
    /// The source position is refined iteratively: each pass looks up the forward shift at the current
    /// estimate and subtracts it from the target point. Returns `None` if an estimate falls outside of
    /// all grids.
    pub fn shift_reverse(&self, point: &LatLon) -> Option<GridShift> {
        let mut estimate = *point;
        let mut shift = None;

        for _ in 0..MAX_REVERSE_ITERATIONS {
            let forward = self.shift_forward(&estimate)?;
            estimate = LatLon::new(
                point.lat() - forward.lat_shift_degrees(),
                point.lon() - forward.lon_shift_positive_east_degrees(),
            );
            shift = Some(forward);
        }

        shift.map(|forward| GridShift {
            lat_shift: -forward.lat_shift,
            lon_shift_positive_west: -forward.lon_shift_positive_west,
            ..forward
        })
    }
}

fn detect_byte_order(first_record: &[u8]) -> Result<bool, Ntv2Error> {
    if first_record.len() < 12 || !first_record.starts_with(b"NUM_OREC") {
        return Err(Ntv2Error::Header("first record must be NUM_OREC".into()));
    }

    let value = [
        first_record[8],
        first_record[9],
        first_record[10],
        first_record[11],
    ];
    if i32::from_be_bytes(value) == OVERVIEW_RECORDS {
        Ok(true)
    } else if i32::from_le_bytes(value) == OVERVIEW_RECORDS {
        Ok(false)
    } else {
        Err(Ntv2Error::Header(format!(
            "unexpected number of overview records: {}",
            i32::from_le_bytes(value)
        )))
    }
}

struct RecordReader<'a, B: Buf> {
    data: &'a mut B,
    big_endian: bool,
}

impl<B: Buf> RecordReader<'_, B> {
    fn ensure(&self, len: usize, what: &str) -> Result<(), Ntv2Error> {
        if self.data.remaining() < len {
            Err(Ntv2Error::Truncated(what.to_string()))
        } else {
            Ok(())
        }
    }

    fn label(&mut self) -> String {
        let mut label = [0u8; 8];
        self.data.copy_to_slice(&mut label);
        decode_text(&label)
    }

    fn int(&mut self, what: &str) -> Result<i32, Ntv2Error> {
        self.ensure(RECORD_LEN, what)?;
        self.label();
        let value = if self.big_endian {
            self.data.get_i32()
        } else {
            self.data.get_i32_le()
        };
        self.data.advance(4);
        Ok(value)
    }

    fn double(&mut self, what: &str) -> Result<f64, Ntv2Error> {
        self.ensure(RECORD_LEN, what)?;
        self.label();
        Ok(if self.big_endian {
            self.data.get_f64()
        } else {
            self.data.get_f64_le()
        })
    }

    fn text(&mut self, what: &str) -> Result<String, Ntv2Error> {
        self.ensure(RECORD_LEN, what)?;
        self.label();
        Ok(self.label())
    }

    fn float(&mut self) -> f32 {
        if self.big_endian {
            self.data.get_f32()
        } else {
            self.data.get_f32_le()
        }
    }

    fn overview(&mut self) -> Result<Header, Ntv2Error> {
        self.int("NUM_OREC")?;
        let sub_grid_records = self.int("NUM_SREC")?;
        if sub_grid_records as usize != SUB_GRID_HEADER_RECORDS {
            return Err(Ntv2Error::Header(format!(
                "unexpected number of sub-grid header records: {sub_grid_records}"
            )));
        }

        let sub_grid_count = self.int("NUM_FILE")?;
        let sub_grid_count = usize::try_from(sub_grid_count)
            .map_err(|_| Ntv2Error::Header(format!("invalid sub-grid count {sub_grid_count}")))?;

        Ok(Header {
            sub_grid_count,
            shift_type: self.text("GS_TYPE")?,
            version: self.text("VERSION")?,
            from_system: self.text("SYSTEM_F")?,
            to_system: self.text("SYSTEM_T")?,
            from_semi_major: self.double("MAJOR_F")?,
            from_semi_minor: self.double("MINOR_F")?,
            to_semi_major: self.double("MAJOR_T")?,
            to_semi_minor: self.double("MINOR_T")?,
        })
    }

    fn sub_grid(&mut self, load_accuracy: bool) -> Result<SubGrid, Ntv2Error> {
        let name = self.text("SUB_NAME")?;
        let parent_name = self.text("PARENT")?;
        let created = self.text("CREATED")?;
        let updated = self.text("UPDATED")?;
        let min_lat = self.double("S_LAT")?;
        let max_lat = self.double("N_LAT")?;
        let min_lon = self.double("E_LONG")?;
        let max_lon = self.double("W_LONG")?;
        let lat_interval = self.double("LAT_INC")?;
        let lon_interval = self.double("LONG_INC")?;
        let declared = self.int("GS_COUNT")?;

        if !(lat_interval > 0.0 && lon_interval > 0.0 && max_lat > min_lat && max_lon > min_lon) {
            return Err(Ntv2Error::Extent(name));
        }

        let (Some(lon_columns), Some(lat_rows)) = (
            node_steps(max_lon - min_lon, lon_interval),
            node_steps(max_lat - min_lat, lat_interval),
        ) else {
            return Err(Ntv2Error::Extent(name));
        };
        let Some(expected) = lon_columns.checked_mul(lat_rows) else {
            return Err(Ntv2Error::Extent(name));
        };
        if declared < 0 || declared as usize != expected {
            return Err(Ntv2Error::NodeCount {
                sub_grid: name,
                declared: declared.max(0) as usize,
                expected,
            });
        }

        let Some(nodes_len) = expected.checked_mul(RECORD_LEN) else {
            return Err(Ntv2Error::Extent(name));
        };
        self.ensure(nodes_len, &format!("nodes of sub-grid {name}"))?;

        let mut lat_shift = Vec::with_capacity(expected);
        let mut lon_shift = Vec::with_capacity(expected);
        let mut lat_accuracy = Vec::with_capacity(if load_accuracy { expected } else { 0 });
        let mut lon_accuracy = Vec::with_capacity(if load_accuracy { expected } else { 0 });

        for _ in 0..expected {
            lat_shift.push(self.float());
            lon_shift.push(self.float());
            let lat_acc = self.float();
            let lon_acc = self.float();
            if load_accuracy {
                lat_accuracy.push(lat_acc);
                lon_accuracy.push(lon_acc);
            }
        }

        Ok(SubGrid {
            name,
            parent_name,
            created,
            updated,
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            lat_interval,
            lon_interval,
            lon_columns,
            lat_rows,
            lat_shift,
            lon_shift,
            lat_accuracy: load_accuracy.then_some(lat_accuracy),
            lon_accuracy: load_accuracy.then_some(lon_accuracy),
            children: vec![],
        })
    }
}

/// Number of nodes along one axis. `None` if it cannot be declared by an `i32` node count.
fn node_steps(extent: f64, interval: f64) -> Option<usize> {
    let steps = (extent / interval).round();
    if !(0.0..i32::MAX as f64).contains(&steps) {
        return None;
    }

    (steps as usize).checked_add(1)
}

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

/// Arranges sub-grids into the parent-child tree, keeping the file order of siblings.
fn build_tree(sub_grids: Vec<SubGrid>) -> Result<Vec<SubGrid>, Ntv2Error> {
    let mut children_of: Vec<Vec<usize>> = vec![vec![]; sub_grids.len()];
    let mut roots = vec![];

    for (index, grid) in sub_grids.iter().enumerate() {
        if grid.parent_name.eq_ignore_ascii_case(NO_PARENT) {
            roots.push(index);
            continue;
        }

        let parent = sub_grids
            .iter()
            .position(|candidate| candidate.name == grid.parent_name)
            .ok_or_else(|| Ntv2Error::UnknownParent {
                sub_grid: grid.name.clone(),
                parent: grid.parent_name.clone(),
            })?;
        children_of[parent].push(index);
    }

    let mut slots: Vec<Option<SubGrid>> = sub_grids.into_iter().map(Some).collect();
    let tree: Vec<SubGrid> = roots
        .into_iter()
        .filter_map(|index| take_subtree(index, &mut slots, &children_of))
        .collect();

    for grid in slots.iter().flatten() {
        warn!("Sub-grid {} is not connected to any top level grid", grid.name);
    }

    Ok(tree)
}

fn take_subtree(
    index: usize,
    slots: &mut [Option<SubGrid>],
    children_of: &[Vec<usize>],
) -> Option<SubGrid> {
    let mut grid = slots[index].take()?;
    grid.children = children_of[index]
        .iter()
        .filter_map(|&child| take_subtree(child, slots, children_of))
        .collect();
    Some(grid)
}
