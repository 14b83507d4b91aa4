//! Coordinate reference systems: a datum, a base projection and the scalar parameters combined
//! into conversion between WGS84 geographic coordinates and projected coordinates.

use crate::bounds::Bounds;
use crate::coord::{to_interval_lon, EastNorth, GeoPoint, LatLon};
use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::proj::Proj;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Conversion between WGS84 geographic coordinates and the coordinates of a coordinate system.
///
/// Conversions never fail: points outside of the valid area of the projection or at its
/// singularities produce non-finite values.
pub trait Projection: Send + Sync {
    /// Converts WGS84 coordinates into projected coordinates.
    fn latlon_to_east_north(&self, point: &LatLon) -> EastNorth;
    /// Converts projected coordinates into WGS84 coordinates.
    fn east_north_to_latlon(&self, point: &EastNorth) -> LatLon;
    /// Stable identifier of the coordinate system, e.g. `EPSG:3857`.
    fn to_code(&self) -> String;
    /// Area (in WGS84 coordinates) where the projection can be used.
    fn world_bounds(&self) -> Bounds;
}

/// Coordinate reference system.
///
/// ```
/// use galileo_proj::coord::LatLon;
/// use galileo_proj::{Crs, Datum, Ellipsoid, Projection};
/// use galileo_proj::proj::{Proj, ProjKind, ProjParameters};
///
/// let sphere = Ellipsoid::sphere(6_378_137.0);
/// let merc = Proj::initialize(ProjKind::Mercator, &ProjParameters {
///     ellipsoid: sphere,
///     ..Default::default()
/// }).unwrap();
/// let crs = Crs::new("EPSG:3857", Datum::Null(sphere), merc);
///
/// let projected = crs.latlon_to_east_north(&LatLon::new(0.0, 0.0));
/// assert_eq!((projected.east(), projected.north()), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    code: String,
    name: Option<String>,
    definition: Option<String>,
    datum: Datum,
    proj: Proj,
    x_0: f64,
    y_0: f64,
    lon_0: f64,
    pm: f64,
    k_0: f64,
    to_meter: f64,
    bounds: Option<Bounds>,
}

impl Crs {
    /// Creates a coordinate system with the given datum and base projection. The projection must be
    /// initialized with the ellipsoid of the datum.
    pub fn new(code: impl Into<String>, datum: Datum, proj: Proj) -> Self {
        Self {
            code: code.into(),
            name: None,
            definition: None,
            datum,
            proj,
            x_0: 0.0,
            y_0: 0.0,
            lon_0: 0.0,
            pm: 0.0,
            k_0: 1.0,
            to_meter: 1.0,
            bounds: None,
        }
    }

    /// Sets the human readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the definition string the system was created from.
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Sets the false easting and northing (meters).
    pub fn with_false_origin(mut self, x_0: f64, y_0: f64) -> Self {
        self.x_0 = x_0;
        self.y_0 = y_0;
        self
    }

    /// Sets the central meridian (degrees, relative to the prime meridian).
    pub fn with_central_meridian(mut self, lon_0: f64) -> Self {
        self.lon_0 = lon_0;
        self
    }

    /// Sets the longitude of the prime meridian (degrees east of Greenwich).
    pub fn with_prime_meridian(mut self, pm: f64) -> Self {
        self.pm = pm;
        self
    }

    /// Sets the scale factor.
    pub fn with_scale_factor(mut self, k_0: f64) -> Self {
        self.k_0 = k_0;
        self
    }

    /// Sets the length of the projected unit in meters.
    pub fn with_to_meter(mut self, to_meter: f64) -> Self {
        self.to_meter = to_meter;
        self
    }

    /// Sets the area of use. Without it the area where the projection formulas are valid is used.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Identifier of the system.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Definition string the system was created from.
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Datum.
    pub fn datum(&self) -> &Datum {
        &self.datum
    }

    /// Ellipsoid of the datum.
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.datum.ellipsoid()
    }

    /// Base projection.
    pub fn proj(&self) -> &Proj {
        &self.proj
    }

    /// False easting.
    pub fn x_0(&self) -> f64 {
        self.x_0
    }

    /// False northing.
    pub fn y_0(&self) -> f64 {
        self.y_0
    }

    /// Scale factor.
    pub fn k_0(&self) -> f64 {
        self.k_0
    }

    /// Length of the projected unit in meters.
    pub fn to_meter(&self) -> f64 {
        self.to_meter
    }

    /// Longitude of the prime meridian.
    pub fn prime_meridian(&self) -> f64 {
        self.pm
    }

    /// Central meridian relative to Greenwich in degrees. Projections that compute it from their
    /// own parameters override `+lon_0`.
    pub fn central_meridian(&self) -> f64 {
        self.proj.central_meridian().unwrap_or(self.lon_0) + self.pm
    }

    /// Returns true if the projected coordinates are geographic degrees.
    pub fn is_geographic(&self) -> bool {
        self.proj.is_geographic()
    }

    fn scale(&self) -> f64 {
        self.ellipsoid().a() * self.k_0
    }
}

impl Projection for Crs {
    fn latlon_to_east_north(&self, point: &LatLon) -> EastNorth {
        let local = self.datum.from_wgs84(point);
        let lon = to_interval_lon(local.lon() - self.central_meridian());

        if self.proj.is_geographic() {
            return EastNorth::new(lon, local.lat());
        }

        let (x, y) = self.proj.project(local.lat_rad(), lon.to_radians());
        let scale = self.scale();
        EastNorth::new(
            (scale * x + self.x_0) / self.to_meter,
            (scale * y + self.y_0) / self.to_meter,
        )
    }

    fn east_north_to_latlon(&self, point: &EastNorth) -> LatLon {
        let local = if self.proj.is_geographic() {
            LatLon::new(
                point.north(),
                to_interval_lon(point.east() + self.central_meridian()),
            )
        } else {
            let scale = self.scale();
            let x = (point.east() * self.to_meter - self.x_0) / scale;
            let y = (point.north() * self.to_meter - self.y_0) / scale;
            let (phi, lambda) = self.proj.invproject(x, y);

            LatLon::new(
                phi.to_degrees(),
                to_interval_lon(lambda.to_degrees() + self.central_meridian()),
            )
        };

        self.datum.to_wgs84(&local)
    }

    fn to_code(&self) -> String {
        self.code.clone()
    }

    fn world_bounds(&self) -> Bounds {
        self.bounds
            .unwrap_or_else(|| self.proj.algorithm_bounds().shift_lon(self.central_meridian()))
    }
}

/// Synthetic code of a coordinate system defined by a parameter string without a catalog code.
pub fn custom_code(definition: &str) -> String {
    let normalized = definition.split_whitespace().collect::<Vec<_>>().join(" ");
    let digest = Sha256::digest(normalized.as_bytes());
    let hash = hex::encode(digest);
    format!("proj:{}", &hash[..10])
}

/// Conversion from the projected coordinates of one system into the projected coordinates of
/// another one, through WGS84.
#[derive(Clone)]
pub struct ChainProjection {
    source: Arc<dyn Projection>,
    target: Arc<dyn Projection>,
}

impl ChainProjection {
    /// Creates a new chain.
    pub fn new(source: Arc<dyn Projection>, target: Arc<dyn Projection>) -> Self {
        Self { source, target }
    }

    /// Source system.
    pub fn source(&self) -> &dyn Projection {
        &*self.source
    }

    /// Target system.
    pub fn target(&self) -> &dyn Projection {
        &*self.target
    }

    /// Converts source coordinates into target coordinates.
    pub fn convert(&self, point: &EastNorth) -> EastNorth {
        let latlon = self.source.east_north_to_latlon(point);
        self.target.latlon_to_east_north(&latlon)
    }

    /// Returns the chain converting in the opposite direction.
    pub fn inverted(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl std::fmt::Debug for ChainProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainProjection")
            .field("source", &self.source.to_code())
            .field("target", &self.target.to_code())
            .finish()
    }
}
