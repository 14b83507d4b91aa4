//! Point types used at the boundaries of the crate: geographic [`LatLon`] and projected [`EastNorth`].

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Point on the surface of the ellipsoid.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;

    /// Latitude in radians.
    fn lat_rad(&self) -> Self::Num {
        self.lat().to_radians()
    }

    /// Longitude in radians.
    fn lon_rad(&self) -> Self::Num {
        self.lon().to_radians()
    }
}

/// Geo point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude (in degrees).
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude (in degrees).
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct LatLon {
    lat: f64,
    lon: f64,
}

impl GeoPoint for LatLon {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for LatLon {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl LatLon {
    /// Creates a new point.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a new point from another geo point.
    pub fn from_geo_point(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lat: other.lat(),
            lon: other.lon(),
        }
    }

    /// Creates a point from radians.
    pub fn from_radians(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.to_degrees(),
            lon: lon.to_degrees(),
        }
    }

    /// Returns true if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Returns the point with longitude wrapped into `[-180, 180]`.
    pub fn normalized(&self) -> Self {
        Self {
            lat: self.lat,
            lon: to_interval_lon(self.lon),
        }
    }
}

/// Wraps longitude into `[-180, 180]`.
pub fn to_interval_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
        if lon == -180.0 {
            180.0
        } else {
            lon
        }
    }
}

/// Projected coordinates (easting and northing), in the units of the projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct EastNorth {
    east: f64,
    north: f64,
}

impl EastNorth {
    /// Creates a new point.
    pub const fn new(east: f64, north: f64) -> Self {
        Self { east, north }
    }

    /// Easting.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Northing.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Returns true if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.east.is_finite() && self.north.is_finite()
    }
}

/// Creates a new [`LatLon`] from latitude and longitude values (in degrees).
///
/// ```
/// use galileo_proj::coord::GeoPoint;
/// use galileo_proj::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::coord::LatLon as $crate::coord::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}
