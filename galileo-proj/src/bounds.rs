use crate::coord::{GeoPoint, LatLon};
use serde::{Deserialize, Serialize};

/// Rectangular area in geographic coordinates, in degrees.
///
/// If `min_lon > max_lon` the area crosses the 180th meridian.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl Bounds {
    /// The whole world.
    pub const WORLD: Bounds = Bounds {
        min_lat: -90.0,
        min_lon: -180.0,
        max_lat: 90.0,
        max_lon: 180.0,
    };

    /// Area covered by the Web Mercator projection.
    pub const WEB_MERCATOR: Bounds = Bounds {
        min_lat: -85.05112877980659,
        min_lon: -180.0,
        max_lat: 85.05112877980659,
        max_lon: 180.0,
    };

    /// Creates a new bounds from the corner points.
    pub fn new(min: LatLon, max: LatLon) -> Self {
        Self {
            min_lat: min.lat(),
            min_lon: min.lon(),
            max_lat: max.lat(),
            max_lon: max.lon(),
        }
    }

    /// Creates a new bounds from `minlon, minlat, maxlon, maxlat` values, the order used by `+bounds`.
    pub fn from_lon_lat(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// South-west corner.
    pub fn min(&self) -> LatLon {
        LatLon::new(self.min_lat, self.min_lon)
    }

    /// North-east corner.
    pub fn max(&self) -> LatLon {
        LatLon::new(self.max_lat, self.max_lon)
    }

    /// Minimum latitude.
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Maximum latitude.
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Minimum (western) longitude.
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Maximum (eastern) longitude.
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Returns true if the area crosses the 180th meridian.
    pub fn crosses_180th_meridian(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Height of the area in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Width of the area in degrees, taking the 180th meridian into account.
    pub fn width(&self) -> f64 {
        if self.crosses_180th_meridian() {
            self.max_lon + 360.0 - self.min_lon
        } else {
            self.max_lon - self.min_lon
        }
    }

    /// Returns true if the point is inside the area (borders included).
    pub fn contains(&self, point: &impl GeoPoint<Num = f64>) -> bool {
        let lat = point.lat();
        let lon = point.lon();
        if lat < self.min_lat || lat > self.max_lat {
            return false;
        }

        if self.crosses_180th_meridian() {
            lon >= self.min_lon || lon <= self.max_lon
        } else {
            lon >= self.min_lon && lon <= self.max_lon
        }
    }

    /// Returns bounds moved along the longitude axis, wrapping the borders into `[-180, 180]`.
    ///
    /// Areas that cover all longitudes are left unchanged.
    pub fn shift_lon(&self, delta: f64) -> Self {
        if delta == 0.0 || self.width() >= 360.0 {
            return *self;
        }

        Self {
            min_lon: crate::coord::to_interval_lon(self.min_lon + delta),
            max_lon: crate::coord::to_interval_lon(self.max_lon + delta),
            ..*self
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::WORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;

    #[test]
    fn contains() {
        let bounds = Bounds::from_lon_lat(-10.0, 40.0, 10.0, 50.0);
        assert!(bounds.contains(&latlon!(45.0, 0.0)));
        assert!(bounds.contains(&latlon!(40.0, 10.0)));
        assert!(!bounds.contains(&latlon!(39.0, 0.0)));
        assert!(!bounds.contains(&latlon!(45.0, 11.0)));
    }

    #[test]
    fn contains_across_antimeridian() {
        let bounds = Bounds::from_lon_lat(170.0, -50.0, -170.0, -30.0);
        assert!(bounds.crosses_180th_meridian());
        assert_eq!(bounds.width(), 20.0);
        assert!(bounds.contains(&latlon!(-40.0, 175.0)));
        assert!(bounds.contains(&latlon!(-40.0, -175.0)));
        assert!(!bounds.contains(&latlon!(-40.0, 0.0)));
    }

    #[test]
    fn shift_lon() {
        let bounds = Bounds::from_lon_lat(-3.0, 0.0, 3.0, 84.0).shift_lon(177.0);
        assert_eq!(bounds.min_lon(), 174.0);
        assert_eq!(bounds.max_lon(), 180.0);
        assert!(!bounds.crosses_180th_meridian());

        let bounds = Bounds::from_lon_lat(-3.0, 0.0, 3.0, 84.0).shift_lon(-179.0);
        assert_eq!(bounds.min_lon(), 178.0);
        assert_eq!(bounds.max_lon(), -176.0);
        assert!(bounds.crosses_180th_meridian());

        assert_eq!(Bounds::WORLD.shift_lon(25.0), Bounds::WORLD);
    }
}
