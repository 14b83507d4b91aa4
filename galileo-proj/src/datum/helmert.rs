use crate::coord::{to_interval_lon, GeoPoint, LatLon};
use crate::ellipsoid::Ellipsoid;
use crate::error::GalileoProjError;
use nalgebra::{Matrix3, Vector3};

/// Number of radians in one second of arc.
const ARC_SECOND: f64 = std::f64::consts::PI / (180.0 * 3600.0);

const MAX_REFINEMENTS: usize = 10;
const REFINEMENT_EPSILON: f64 = 1e-12;

/// Similarity transformation between the geocentric frame of a local ellipsoid and WGS84.
///
/// Parameters follow the `+towgs84` convention (position vector rotation):
///
/// ```text
/// X' = tx + (1 + ds) * ( X - rz*Y + ry*Z)
/// Y' = ty + (1 + ds) * ( rz*X + Y - rx*Z)
/// Z' = tz + (1 + ds) * (-ry*X + rx*Y + Z)
/// ```
///
/// Translations are in meters, rotations in seconds of arc and the scale difference in parts per
/// million. The reverse transformation solves the same system exactly with the inverted matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Helmert {
    ellipsoid: Ellipsoid,
    parameters: [f64; 7],
    translation: Vector3<f64>,
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Helmert {
    /// Creates a translation-only transformation.
    pub fn translation(ellipsoid: Ellipsoid, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            ellipsoid,
            parameters: [dx, dy, dz, 0.0, 0.0, 0.0, 0.0],
            translation: Vector3::new(dx, dy, dz),
            matrix: Matrix3::identity(),
            inverse: Matrix3::identity(),
        }
    }

    /// Creates a full 7-parameter transformation.
    ///
    /// Fails only if the scale makes the transformation degenerate (`ds = -1e6`).
    pub fn new(ellipsoid: Ellipsoid, parameters: [f64; 7]) -> Result<Self, GalileoProjError> {
        let [dx, dy, dz, rx, ry, rz, ds] = parameters;
        let (rx, ry, rz) = (rx * ARC_SECOND, ry * ARC_SECOND, rz * ARC_SECOND);
        let scale = 1.0 + ds * 1e-6;

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            1.0, -rz, ry,
            rz, 1.0, -rx,
            -ry, rx, 1.0,
        ) * scale;

        let inverse = matrix
            .try_inverse()
            .ok_or_else(|| GalileoProjError::InvalidParameter {
                param: "towgs84".into(),
                reason: "degenerate rotation and scale".into(),
            })?;

        Ok(Self {
            ellipsoid,
            parameters,
            translation: Vector3::new(dx, dy, dz),
            matrix,
            inverse,
        })
    }

    /// Local ellipsoid.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Parameters in `+towgs84` order: `dx, dy, dz, rx, ry, rz, ds`.
    pub fn parameters(&self) -> [f64; 7] {
        self.parameters
    }

    /// Returns true if rotations and scale are all zero.
    pub fn is_translation(&self) -> bool {
        self.parameters[3..].iter().all(|v| *v == 0.0)
    }

    /// Converts geographic coordinates on the local ellipsoid into WGS84.
    pub fn to_wgs84(&self, point: &LatLon) -> LatLon {
        let local = self.ellipsoid.lat_lon_to_cart(point);
        let wgs84 = self.matrix * local + self.translation;
        Ellipsoid::wgs84().cart_to_lat_lon(&wgs84)
    }

    /// Converts WGS84 geographic coordinates into the local ellipsoid.
    ///
    /// The geocentric solve gives a point above or below the local ellipsoid. Dropping that height
    /// moves the point along the local normal, so the result is corrected until converting it back
    /// with [`Helmert::to_wgs84`] reproduces the input.
    pub fn from_wgs84(&self, point: &LatLon) -> LatLon {
        let wgs84 = Ellipsoid::wgs84().lat_lon_to_cart(point);
        let local = self.inverse * (wgs84 - self.translation);
        let mut result = self.ellipsoid.cart_to_lat_lon(&local);

        for _ in 0..MAX_REFINEMENTS {
            let forward = self.to_wgs84(&result);
            let d_lat = point.lat() - forward.lat();
            let d_lon = to_interval_lon(point.lon() - forward.lon());
            result = LatLon::new(result.lat() + d_lat, result.lon() + d_lon);

            if !(d_lat.abs() > REFINEMENT_EPSILON || d_lon.abs() > REFINEMENT_EPSILON) {
                break;
            }
        }

        result
    }
}
