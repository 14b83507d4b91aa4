//! Reference ellipsoids and the geodesic formulas that depend only on the ellipsoid shape.

use crate::coord::{GeoPoint, LatLon};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Maximum number of iterations of the fixed-point solvers. Non-converged solutions are NaN.
pub(crate) const MAX_ITERATIONS: usize = 50;

const DEFAULT_EPSILON: f64 = 1e-11;

/// Reference ellipsoid.
///
/// All values are computed once on construction, ellipsoids are cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    a: f64,
    b: f64,
    e: f64,
    e2: f64,
    eb2: f64,
    spherical: bool,
}

impl Ellipsoid {
    /// Creates an ellipsoid from the semi-major and semi-minor axes.
    pub fn from_a_b(a: f64, b: f64) -> Self {
        let e2 = (a * a - b * b) / (a * a);
        Self {
            a,
            b,
            e: e2.sqrt(),
            e2,
            eb2: e2 / (1.0 - e2),
            spherical: a == b,
        }
    }

    /// Creates an ellipsoid from the semi-major axis and the first eccentricity squared.
    pub fn from_a_es(a: f64, es: f64) -> Self {
        Self::from_a_b(a, a * (1.0 - es).sqrt())
    }

    /// Creates an ellipsoid from the semi-major axis and the flattening.
    pub fn from_a_f(a: f64, f: f64) -> Self {
        Self::from_a_b(a, a * (1.0 - f))
    }

    /// Creates an ellipsoid from the semi-major axis and the inverse flattening.
    pub fn from_a_rf(a: f64, rf: f64) -> Self {
        Self::from_a_b(a, a * (1.0 - 1.0 / rf))
    }

    /// Creates a sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self::from_a_b(radius, radius)
    }

    /// WGS 84.
    pub fn wgs84() -> Self {
        Self::from_a_rf(6_378_137.0, 298.257223563)
    }

    /// GRS 80.
    pub fn grs80() -> Self {
        Self::from_a_rf(6_378_137.0, 298.257222101)
    }

    /// International 1924 (Hayford).
    pub fn hayford() -> Self {
        Self::from_a_rf(6_378_388.0, 297.0)
    }

    /// Clarke 1866.
    pub fn clarke1866() -> Self {
        Self::from_a_b(6_378_206.4, 6_356_583.8)
    }

    /// Clarke 1880 (IGN).
    pub fn clarke_ign() -> Self {
        Self::from_a_b(6_378_249.2, 6_356_515.0)
    }

    /// Bessel 1841.
    pub fn bessel1841() -> Self {
        Self::from_a_rf(6_377_397.155, 299.1528128)
    }

    /// Semi-major axis.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Semi-minor axis.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.e2
    }

    /// Second eccentricity squared.
    pub fn eb2(&self) -> f64 {
        self.eb2
    }

    /// Flattening.
    pub fn f(&self) -> f64 {
        (self.a - self.b) / self.a
    }

    /// Returns true if the semi-axes are equal.
    pub fn is_spherical(&self) -> bool {
        self.spherical
    }

    /// Radius of curvature in the prime vertical at the latitude `phi` (radians).
    pub fn vertical_radius_of_curvature(&self, phi: f64) -> f64 {
        self.a / (1.0 - self.e2 * phi.sin().powi(2)).sqrt()
    }

    /// Radius of curvature in the meridian at the latitude `phi` (radians).
    pub fn meridional_radius_of_curvature(&self, phi: f64) -> f64 {
        self.a * (1.0 - self.e2) / (1.0 - self.e2 * phi.sin().powi(2)).powf(1.5)
    }

    /// Length of the meridian arc from the equator to the latitude `phi` (radians).
    pub fn meridional_arc(&self, phi: f64) -> f64 {
        let n = (self.a - self.b) / (self.a + self.b);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;

        let ap = self.a * (1.0 - n + 5.0 / 4.0 * (n2 - n3) + 81.0 / 64.0 * (n4 - n5));
        let bp = 3.0 / 2.0 * self.a * (n - n2 + 7.0 / 8.0 * (n3 - n4) + 55.0 / 64.0 * n5);
        let cp = 15.0 / 16.0 * self.a * (n2 - n3 + 3.0 / 4.0 * (n4 - n5));
        let dp = 35.0 / 48.0 * self.a * (n3 - n4 + 11.0 / 16.0 * n5);
        let ep = 315.0 / 512.0 * self.a * (n4 - n5);

        ap * phi - bp * (2.0 * phi).sin() + cp * (4.0 * phi).sin() - dp * (6.0 * phi).sin()
            + ep * (8.0 * phi).sin()
    }

    /// Isometric latitude of `phi` (radians).
    pub fn latitude_isometric(&self, phi: f64) -> f64 {
        latitude_isometric(phi, self.e)
    }

    /// Geographic latitude (radians) from the isometric latitude.
    ///
    /// Returns NaN if the iteration does not converge.
    pub fn latitude(&self, lat_iso: f64, epsilon: f64) -> f64 {
        latitude(lat_iso, self.e, epsilon)
    }

    /// Converts geographic coordinates into geocentric cartesian ones (ellipsoid height is zero).
    pub fn lat_lon_to_cart(&self, point: &impl GeoPoint<Num = f64>) -> Vector3<f64> {
        let lat = point.lat_rad();
        let lon = point.lon_rad();
        let n = self.vertical_radius_of_curvature(lat);

        Vector3::new(
            n * lat.cos() * lon.cos(),
            n * lat.cos() * lon.sin(),
            n * (1.0 - self.e2) * lat.sin(),
        )
    }

    /// Converts geocentric cartesian coordinates into geographic ones, ignoring height.
    pub fn cart_to_lat_lon(&self, xyz: &Vector3<f64>) -> LatLon {
        self.cart_to_lat_lon_eps(xyz, DEFAULT_EPSILON)
    }

    /// Same as [`Ellipsoid::cart_to_lat_lon`] with explicit convergence threshold (radians).
    pub fn cart_to_lat_lon_eps(&self, xyz: &Vector3<f64>, epsilon: f64) -> LatLon {
        let (x, y, z) = (xyz.x, xyz.y, xyz.z);
        let norm = (x * x + y * y).sqrt();

        if norm == 0.0 {
            let lat = if z >= 0.0 { 90.0 } else { -90.0 };
            return LatLon::new(lat, 0.0);
        }

        let lon = y.atan2(x);
        let mut lat = (z / (norm * (1.0 - self.a * self.e2 / xyz.norm()))).atan();

        for _ in 0..MAX_ITERATIONS {
            let sin2 = lat.sin().powi(2);
            let next = ((z / norm)
                / (1.0 - self.a * self.e2 * lat.cos() / (norm * (1.0 - self.e2 * sin2).sqrt())))
            .atan();
            let delta = (next - lat).abs();
            lat = next;
            if delta <= epsilon {
                return LatLon::from_radians(lat, lon);
            }
        }

        LatLon::new(f64::NAN, lon.to_degrees())
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Isometric latitude of `phi` on the ellipsoid with the eccentricity `e`.
pub(crate) fn latitude_isometric(phi: f64, e: f64) -> f64 {
    let e_sin = e * phi.sin();
    ((FRAC_PI_4 + phi / 2.0).tan() * ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)).ln()
}

/// Inverse of [`latitude_isometric`]. Returns NaN if not converged.
pub(crate) fn latitude(lat_iso: f64, e: f64, epsilon: f64) -> f64 {
    let exp = lat_iso.exp();
    let mut lat = 2.0 * exp.atan() - FRAC_PI_2;

    for _ in 0..MAX_ITERATIONS {
        let e_sin = e * lat.sin();
        let next = 2.0 * (((1.0 + e_sin) / (1.0 - e_sin)).powf(e / 2.0) * exp).atan() - FRAC_PI_2;
        if (next - lat).abs() < epsilon {
            return next;
        }
        lat = next;
    }

    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use approx::assert_abs_diff_eq;

    fn all() -> Vec<Ellipsoid> {
        vec![
            Ellipsoid::wgs84(),
            Ellipsoid::grs80(),
            Ellipsoid::hayford(),
            Ellipsoid::clarke1866(),
            Ellipsoid::clarke_ign(),
            Ellipsoid::bessel1841(),
            Ellipsoid::sphere(6_371_000.0),
            Ellipsoid::from_a_es(6_378_249.2, 0.006803487646),
            Ellipsoid::from_a_f(6_378_137.0, 1.0 / 298.257223563),
        ]
    }

    #[test]
    fn eccentricity_invariants() {
        for ellps in all() {
            let a = ellps.a();
            let b = ellps.b();
            assert_abs_diff_eq!(ellps.e2(), (a * a - b * b) / (a * a), epsilon = 1e-15);
            assert_abs_diff_eq!(ellps.eb2(), ellps.e2() / (1.0 - ellps.e2()), epsilon = 1e-15);
            assert_eq!(ellps.is_spherical(), a == b);
        }
    }

    #[test]
    fn wgs84_axes() {
        let ellps = Ellipsoid::wgs84();
        assert_abs_diff_eq!(ellps.b(), 6_356_752.314245, epsilon = 1e-6);
        assert_abs_diff_eq!(ellps.e2(), 0.0066943799901413165, epsilon = 1e-15);
        assert_eq!(Ellipsoid::from_a_f(6_378_137.0, 1.0 / 298.257223563).f(), ellps.f());
    }

    #[test]
    fn meridional_arc() {
        let ellps = Ellipsoid::wgs84();
        assert_eq!(ellps.meridional_arc(0.0), 0.0);
        // Equator to pole distance for WGS84.
        assert_abs_diff_eq!(ellps.meridional_arc(FRAC_PI_2), 10_001_965.729, epsilon = 1e-2);
    }

    #[test]
    fn radii_of_curvature() {
        let ellps = Ellipsoid::wgs84();
        assert_abs_diff_eq!(ellps.vertical_radius_of_curvature(0.0), ellps.a(), epsilon = 1e-9);
        assert_abs_diff_eq!(
            ellps.meridional_radius_of_curvature(0.0),
            ellps.a() * (1.0 - ellps.e2()),
            epsilon = 1e-9
        );

        let sphere = Ellipsoid::sphere(1000.0);
        assert_abs_diff_eq!(sphere.meridional_radius_of_curvature(1.0), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn isometric_latitude_round_trip() {
        let ellps = Ellipsoid::clarke_ign();
        for deg in [-80.0, -45.5, -1.0, 0.0, 12.3, 46.8, 89.0] {
            let phi: f64 = f64::to_radians(deg);
            let iso = ellps.latitude_isometric(phi);
            assert_abs_diff_eq!(ellps.latitude(iso, 1e-11), phi, epsilon = 1e-10);
        }
    }

    #[test]
    fn isometric_latitude_does_not_hang() {
        assert!(latitude(0.5, 1.5, 1e-11).is_nan());
    }

    #[test]
    fn cartesian_round_trip() {
        for ellps in all() {
            for point in [
                latlon!(0.0, 0.0),
                latlon!(48.8566, 2.3522),
                latlon!(-33.8688, 151.2093),
                latlon!(71.0, -179.5),
            ] {
                let cart = ellps.lat_lon_to_cart(&point);
                let back = ellps.cart_to_lat_lon(&cart);
                assert_abs_diff_eq!(back.lat(), point.lat(), epsilon = 1e-9);
                assert_abs_diff_eq!(back.lon(), point.lon(), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn cartesian_poles() {
        let ellps = Ellipsoid::wgs84();
        let north = ellps.lat_lon_to_cart(&latlon!(90.0, 0.0));
        assert_abs_diff_eq!(north.z, ellps.b(), epsilon = 1e-6);

        let back = ellps.cart_to_lat_lon(&Vector3::new(0.0, 0.0, -ellps.b()));
        assert_eq!(back, latlon!(-90.0, 0.0));
    }
}
