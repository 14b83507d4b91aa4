use super::common::{msfn, phi2, tsfn};
use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;

/// Normal Mercator projection.
///
/// With `lat_ts` set the scale is true along that parallel instead of the equator.
#[derive(Debug, Clone, PartialEq)]
pub struct Mercator {
    e: f64,
    k: f64,
}

impl Mercator {
    pub(super) fn new(params: &ProjParameters) -> Self {
        let ellipsoid = &params.ellipsoid;
        let k = match params.lat_ts {
            Some(lat_ts) => msfn(lat_ts.to_radians(), ellipsoid.e2()),
            None => 1.0,
        };

        Self { e: ellipsoid.e(), k }
    }
}

impl BaseProjection for Mercator {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        (self.k * lambda, -self.k * tsfn(phi, self.e).ln())
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        (phi2((-y / self.k).exp(), self.e), x / self.k)
    }

    fn algorithm_bounds(&self) -> Bounds {
        Bounds::WEB_MERCATOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spherical_web_mercator() {
        let merc = Mercator::new(&ProjParameters {
            ellipsoid: Ellipsoid::sphere(6_378_137.0),
            ..Default::default()
        });

        let (x, y) = merc.project(f64::to_radians(50.0), f64::to_radians(10.0));
        assert_abs_diff_eq!(x * 6_378_137.0, 1_113_194.9079327357, epsilon = 1e-6);
        assert_abs_diff_eq!(y * 6_378_137.0, 6_446_275.841017158, epsilon = 1e-6);
    }

    #[test]
    fn ellipsoidal_reference_point() {
        // Bessel 1841, lon_0 = 110°E, k_0 = 0.997, point 3°S 120°E.
        let ellipsoid = Ellipsoid::bessel1841();
        let merc = Mercator::new(&ProjParameters {
            ellipsoid,
            ..Default::default()
        });

        let (x, y) = merc.project(f64::to_radians(-3.0), f64::to_radians(10.0));
        let scale = ellipsoid.a() * 0.997;
        assert_abs_diff_eq!(x * scale + 3_900_000.0, 5_009_726.58, epsilon = 0.01);
        assert_abs_diff_eq!(y * scale + 900_000.0, 569_150.82, epsilon = 0.01);
    }

    #[test]
    fn latitude_of_true_scale() {
        let ellipsoid = Ellipsoid::wgs84();
        let merc = Mercator::new(&ProjParameters {
            ellipsoid,
            lat_ts: Some(45.0),
            ..Default::default()
        });

        let (x, _) = merc.project(0.0, 1.0);
        assert_abs_diff_eq!(
            x,
            msfn(f64::to_radians(45.0), ellipsoid.e2()),
            epsilon = 1e-15
        );

        let (phi, lambda) = merc.invproject(0.3, -0.4);
        let (x, y) = merc.project(phi, lambda);
        assert_abs_diff_eq!(x, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(y, -0.4, epsilon = 1e-12);
    }
}
