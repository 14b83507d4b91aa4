use super::common::{inv_mlfn, mlfn};
use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;
use crate::ellipsoid::Ellipsoid;

const C1: f64 = 1.0 / 6.0;
const C2: f64 = 1.0 / 120.0;
const C3: f64 = 1.0 / 24.0;
const C4: f64 = 1.0 / 3.0;
const C5: f64 = 1.0 / 15.0;

/// Cassini-Soldner projection, series form for the ellipsoid.
#[derive(Debug, Clone, PartialEq)]
pub struct CassiniSoldner {
    ellipsoid: Ellipsoid,
    m0: f64,
}

impl CassiniSoldner {
    pub(super) fn new(params: &ProjParameters) -> Self {
        let ellipsoid = params.ellipsoid;
        let m0 = mlfn(&ellipsoid, params.lat_0.unwrap_or(0.0).to_radians());
        Self { ellipsoid, m0 }
    }
}

impl BaseProjection for CassiniSoldner {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let es = self.ellipsoid.e2();
        let (sin, cos) = phi.sin_cos();
        let n = 1.0 / (1.0 - es * sin * sin).sqrt();
        let tn = phi.tan();
        let t = tn * tn;
        let a1 = lambda * cos;
        let c = es * cos * cos / (1.0 - es);
        let a2 = a1 * a1;

        let x = n * a1 * (1.0 - a2 * t * (C1 - (8.0 - t + 8.0 * c) * a2 * C2));
        let y = mlfn(&self.ellipsoid, phi) - self.m0
            + n * tn * a2 * (0.5 + (5.0 - t + 6.0 * c) * a2 * C3);
        (x, y)
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let es = self.ellipsoid.e2();
        let phi1 = inv_mlfn(&self.ellipsoid, self.m0 + y);
        let tn = phi1.tan();
        let t = tn * tn;
        let sin = phi1.sin();
        let r = 1.0 / (1.0 - es * sin * sin);
        let n = r.sqrt();
        let r = r * (1.0 - es) * n;
        let dd = x / n;
        let d2 = dd * dd;

        let phi = phi1 - (n * tn / r) * d2 * (0.5 - (1.0 + 3.0 * t) * d2 * C3);
        let lambda = dd * (1.0 + t * d2 * (-C4 + (1.0 + 3.0 * t) * d2 * C5)) / phi1.cos();
        (phi, lambda)
    }

    fn algorithm_bounds(&self) -> Bounds {
        Bounds::from_lon_lat(-1.5, -75.0, 1.5, 75.0)
    }
}
