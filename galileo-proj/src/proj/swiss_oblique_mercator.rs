use super::common::LATITUDE_EPSILON;
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::ellipsoid::MAX_ITERATIONS;
use crate::error::GalileoProjError;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Swiss oblique Mercator projection, the ellipsoid is mapped onto a sphere and then projected with
/// an oblique cylinder touching it along the great circle through the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct SwissObliqueMercator {
    e: f64,
    phi0: f64,
    k_r: f64,
    alpha: f64,
    b0: f64,
    k: f64,
}

impl SwissObliqueMercator {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let lat_0 =
            ProjParameters::require(params.lat_0, "lat_0", ProjKind::SwissObliqueMercator)?;
        let phi0 = lat_0.to_radians();
        let e = params.ellipsoid.e();
        let e2 = params.ellipsoid.e2();
        let sin_phi0 = phi0.sin();

        let k_r = (1.0 - e2).sqrt() / (1.0 - e2 * sin_phi0 * sin_phi0);
        let alpha = (1.0 + params.ellipsoid.eb2() * phi0.cos().powi(4)).sqrt();
        let b0 = (sin_phi0 / alpha).asin();
        let k = (FRAC_PI_4 + b0 / 2.0).tan().ln() - alpha * (FRAC_PI_4 + phi0 / 2.0).tan().ln()
            + alpha * e / 2.0 * ((1.0 + e * sin_phi0) / (1.0 - e * sin_phi0)).ln();

        Ok(Self {
            e,
            phi0,
            k_r,
            alpha,
            b0,
            k,
        })
    }
}

impl BaseProjection for SwissObliqueMercator {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let e_sin = self.e * phi.sin();
        let s = self.alpha * (FRAC_PI_4 + phi / 2.0).tan().ln()
            - self.alpha * self.e / 2.0 * ((1.0 + e_sin) / (1.0 - e_sin)).ln()
            + self.k;
        let b = 2.0 * (s.exp().atan() - FRAC_PI_4);
        let l = self.alpha * lambda;

        let lb = l
            .sin()
            .atan2(self.b0.sin() * b.tan() + self.b0.cos() * l.cos());
        let bb = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * l.cos()).asin();

        (
            self.k_r * lb,
            self.k_r / 2.0 * ((1.0 + bb.sin()) / (1.0 - bb.sin())).ln(),
        )
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lb = x / self.k_r;
        let bb = 2.0 * ((y / self.k_r).exp().atan() - FRAC_PI_4);
        let b = (self.b0.cos() * bb.sin() + self.b0.sin() * bb.cos() * lb.cos()).asin();
        let l = lb
            .sin()
            .atan2(self.b0.cos() * lb.cos() - self.b0.sin() * bb.tan());
        let lambda = l / self.alpha;

        let base = ((FRAC_PI_4 + b / 2.0).tan().ln() - self.k) / self.alpha;
        let mut phi = b;
        for _ in 0..MAX_ITERATIONS {
            let s = base
                + self.e * (FRAC_PI_4 + (self.e * phi.sin()).asin() / 2.0).tan().ln();
            let next = 2.0 * s.exp().atan() - FRAC_PI_2;
            if (next - phi).abs() < LATITUDE_EPSILON {
                return (next, lambda);
            }
            phi = next;
        }

        (f64::NAN, lambda)
    }

    fn algorithm_bounds(&self) -> Bounds {
        let lat0 = self.phi0.to_degrees();
        Bounds::from_lon_lat(-2.0, lat0 - 1.5, 2.0, lat0 + 1.5)
    }
}
