use super::common::LATITUDE_EPSILON;
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::ellipsoid::MAX_ITERATIONS;
use crate::error::GalileoProjError;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Oblique stereographic projection.
///
/// The ellipsoid is first mapped conformally onto the Gauss sphere, which is then projected
/// stereographically around the image of the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleStereographic {
    phi0: f64,
    e: f64,
    c: f64,
    k: f64,
    ratexp: f64,
    sin_c0: f64,
    cos_c0: f64,
    r2: f64,
}

impl DoubleStereographic {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let lat_0 = ProjParameters::require(params.lat_0, "lat_0", ProjKind::DoubleStereographic)?;
        let phi0 = lat_0.to_radians();
        let e = params.ellipsoid.e();
        let es = params.ellipsoid.e2();

        let (sin_phi0, cos_phi0) = phi0.sin_cos();
        let c = (1.0 + es * cos_phi0.powi(4) / (1.0 - es)).sqrt();
        let rc = (1.0 - es).sqrt() / (1.0 - es * sin_phi0 * sin_phi0);
        let phic0 = (sin_phi0 / c).asin();
        let ratexp = 0.5 * c * e;
        let k = (0.5 * phic0 + FRAC_PI_4).tan()
            / ((0.5 * phi0 + FRAC_PI_4).tan().powf(c) * srat(e * sin_phi0, ratexp));

        Ok(Self {
            phi0,
            e,
            c,
            k,
            ratexp,
            sin_c0: phic0.sin(),
            cos_c0: phic0.cos(),
            r2: 2.0 * rc,
        })
    }

    fn to_sphere(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let phi = 2.0
            * (self.k
                * (0.5 * phi + FRAC_PI_4).tan().powf(self.c)
                * srat(self.e * phi.sin(), self.ratexp))
            .atan()
            - FRAC_PI_2;
        (phi, self.c * lambda)
    }

    fn from_sphere(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let num = ((0.5 * phi + FRAC_PI_4).tan() / self.k).powf(1.0 / self.c);
        let mut result = phi;
        for _ in 0..MAX_ITERATIONS {
            let next = 2.0 * (num * srat(self.e * result.sin(), -0.5 * self.e)).atan() - FRAC_PI_2;
            if (next - result).abs() < LATITUDE_EPSILON {
                return (next, lambda / self.c);
            }
            result = next;
        }

        (f64::NAN, lambda / self.c)
    }
}

fn srat(e_sin: f64, exp: f64) -> f64 {
    ((1.0 - e_sin) / (1.0 + e_sin)).powf(exp)
}

impl BaseProjection for DoubleStereographic {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let (phi, lambda) = self.to_sphere(phi, lambda);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let cos_lambda = lambda.cos();
        let k = self.r2 / (1.0 + self.sin_c0 * sin_phi + self.cos_c0 * cos_phi * cos_lambda);

        (
            k * cos_phi * lambda.sin(),
            k * (self.cos_c0 * sin_phi - self.sin_c0 * cos_phi * cos_lambda),
        )
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        let (phi, lambda) = if rho != 0.0 {
            let c = 2.0 * rho.atan2(self.r2);
            let (sin_c, cos_c) = c.sin_cos();
            (
                (cos_c * self.sin_c0 + y * sin_c * self.cos_c0 / rho).asin(),
                (x * sin_c).atan2(rho * self.cos_c0 * cos_c - y * self.sin_c0 * sin_c),
            )
        } else {
            (self.sin_c0.asin(), 0.0)
        };

        self.from_sphere(phi, lambda)
    }

    fn algorithm_bounds(&self) -> Bounds {
        let lat0 = self.phi0.to_degrees();
        Bounds::from_lon_lat(
            -40.0,
            (lat0 - 40.0).max(-89.0),
            40.0,
            (lat0 + 40.0).min(89.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use approx::assert_abs_diff_eq;

    fn rd_new() -> (DoubleStereographic, f64) {
        let ellipsoid = Ellipsoid::bessel1841();
        let sterea = DoubleStereographic::new(&ProjParameters {
            ellipsoid,
            lat_0: Some(52.15616055555555),
            ..Default::default()
        })
        .unwrap();
        (sterea, ellipsoid.a() * 0.9999079)
    }

    #[test]
    fn origin_maps_to_zero() {
        let (sterea, _) = rd_new();
        let (x, y) = sterea.project(f64::to_radians(52.15616055555555), 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);

        let (phi, lambda) = sterea.invproject(0.0, 0.0);
        assert_abs_diff_eq!(phi, f64::to_radians(52.15616055555555), epsilon = 1e-12);
        assert_abs_diff_eq!(lambda, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rd_new_reference_point() {
        // Point 53°N 6°E, lon_0 = 5°23'15.5"E.
        let (sterea, scale) = rd_new();
        let lon_0 = 5.0 + 23.0 / 60.0 + 15.5 / 3600.0;
        let (x, y) = sterea.project(f64::to_radians(53.0), f64::to_radians(6.0 - lon_0));

        assert_abs_diff_eq!(x * scale + 155_000.0, 196_105.283, epsilon = 0.01);
        assert_abs_diff_eq!(y * scale + 463_000.0, 557_057.739, epsilon = 0.01);

        let (phi, lambda) = sterea.invproject(x, y);
        assert_abs_diff_eq!(phi, f64::to_radians(53.0), epsilon = 1e-11);
        assert_abs_diff_eq!(lambda, f64::to_radians(6.0 - lon_0), epsilon = 1e-11);
    }
}
