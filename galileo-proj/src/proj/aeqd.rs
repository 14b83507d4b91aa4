//! Azimuthal equidistant projection.
//!
//! Distances and azimuths from the center are preserved. Polar aspects use the meridian arc, the
//! oblique aspect solves the geodesic problems with Vincenty's formulas.

use super::common::{inv_mlfn, mlfn};
use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;
use crate::ellipsoid::Ellipsoid;
use std::f64::consts::FRAC_PI_2;

const VINCENTY_EPSILON: f64 = 1e-13;
const MAX_VINCENTY_ITERATIONS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aspect {
    North,
    South,
    Oblique,
}

/// Azimuthal equidistant projection.
#[derive(Debug, Clone, PartialEq)]
pub struct AzimuthalEquidistant {
    aspect: Aspect,
    ellipsoid: Ellipsoid,
    phi0: f64,
    mp: f64,
    // Unit ellipsoid flattening and semi-minor axis.
    f: f64,
    b: f64,
}

impl AzimuthalEquidistant {
    pub(super) fn new(params: &ProjParameters) -> Self {
        let ellipsoid = params.ellipsoid;
        let phi0 = params.lat_0.unwrap_or(0.0).to_radians();
        let aspect = if (phi0.abs() - FRAC_PI_2).abs() < 1e-10 {
            if phi0 > 0.0 {
                Aspect::North
            } else {
                Aspect::South
            }
        } else {
            Aspect::Oblique
        };

        let b = ellipsoid.b() / ellipsoid.a();
        Self {
            aspect,
            ellipsoid,
            phi0,
            mp: mlfn(&ellipsoid, FRAC_PI_2),
            f: 1.0 - b,
            b,
        }
    }

    /// Distance and azimuth from the center to the given point.
    fn geodesic_inverse(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let f = self.f;
        let u1 = ((1.0 - f) * self.phi0.tan()).atan();
        let u2 = ((1.0 - f) * phi.tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut l = lambda;
        let mut sin_sigma = 0.0;
        let mut cos_sigma = 1.0;
        let mut sigma = 0.0;
        let mut cos2_alpha = 1.0;
        let mut cos_2sigma_m = 0.0;

        for _ in 0..MAX_VINCENTY_ITERATIONS {
            let (sin_l, cos_l) = l.sin_cos();
            sin_sigma = (cos_u2 * sin_l).hypot(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_l);
            if sin_sigma == 0.0 {
                return (0.0, 0.0);
            }

            cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_l;
            sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_l / sin_sigma;
            cos2_alpha = 1.0 - sin_alpha * sin_alpha;
            cos_2sigma_m = if cos2_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
            } else {
                0.0
            };

            let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
            let previous = l;
            l = lambda
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
            if (l - previous).abs() < VINCENTY_EPSILON {
                break;
            }
        }

        let (big_a, big_b) = self.series(cos2_alpha);
        let delta_sigma = delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        let s = self.b * big_a * (sigma - delta_sigma);

        let (sin_l, cos_l) = l.sin_cos();
        let azimuth = (cos_u2 * sin_l).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_l);
        (s, azimuth)
    }

    /// Point at the given distance and azimuth from the center.
    fn geodesic_direct(&self, s: f64, azimuth: f64) -> (f64, f64) {
        let f = self.f;
        let (sin_alpha1, cos_alpha1) = azimuth.sin_cos();
        let tan_u1 = (1.0 - f) * self.phi0.tan();
        let cos_u1 = 1.0 / tan_u1.hypot(1.0);
        let sin_u1 = tan_u1 * cos_u1;

        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        let (big_a, big_b) = self.series(cos2_alpha);

        let mut sigma = s / (self.b * big_a);
        let mut cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        for _ in 0..MAX_VINCENTY_ITERATIONS {
            cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
            let delta = delta_sigma(big_b, sigma.sin(), sigma.cos(), cos_2sigma_m);
            let previous = sigma;
            sigma = s / (self.b * big_a) + delta;
            if (sigma - previous).abs() < VINCENTY_EPSILON {
                break;
            }
        }

        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let phi = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * sin_alpha.hypot(tmp));
        let l = (sin_sigma * sin_alpha1)
            .atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let lambda = l
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        (phi, lambda)
    }

    fn series(&self, cos2_alpha: f64) -> (f64, f64) {
        let u2 = cos2_alpha * (1.0 - self.b * self.b) / (self.b * self.b);
        let a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
        let b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));
        (a, b)
    }
}

fn delta_sigma(b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    b * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * c2)))
}

impl BaseProjection for AzimuthalEquidistant {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        match self.aspect {
            Aspect::North => {
                let rho = self.mp - mlfn(&self.ellipsoid, phi);
                (rho * lambda.sin(), -rho * lambda.cos())
            }
            Aspect::South => {
                let rho = self.mp + mlfn(&self.ellipsoid, phi);
                (rho * lambda.sin(), rho * lambda.cos())
            }
            Aspect::Oblique => {
                let (s, azimuth) = self.geodesic_inverse(phi, lambda);
                (s * azimuth.sin(), s * azimuth.cos())
            }
        }
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        match self.aspect {
            Aspect::North => (inv_mlfn(&self.ellipsoid, self.mp - rho), x.atan2(-y)),
            Aspect::South => (inv_mlfn(&self.ellipsoid, rho - self.mp), x.atan2(y)),
            Aspect::Oblique => {
                if rho == 0.0 {
                    return (self.phi0, 0.0);
                }
                self.geodesic_direct(rho, x.atan2(y))
            }
        }
    }

    fn algorithm_bounds(&self) -> Bounds {
        match self.aspect {
            Aspect::North => Bounds::from_lon_lat(-180.0, 0.0, 180.0, 90.0),
            Aspect::South => Bounds::from_lon_lat(-180.0, -90.0, 180.0, 0.0),
            Aspect::Oblique => {
                let lat0 = self.phi0.to_degrees();
                Bounds::from_lon_lat(
                    -60.0,
                    (lat0 - 60.0).max(-89.0),
                    60.0,
                    (lat0 + 60.0).min(89.0),
                )
            }
        }
    }
}
