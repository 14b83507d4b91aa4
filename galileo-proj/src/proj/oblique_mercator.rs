//! Hotine oblique Mercator.
//!
//! The central line is given either by a point and an azimuth (`lonc`, `lat_0`, `alpha` and
//! optionally `gamma`) or by two points (`lon_1`, `lat_1`, `lon_2`, `lat_2`). Without `no_off`
//! the origin of the coordinates is the projection center, with it the natural origin on the
//! equator of the aposphere.

use super::common::{normalize_lon, phi2, tsfn};
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::error::GalileoProjError;
use std::f64::consts::{FRAC_PI_2, PI};

const EPSILON: f64 = 1e-6;
const EPSILON_LATITUDE: f64 = 1e-10;

/// Hotine oblique Mercator projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ObliqueMercator {
    e: f64,
    b: f64,
    big_e: f64,
    a_over_b: f64,
    a_times_b: f64,
    b_over_a: f64,
    v_pole_n: f64,
    v_pole_s: f64,
    sin_gamma0: f64,
    cos_gamma0: f64,
    sin_rot: f64,
    cos_rot: f64,
    u_c: f64,
    central_meridian: f64,
    reference_lat: f64,
    reference_lon: f64,
}

impl ObliqueMercator {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let kind = ProjKind::ObliqueMercator;
        let e = params.ellipsoid.e();
        let e2 = params.ellipsoid.e2();
        let lat_center = params.lat_0.unwrap_or(0.0).to_radians();

        let com = (1.0 - e2).sqrt();
        let (sin_ph0, cos_ph0) = lat_center.sin_cos();
        let con = 1.0 - e2 * sin_ph0 * sin_ph0;
        let b = (1.0 + e2 * cos_ph0.powi(4) / (1.0 - e2)).sqrt();
        let a = b * com / con;
        let d = b * com / (cos_ph0 * con.sqrt());
        let mut f = d * d - 1.0;
        if f < 0.0 {
            f = 0.0;
        } else {
            f = f.sqrt();
            if lat_center < 0.0 {
                f = -f;
            }
        }
        f += d;
        let big_e = f * tsfn(lat_center, e).powf(b);

        let invalid = |param: &str, reason: &str| GalileoProjError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        };

        let gamma0;
        let azimuth;
        let rectified_grid_angle;
        let central_meridian;
        let lon_center;
        let reference;

        match params.alpha {
            None => {
                let lon_1 = ProjParameters::require(params.lon_1, "lon_1", kind)?;
                let lat_1 = ProjParameters::require(params.lat_1, "lat_1", kind)?;
                let lon_2 = ProjParameters::require(params.lon_2, "lon_2", kind)?;
                let lat_2 = ProjParameters::require(params.lat_2, "lat_2", kind)?;
                reference = (lat_1, lon_1);

                let lon1 = lon_1.to_radians();
                let lat1 = lat_1.to_radians();
                let mut lon2 = lon_2.to_radians();
                let lat2 = lat_2.to_radians();

                if (lat1 - lat2).abs() <= EPSILON
                    || lat1.abs() <= EPSILON
                    || (lat1.abs() - FRAC_PI_2).abs() <= EPSILON
                    || (lat_center.abs() - FRAC_PI_2).abs() <= EPSILON
                    || (lat2.abs() - FRAC_PI_2).abs() <= EPSILON
                {
                    return Err(invalid(
                        "lat_1",
                        "unsuitable latitudes for the two point definition",
                    ));
                }

                let h = tsfn(lat1, e).powf(b);
                let l = tsfn(lat2, e).powf(b);
                let fp = big_e / h;
                let p = (l - h) / (l + h);
                let j = (big_e * big_e - l * h) / (big_e * big_e + l * h);
                let diff = lon1 - lon2;
                if diff < -PI {
                    lon2 -= 2.0 * PI;
                } else if diff > PI {
                    lon2 += 2.0 * PI;
                }

                central_meridian = normalize_lon(
                    0.5 * (lon1 + lon2) - (j * (0.5 * b * (lon1 - lon2)).tan() / p).atan() / b,
                );
                gamma0 = (2.0 * (b * normalize_lon(lon1 - central_meridian)).sin()
                    / (fp - 1.0 / fp))
                    .atan();
                azimuth = (d * gamma0.sin()).asin();
                rectified_grid_angle = azimuth;
                lon_center = None;
            }
            Some(alpha) => {
                let lonc = ProjParameters::require(params.lonc, "lonc", kind)?;
                let lat_0 = ProjParameters::require(params.lat_0, "lat_0", kind)?;
                reference = (lat_0, lonc);

                azimuth = alpha.to_radians();
                if (azimuth > -1.5 * PI && azimuth < -0.5 * PI)
                    || (azimuth > 0.5 * PI && azimuth < 1.5 * PI)
                {
                    return Err(invalid("alpha", "azimuth must point north"));
                }

                rectified_grid_angle = params.gamma.map_or(azimuth, f64::to_radians);
                gamma0 = (azimuth.sin() / d).asin();

                let mut temp = 0.5 * (f - 1.0 / f) * gamma0.tan();
                if temp.abs() > 1.0 {
                    if (temp.abs() - 1.0).abs() > EPSILON {
                        return Err(invalid("alpha", "central line does not cross the center"));
                    }
                    temp = temp.signum();
                }

                let lonc = lonc.to_radians();
                central_meridian = lonc - temp.asin() / b;
                lon_center = Some(lonc);
            }
        }

        let a_over_b = a / b;
        let u_c = if params.no_off {
            0.0
        } else if (azimuth.abs() - FRAC_PI_2).abs() < EPSILON_LATITUDE {
            // Azimuth of 90° is only possible with the point and azimuth definition.
            match lon_center {
                Some(lon_center) => a * (lon_center - central_meridian),
                None => return Err(invalid("alpha", "azimuth of the central line is 90°")),
            }
        } else {
            let u_c = (a_over_b * (d * d - 1.0).sqrt().atan2(azimuth.cos())).abs();
            if lat_center < 0.0 {
                -u_c
            } else {
                u_c
            }
        };

        Ok(Self {
            e,
            b,
            big_e,
            a_over_b,
            a_times_b: a * b,
            b_over_a: b / a,
            v_pole_n: a_over_b * (0.5 * (FRAC_PI_2 - gamma0)).tan().ln(),
            v_pole_s: a_over_b * (0.5 * (FRAC_PI_2 + gamma0)).tan().ln(),
            sin_gamma0: gamma0.sin(),
            cos_gamma0: gamma0.cos(),
            sin_rot: rectified_grid_angle.sin(),
            cos_rot: rectified_grid_angle.cos(),
            u_c,
            central_meridian,
            reference_lat: reference.0,
            reference_lon: reference.1,
        })
    }
}

impl BaseProjection for ObliqueMercator {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let lambda = normalize_lon(lambda);
        let (u, v) = if (phi.abs() - FRAC_PI_2).abs() > EPSILON {
            let q = self.big_e / tsfn(phi, self.e).powf(self.b);
            let s = 0.5 * (q - 1.0 / q);
            let t = 0.5 * (q + 1.0 / q);
            let v_ = (self.b * lambda).sin();
            let u_ = (s * self.sin_gamma0 - v_ * self.cos_gamma0) / t;

            let v = if (u_.abs() - 1.0).abs() < EPSILON {
                0.0
            } else {
                0.5 * self.a_over_b * ((1.0 - u_) / (1.0 + u_)).ln()
            };

            let cos = (self.b * lambda).cos();
            let u = if cos.abs() < EPSILON_LATITUDE {
                self.a_times_b * lambda
            } else {
                self.a_over_b * (s * self.cos_gamma0 + v_ * self.sin_gamma0).atan2(cos)
            };
            (u, v)
        } else {
            let v = if phi > 0.0 { self.v_pole_n } else { self.v_pole_s };
            (self.a_over_b * phi, v)
        };

        let u = u - self.u_c;
        (
            v * self.cos_rot + u * self.sin_rot,
            u * self.cos_rot - v * self.sin_rot,
        )
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let v = x * self.cos_rot - y * self.sin_rot;
        let u = y * self.cos_rot + x * self.sin_rot + self.u_c;

        let qp = (-self.b_over_a * v).exp();
        let sp = 0.5 * (qp - 1.0 / qp);
        let tp = 0.5 * (qp + 1.0 / qp);
        let vp = (self.b_over_a * u).sin();
        let up = (vp * self.cos_gamma0 + sp * self.sin_gamma0) / tp;

        if (up.abs() - 1.0).abs() < EPSILON {
            let phi = if up < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
            return (phi, 0.0);
        }

        let t = (self.big_e / ((1.0 + up) / (1.0 - up)).sqrt()).powf(1.0 / self.b);
        let lambda =
            -(sp * self.cos_gamma0 - vp * self.sin_gamma0).atan2((self.b_over_a * u).cos()) / self.b;
        (phi2(t, self.e), lambda)
    }

    fn algorithm_bounds(&self) -> Bounds {
        let lon = self.reference_lon - self.central_meridian.to_degrees();
        Bounds::from_lon_lat(
            lon - 3.0,
            self.reference_lat - 3.0,
            lon + 3.0,
            self.reference_lat + 3.0,
        )
    }

    fn central_meridian(&self) -> Option<f64> {
        Some(self.central_meridian.to_degrees())
    }
}
