use super::common::{msfn, phi_from_q, qsfn};
use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;
use std::f64::consts::FRAC_PI_2;

const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aspect {
    North,
    South,
    Oblique,
}

/// Lambert azimuthal equal area projection in the polar or oblique aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    aspect: Aspect,
    e: f64,
    phi0: f64,
    qp: f64,
    rq: f64,
    sin_beta1: f64,
    cos_beta1: f64,
    d: f64,
}

impl LambertAzimuthalEqualArea {
    pub(super) fn new(params: &ProjParameters) -> Self {
        let e = params.ellipsoid.e();
        let phi0 = params.lat_0.unwrap_or(0.0).to_radians();
        let qp = qsfn(FRAC_PI_2, e);
        let rq = (qp / 2.0).sqrt();

        let aspect = if (phi0.abs() - FRAC_PI_2).abs() < EPSILON {
            if phi0 > 0.0 {
                Aspect::North
            } else {
                Aspect::South
            }
        } else {
            Aspect::Oblique
        };

        let beta1 = (qsfn(phi0, e) / qp).clamp(-1.0, 1.0).asin();
        let d = msfn(phi0, params.ellipsoid.e2()) / (rq * beta1.cos());

        Self {
            aspect,
            e,
            phi0,
            qp,
            rq,
            sin_beta1: beta1.sin(),
            cos_beta1: beta1.cos(),
            d,
        }
    }
}

impl BaseProjection for LambertAzimuthalEqualArea {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let q = qsfn(phi, self.e);
        match self.aspect {
            Aspect::North => {
                let rho = (self.qp - q).max(0.0).sqrt();
                (rho * lambda.sin(), -rho * lambda.cos())
            }
            Aspect::South => {
                let rho = (self.qp + q).max(0.0).sqrt();
                (rho * lambda.sin(), rho * lambda.cos())
            }
            Aspect::Oblique => {
                let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
                let (sin_beta, cos_beta) = beta.sin_cos();
                let b = self.rq
                    * (2.0
                        / (1.0
                            + self.sin_beta1 * sin_beta
                            + self.cos_beta1 * cos_beta * lambda.cos()))
                    .sqrt();

                (
                    b * self.d * cos_beta * lambda.sin(),
                    b / self.d
                        * (self.cos_beta1 * sin_beta - self.sin_beta1 * cos_beta * lambda.cos()),
                )
            }
        }
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        match self.aspect {
            Aspect::North => {
                let rho2 = x * x + y * y;
                (phi_from_q(self.qp - rho2, self.qp, self.e), x.atan2(-y))
            }
            Aspect::South => {
                let rho2 = x * x + y * y;
                (phi_from_q(rho2 - self.qp, self.qp, self.e), x.atan2(y))
            }
            Aspect::Oblique => {
                let rho = (x / self.d).hypot(self.d * y);
                if rho < EPSILON {
                    return (self.phi0, 0.0);
                }

                let ce = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
                let (sin_ce, cos_ce) = ce.sin_cos();
                let q = self.qp
                    * (cos_ce * self.sin_beta1 + self.d * y * sin_ce * self.cos_beta1 / rho);
                let lambda = (x * sin_ce).atan2(
                    self.d * rho * self.cos_beta1 * cos_ce
                        - self.d * self.d * y * self.sin_beta1 * sin_ce,
                );

                (phi_from_q(q, self.qp, self.e), lambda)
            }
        }
    }

    fn algorithm_bounds(&self) -> Bounds {
        match self.aspect {
            Aspect::North => Bounds::from_lon_lat(-180.0, 20.0, 180.0, 90.0),
            Aspect::South => Bounds::from_lon_lat(-180.0, -90.0, 180.0, -20.0),
            Aspect::Oblique => {
                let lat0 = self.phi0.to_degrees();
                Bounds::from_lon_lat(
                    -90.0,
                    (lat0 - 70.0).max(-90.0),
                    90.0,
                    (lat0 + 70.0).min(90.0),
                )
            }
        }
    }
}
