use super::common::{msfn, phi2, tsfn};
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::error::GalileoProjError;
use std::f64::consts::FRAC_PI_2;

/// Lambert conformal conic projection.
///
/// With `lat_1` (and optionally `lat_2`) the cone is secant along the two standard parallels.
/// With only `lat_0` the cone is tangent along the latitude of origin and the scale there is set
/// by `+k_0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformalConic {
    e: f64,
    n: f64,
    f: f64,
    rho0: f64,
}

impl LambertConformalConic {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let e = params.ellipsoid.e();
        let e2 = params.ellipsoid.e2();

        match (params.lat_1, params.lat_0) {
            (Some(lat_1), lat_0) => {
                let lat_2 = params.lat_2.unwrap_or(lat_1);
                if (lat_1 + lat_2).abs() < 1e-10 {
                    return Err(GalileoProjError::InvalidParameter {
                        param: "lat_2".into(),
                        reason: "standard parallels must not be symmetric around the equator"
                            .into(),
                    });
                }

                let (phi1, phi2) = (lat_1.to_radians(), lat_2.to_radians());
                let m1 = msfn(phi1, e2);
                let t1 = tsfn(phi1, e);
                let n = if (phi1 - phi2).abs() > 1e-10 {
                    (m1 / msfn(phi2, e2)).ln() / (t1 / tsfn(phi2, e)).ln()
                } else {
                    phi1.sin()
                };

                Ok(Self::with_cone(e, n, m1 / (n * t1.powf(n)), lat_0.unwrap_or(0.0)))
            }
            (None, Some(lat_0)) => {
                let phi0 = lat_0.to_radians();
                if phi0.abs() < 1e-10 {
                    return Err(GalileoProjError::InvalidParameter {
                        param: "lat_0".into(),
                        reason: "tangent cone requires non-zero latitude of origin".into(),
                    });
                }

                let n = phi0.sin();
                let f = msfn(phi0, e2) / (n * tsfn(phi0, e).powf(n));
                Ok(Self::with_cone(e, n, f, lat_0))
            }
            (None, None) => Err(GalileoProjError::MissingParameter {
                param: "lat_1".into(),
                proj: ProjKind::LambertConformalConic.id().into(),
            }),
        }
    }

    fn with_cone(e: f64, n: f64, f: f64, lat_0: f64) -> Self {
        let rho0 = f * tsfn(lat_0.to_radians(), e).powf(n);
        Self { e, n, f, rho0 }
    }
}

impl BaseProjection for LambertConformalConic {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let rho = if (phi.abs() - FRAC_PI_2).abs() < 1e-10 {
            if phi * self.n > 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            self.f * tsfn(phi, self.e).powf(self.n)
        };

        let theta = self.n * lambda;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let (x, y) = (sign * x, sign * (self.rho0 - y));
        let rho = x.hypot(y);

        if rho == 0.0 {
            return (FRAC_PI_2 * sign, 0.0);
        }

        let ts = (rho / self.f).powf(1.0 / self.n);
        (phi2(ts, self.e), x.atan2(y) / self.n)
    }

    fn algorithm_bounds(&self) -> Bounds {
        if self.n > 0.0 {
            Bounds::from_lon_lat(-180.0, -80.0, 180.0, 89.0)
        } else {
            Bounds::from_lon_lat(-180.0, -89.0, 180.0, 80.0)
        }
    }
}
