use super::common::{msfn, phi_from_q, qsfn};
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::error::GalileoProjError;
use std::f64::consts::FRAC_PI_2;

/// Albers equal area conic projection.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbersEqualArea {
    e: f64,
    n: f64,
    c: f64,
    rho0: f64,
    qp: f64,
}

impl AlbersEqualArea {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let lat_1 = ProjParameters::require(params.lat_1, "lat_1", ProjKind::AlbersEqualArea)?;
        let lat_2 = params.lat_2.unwrap_or(lat_1);
        if (lat_1 + lat_2).abs() < 1e-10 {
            return Err(GalileoProjError::InvalidParameter {
                param: "lat_2".into(),
                reason: "standard parallels must not be symmetric around the equator".into(),
            });
        }

        let e = params.ellipsoid.e();
        let e2 = params.ellipsoid.e2();
        let (phi1, phi2) = (lat_1.to_radians(), lat_2.to_radians());

        let m1 = msfn(phi1, e2);
        let q1 = qsfn(phi1, e);
        let n = if (phi1 - phi2).abs() > 1e-10 {
            let m2 = msfn(phi2, e2);
            (m1 * m1 - m2 * m2) / (qsfn(phi2, e) - q1)
        } else {
            phi1.sin()
        };

        let c = m1 * m1 + n * q1;
        let q0 = qsfn(params.lat_0.unwrap_or(0.0).to_radians(), e);

        Ok(Self {
            e,
            n,
            c,
            rho0: (c - n * q0).sqrt() / n,
            qp: qsfn(FRAC_PI_2, e),
        })
    }
}

impl BaseProjection for AlbersEqualArea {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let rho = (self.c - self.n * qsfn(phi, self.e)).max(0.0).sqrt() / self.n;
        let theta = self.n * lambda;
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let (x, y) = (sign * x, sign * (self.rho0 - y));
        let rho = x.hypot(y);
        let q = (self.c - (rho * self.n).powi(2)) / self.n;

        (phi_from_q(q, self.qp, self.e), x.atan2(y) / self.n)
    }

    fn algorithm_bounds(&self) -> Bounds {
        Bounds::from_lon_lat(-180.0, -85.0, 180.0, 85.0)
    }
}
