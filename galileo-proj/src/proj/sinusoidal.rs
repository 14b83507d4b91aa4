use super::common::{inv_mlfn, mlfn};
use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;
use crate::ellipsoid::Ellipsoid;
use std::f64::consts::FRAC_PI_2;

/// Sinusoidal (Sanson-Flamsteed) equal area projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Sinusoidal {
    ellipsoid: Ellipsoid,
}

impl Sinusoidal {
    pub(super) fn new(params: &ProjParameters) -> Self {
        Self {
            ellipsoid: params.ellipsoid,
        }
    }
}

impl BaseProjection for Sinusoidal {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let (sin, cos) = phi.sin_cos();
        let x = lambda * cos / (1.0 - self.ellipsoid.e2() * sin * sin).sqrt();
        (x, mlfn(&self.ellipsoid, phi))
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let phi = inv_mlfn(&self.ellipsoid, y);
        if (phi.abs() - FRAC_PI_2).abs() < 1e-12 {
            return (phi, 0.0);
        }

        let sin = phi.sin();
        let lambda = x * (1.0 - self.ellipsoid.e2() * sin * sin).sqrt() / phi.cos();
        (phi, lambda)
    }

    fn algorithm_bounds(&self) -> Bounds {
        Bounds::from_lon_lat(-180.0, -89.0, 180.0, 89.0)
    }
}
