//! Transverse Mercator in Krüger series form.
//!
//! Series of the 6th order in the third flattening `n`, accurate to a millimeter within a few
//! thousand kilometers from the central meridian.

use super::{BaseProjection, ProjParameters};
use crate::bounds::Bounds;

const MAX_TAU_ITERATIONS: usize = 15;

/// Transverse Mercator projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    e: f64,
    e2: f64,
    // Rectifying radius on the unit ellipsoid.
    a_hat: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
    // Rectifying latitude of the origin.
    xi0: f64,
}

impl TransverseMercator {
    pub(super) fn new(params: &ProjParameters) -> Self {
        let ellipsoid = &params.ellipsoid;
        let n = (ellipsoid.a() - ellipsoid.b()) / (ellipsoid.a() + ellipsoid.b());
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let a_hat = (1.0 + n2 / 4.0 + n4 / 64.0) / (1.0 + n);

        #[rustfmt::skip]
        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            212378941.0 / 319334400.0 * n6,
        ];

        #[rustfmt::skip]
        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            20648693.0 / 638668800.0 * n6,
        ];

        let lat_0 = params.lat_0.unwrap_or(0.0).to_radians();
        let xi0 = ellipsoid.meridional_arc(lat_0) / ellipsoid.a() / a_hat;

        Self {
            e: ellipsoid.e(),
            e2: ellipsoid.e2(),
            a_hat,
            alpha,
            beta,
            xi0,
        }
    }

    /// Conformal tangent `τ'` from the geodetic tangent `τ`.
    fn tau_prime(&self, tau: f64) -> f64 {
        let tau1 = tau.hypot(1.0);
        let sigma = (self.e * (self.e * tau / tau1).atanh()).sinh();
        tau * sigma.hypot(1.0) - sigma * tau1
    }

    /// Geodetic tangent from the conformal one, Newton iteration.
    fn tau(&self, tau_prime: f64) -> f64 {
        let mut tau = tau_prime;
        for _ in 0..MAX_TAU_ITERATIONS {
            let tau1 = tau.hypot(1.0);
            let estimate = self.tau_prime(tau);
            let delta = (tau_prime - estimate) * (1.0 + (1.0 - self.e2) * tau * tau)
                / ((1.0 - self.e2) * tau1 * estimate.hypot(1.0));
            tau += delta;
            if delta.abs() < 1e-14 * (1.0 + tau.abs()) {
                break;
            }
        }

        tau
    }
}

impl BaseProjection for TransverseMercator {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        let tau_prime = self.tau_prime(phi.tan());
        let xi_prime = tau_prime.atan2(lambda.cos());
        let eta_prime = (lambda.sin() / tau_prime.hypot(lambda.cos())).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        (self.a_hat * eta, self.a_hat * (xi - self.xi0))
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let eta = x / self.a_hat;
        let xi = y / self.a_hat + self.xi0;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let cos_xi = xi_prime.cos();
        let tau_prime = xi_prime.sin() / sinh_eta.hypot(cos_xi);

        (self.tau(tau_prime).atan(), sinh_eta.atan2(cos_xi))
    }

    fn algorithm_bounds(&self) -> Bounds {
        Bounds::from_lon_lat(-7.0, -89.0, 7.0, 89.0)
    }
}
