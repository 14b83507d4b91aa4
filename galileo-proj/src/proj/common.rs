//! Helper functions shared by several projections. Angles are in radians.

use crate::ellipsoid::{Ellipsoid, MAX_ITERATIONS};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Convergence threshold for latitude iterations.
pub(super) const LATITUDE_EPSILON: f64 = 1e-11;

/// `tan(π/4 - φ/2) / ((1 - e·sinφ) / (1 + e·sinφ))^(e/2)`, the exponential of the negated
/// isometric latitude.
pub(super) fn tsfn(phi: f64, e: f64) -> f64 {
    let e_sin = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)
}

/// `cosφ / sqrt(1 - e²·sin²φ)`, radius of the parallel on the unit ellipsoid.
pub(super) fn msfn(phi: f64, e2: f64) -> f64 {
    phi.cos() / (1.0 - e2 * phi.sin().powi(2)).sqrt()
}

/// Authalic function `q(φ)`.
pub(super) fn qsfn(phi: f64, e: f64) -> f64 {
    let sin = phi.sin();
    if e < 1e-7 {
        return 2.0 * sin;
    }

    let e_sin = e * sin;
    (1.0 - e * e) * (sin / (1.0 - e_sin * e_sin) - (0.5 / e) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
}

/// Latitude from [`tsfn`] value. Returns NaN if not converged.
pub(super) fn phi2(ts: f64, e: f64) -> f64 {
    let half_e = e / 2.0;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();

    for _ in 0..MAX_ITERATIONS {
        let e_sin = e * phi.sin();
        let next = FRAC_PI_2 - 2.0 * (ts * ((1.0 - e_sin) / (1.0 + e_sin)).powf(half_e)).atan();
        let delta = (next - phi).abs();
        phi = next;
        if delta <= LATITUDE_EPSILON {
            return phi;
        }
    }

    f64::NAN
}

/// Latitude from the authalic function value `q`. `qp` is `q(π/2)`.
pub(super) fn phi_from_q(q: f64, qp: f64, e: f64) -> f64 {
    if (q.abs() - qp).abs() < 1e-12 || q.abs() > qp {
        return FRAC_PI_2.copysign(q);
    }
    if e < 1e-7 {
        return (q / 2.0).asin();
    }

    let e2 = e * e;
    let mut phi = (q / 2.0).asin();
    for _ in 0..MAX_ITERATIONS {
        let sin = phi.sin();
        let cos = phi.cos();
        let e_sin = e * sin;
        let com = 1.0 - e_sin * e_sin;
        let delta = com * com / (2.0 * cos)
            * (q / (1.0 - e2) - sin / com + 0.5 / e * ((1.0 - e_sin) / (1.0 + e_sin)).ln());
        phi += delta;
        if delta.abs() <= LATITUDE_EPSILON {
            return phi;
        }
    }

    f64::NAN
}

/// Meridian distance on the unit ellipsoid.
pub(super) fn mlfn(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    ellipsoid.meridional_arc(phi) / ellipsoid.a()
}

/// Latitude from the meridian distance on the unit ellipsoid (Newton iteration).
pub(super) fn inv_mlfn(ellipsoid: &Ellipsoid, arc: f64) -> f64 {
    let unit_radius = ellipsoid.meridional_radius_of_curvature(0.0) / ellipsoid.a();
    let mut phi = arc / unit_radius;

    for _ in 0..MAX_ITERATIONS {
        let derivative = ellipsoid.meridional_radius_of_curvature(phi) / ellipsoid.a();
        let delta = (mlfn(ellipsoid, phi) - arc) / derivative;
        phi -= delta;
        if delta.abs() <= LATITUDE_EPSILON {
            return phi;
        }
    }

    f64::NAN
}

/// Wraps longitude in radians into `[-π, π]`.
pub(super) fn normalize_lon(lon: f64) -> f64 {
    if (-PI..=PI).contains(&lon) {
        lon
    } else {
        (lon + PI).rem_euclid(2.0 * PI) - PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tsfn_inverse() {
        let e = Ellipsoid::wgs84().e();
        for deg in [-85.0, -30.0, 0.0, 12.5, 60.0, 89.5] {
            let phi: f64 = f64::to_radians(deg);
            assert_abs_diff_eq!(phi2(tsfn(phi, e), e), phi, epsilon = 1e-10);
        }
    }

    #[test]
    fn qsfn_inverse() {
        let e = Ellipsoid::grs80().e();
        let qp = qsfn(FRAC_PI_2, e);
        for deg in [-89.0, -45.0, 0.0, 23.0, 70.0] {
            let phi: f64 = f64::to_radians(deg);
            assert_abs_diff_eq!(phi_from_q(qsfn(phi, e), qp, e), phi, epsilon = 1e-10);
        }
        assert_eq!(phi_from_q(qp, qp, e), FRAC_PI_2);
    }

    #[test]
    fn meridian_distance_inverse() {
        let ellipsoid = Ellipsoid::bessel1841();
        for deg in [-80.0, -10.0, 0.0, 47.0, 88.0] {
            let phi: f64 = f64::to_radians(deg);
            assert_abs_diff_eq!(
                inv_mlfn(&ellipsoid, mlfn(&ellipsoid, phi)),
                phi,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn lon_normalization() {
        assert_eq!(normalize_lon(1.0), 1.0);
        assert_abs_diff_eq!(normalize_lon(PI + 0.5), -PI + 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_lon(-PI - 0.5), PI - 0.5, epsilon = 1e-12);
    }
}
