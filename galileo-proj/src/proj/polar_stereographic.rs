use super::common::{msfn, phi2, tsfn};
use super::{BaseProjection, ProjKind, ProjParameters};
use crate::bounds::Bounds;
use crate::error::GalileoProjError;
use std::f64::consts::FRAC_PI_2;

/// Polar stereographic projection.
///
/// `lat_0` must be one of the poles. With `lat_ts` the scale is true along that parallel,
/// otherwise at the pole.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographic {
    e: f64,
    north: bool,
    akm: f64,
}

impl PolarStereographic {
    pub(super) fn new(params: &ProjParameters) -> Result<Self, GalileoProjError> {
        let lat_0 = ProjParameters::require(params.lat_0, "lat_0", ProjKind::PolarStereographic)?;
        if (lat_0.abs() - 90.0).abs() > 1e-10 {
            return Err(GalileoProjError::InvalidParameter {
                param: "lat_0".into(),
                reason: "only polar aspect is supported".into(),
            });
        }

        let e = params.ellipsoid.e();
        let akm = match params.lat_ts {
            Some(lat_ts) if (lat_ts.abs() - 90.0).abs() > 1e-10 => {
                let phi_ts = lat_ts.abs().to_radians();
                msfn(phi_ts, params.ellipsoid.e2()) / tsfn(phi_ts, e)
            }
            _ => 2.0 / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt(),
        };

        Ok(Self {
            e,
            north: lat_0 > 0.0,
            akm,
        })
    }
}

impl BaseProjection for PolarStereographic {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        if self.north {
            let rho = self.akm * tsfn(phi, self.e);
            (rho * lambda.sin(), -rho * lambda.cos())
        } else {
            let rho = self.akm * tsfn(-phi, self.e);
            (rho * lambda.sin(), rho * lambda.cos())
        }
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = x.hypot(y);
        if rho == 0.0 {
            let pole = if self.north { FRAC_PI_2 } else { -FRAC_PI_2 };
            return (pole, 0.0);
        }

        let phi = phi2(rho / self.akm, self.e);
        if self.north {
            (phi, x.atan2(-y))
        } else {
            (-phi, x.atan2(y))
        }
    }

    fn algorithm_bounds(&self) -> Bounds {
        if self.north {
            Bounds::from_lon_lat(-180.0, 0.0, 180.0, 90.0)
        } else {
            Bounds::from_lon_lat(-180.0, -90.0, 180.0, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn antarctic_reference_point() {
        // lat_ts = 71°S, lon_0 = 70°E, false origin 6000 km; point 75°S 120°E.
        let ellipsoid = Ellipsoid::wgs84();
        let stere = PolarStereographic::new(&ProjParameters {
            ellipsoid,
            lat_0: Some(-90.0),
            lat_ts: Some(-71.0),
            ..Default::default()
        })
        .unwrap();

        let (x, y) = stere.project(f64::to_radians(-75.0), f64::to_radians(50.0));
        assert_abs_diff_eq!(x * ellipsoid.a() + 6_000_000.0, 7_255_380.79, epsilon = 0.01);
        assert_abs_diff_eq!(y * ellipsoid.a() + 6_000_000.0, 7_053_389.56, epsilon = 0.01);
    }

    #[test]
    fn north_pole_is_origin() {
        let stere = PolarStereographic::new(&ProjParameters {
            ellipsoid: Ellipsoid::wgs84(),
            lat_0: Some(90.0),
            ..Default::default()
        })
        .unwrap();

        let (x, y) = stere.project(FRAC_PI_2, 0.3);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);
        assert_eq!(stere.invproject(0.0, 0.0), (FRAC_PI_2, 0.0));
    }

    #[test]
    fn oblique_aspect_is_rejected() {
        assert_matches!(
            PolarStereographic::new(&ProjParameters {
                lat_0: Some(45.0),
                ..Default::default()
            }),
            Err(GalileoProjError::InvalidParameter { param, .. }) if param == "lat_0"
        );
    }
}
