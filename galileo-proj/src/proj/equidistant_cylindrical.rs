use super::{BaseProjection, ProjParameters};

/// Equidistant cylindrical projection with the true scale along `lat_ts`. Spherical formulas
/// are used for the ellipsoid too.
#[derive(Debug, Clone, PartialEq)]
pub struct EquidistantCylindrical {
    rc: f64,
    phi0: f64,
}

impl EquidistantCylindrical {
    pub(super) fn new(params: &ProjParameters) -> Self {
        Self {
            rc: params.lat_ts.unwrap_or(0.0).to_radians().cos(),
            phi0: params.lat_0.unwrap_or(0.0).to_radians(),
        }
    }
}

impl BaseProjection for EquidistantCylindrical {
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        (self.rc * lambda, phi - self.phi0)
    }

    fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        (y + self.phi0, x / self.rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn plate_carree() {
        let eqc = EquidistantCylindrical::new(&ProjParameters::default());
        assert_eq!(eqc.project(0.5, -1.0), (-1.0, 0.5));

        let eqc = EquidistantCylindrical::new(&ProjParameters {
            lat_ts: Some(60.0),
            ..Default::default()
        });
        let (x, _) = eqc.project(0.0, 1.0);
        assert_abs_diff_eq!(x, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(eqc.invproject(0.5, 0.0).1, 1.0, epsilon = 1e-15);
    }
}
