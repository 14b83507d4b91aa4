//! Datums convert geographic coordinates between a local ellipsoid and WGS84.
//!
//! Conversion always goes through WGS84: to move a point between two local datums convert it with
//! [`Datum::to_wgs84`] of the first one and [`Datum::from_wgs84`] of the second one.

use crate::coord::LatLon;
use crate::ellipsoid::Ellipsoid;

mod grid;
mod helmert;

pub use grid::GridDatum;
pub use helmert::Helmert;

/// Geodetic datum.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// WGS84 itself.
    Wgs84,
    /// No conversion at all, the coordinates are taken as is (`+nadgrids=@null`).
    Null(Ellipsoid),
    /// Ellipsoid sharing the center and axes with WGS84. Geographic coordinates are not changed.
    Centric(Ellipsoid),
    /// Geocentric translation.
    ThreeParameter(Helmert),
    /// Geocentric translation, rotation and scale.
    SevenParameter(Helmert),
    /// Shift interpolated from a grid file.
    Grid(GridDatum),
}

impl Datum {
    /// Creates a datum from `+towgs84` values. All-zero values produce a [`Datum::Centric`], values
    /// without rotation and scale a [`Datum::ThreeParameter`].
    pub fn from_towgs84(
        ellipsoid: Ellipsoid,
        parameters: [f64; 7],
    ) -> Result<Self, crate::GalileoProjError> {
        if parameters.iter().all(|v| *v == 0.0) {
            return Ok(Self::Centric(ellipsoid));
        }

        let [dx, dy, dz, ..] = parameters;
        let helmert = Helmert::new(ellipsoid, parameters)?;
        Ok(if helmert.is_translation() {
            Self::ThreeParameter(Helmert::translation(ellipsoid, dx, dy, dz))
        } else {
            Self::SevenParameter(helmert)
        })
    }

    /// Ellipsoid of the datum.
    pub fn ellipsoid(&self) -> Ellipsoid {
        match self {
            Self::Wgs84 => Ellipsoid::wgs84(),
            Self::Null(ellipsoid) | Self::Centric(ellipsoid) => *ellipsoid,
            Self::ThreeParameter(helmert) | Self::SevenParameter(helmert) => *helmert.ellipsoid(),
            Self::Grid(grid) => *grid.ellipsoid(),
        }
    }

    /// Returns true if the datum does not change coordinates.
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Wgs84 | Self::Null(_) | Self::Centric(_))
    }

    /// Converts a point in this datum into WGS84.
    pub fn to_wgs84(&self, point: &LatLon) -> LatLon {
        match self {
            Self::Wgs84 | Self::Null(_) | Self::Centric(_) => *point,
            Self::ThreeParameter(helmert) | Self::SevenParameter(helmert) => helmert.to_wgs84(point),
            Self::Grid(grid) => grid.to_wgs84(point),
        }
    }

    /// Converts a WGS84 point into this datum.
    pub fn from_wgs84(&self, point: &LatLon) -> LatLon {
        match self {
            Self::Wgs84 | Self::Null(_) | Self::Centric(_) => *point,
            Self::ThreeParameter(helmert) | Self::SevenParameter(helmert) => {
                helmert.from_wgs84(point)
            }
            Self::Grid(grid) => grid.from_wgs84(point),
        }
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::Wgs84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::latlon;
    use crate::ntv2::tests::sample_grid;
    use crate::ntv2::GridShiftFile;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn points() -> Vec<LatLon> {
        vec![
            latlon!(0.0, 0.0),
            latlon!(46.8, 2.3),
            latlon!(51.4778, -0.0015),
            latlon!(-41.3, 174.8),
            latlon!(64.1, -21.9),
            latlon!(-89.0, 45.0),
        ]
    }

    fn assert_round_trip(datum: &Datum) {
        for point in points() {
            let back = datum.to_wgs84(&datum.from_wgs84(&point));
            assert_abs_diff_eq!(back.lat(), point.lat(), epsilon = 1e-9);
            assert_abs_diff_eq!(back.lon(), point.lon(), epsilon = 1e-9);

            let back = datum.from_wgs84(&datum.to_wgs84(&point));
            assert_abs_diff_eq!(back.lat(), point.lat(), epsilon = 1e-9);
            assert_abs_diff_eq!(back.lon(), point.lon(), epsilon = 1e-9);
        }
    }

    #[test]
    fn towgs84_variants() {
        let bessel = Ellipsoid::bessel1841();
        assert_matches!(
            Datum::from_towgs84(bessel, [0.0; 7]),
            Ok(Datum::Centric(e)) if e == bessel
        );
        assert_matches!(
            Datum::from_towgs84(bessel, [598.1, 73.7, 418.2, 0.0, 0.0, 0.0, 0.0]),
            Ok(Datum::ThreeParameter(_))
        );
        assert_matches!(
            Datum::from_towgs84(bessel, [598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7]),
            Ok(Datum::SevenParameter(_))
        );
    }

    #[test]
    fn centric_is_identity() {
        let datum = Datum::Centric(Ellipsoid::grs80());
        let point = latlon!(48.1, 11.5);
        assert_eq!(datum.to_wgs84(&point), point);
        assert_eq!(datum.from_wgs84(&point), point);
        assert!(datum.is_identity());
    }

    #[test]
    fn three_parameter_round_trip() {
        let datum =
            Datum::from_towgs84(Ellipsoid::hayford(), [-87.0, -98.0, -121.0, 0.0, 0.0, 0.0, 0.0])
                .unwrap();
        assert_round_trip(&datum);
    }

    #[test]
    fn seven_parameter_round_trip() {
        let datum = Datum::from_towgs84(
            Ellipsoid::bessel1841(),
            [598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7],
        )
        .unwrap();
        assert_round_trip(&datum);
    }

    #[test]
    fn large_rotation_round_trip() {
        let datum = Datum::from_towgs84(
            Ellipsoid::clarke1866(),
            [10.0, -20.0, 30.0, 50.0, -80.0, 120.0, 15.0],
        )
        .unwrap();
        assert_round_trip(&datum);
    }

    #[test]
    fn seven_parameter_reference_point() {
        // DHDN (Bessel) to WGS84 with the common Germany-wide parameter set.
        let datum = Datum::from_towgs84(
            Ellipsoid::bessel1841(),
            [598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7],
        )
        .unwrap();
        let wgs84 = datum.to_wgs84(&latlon!(50.0, 10.0));
        assert_abs_diff_eq!(wgs84.lat(), 49.998857264306, epsilon = 1e-9);
        assert_abs_diff_eq!(wgs84.lon(), 9.998813925295, epsilon = 1e-9);
    }

    #[test]
    fn grid_datum() {
        let grid = Arc::new(GridShiftFile::from_bytes(sample_grid(false), false).unwrap());
        let datum = Datum::Grid(GridDatum::new("sample.gsb", Ellipsoid::clarke_ign(), grid));

        let local = latlon!(44.5, 3.5);
        let wgs84 = datum.to_wgs84(&local);
        assert_abs_diff_eq!(wgs84.lat(), 44.5 + 1.25 / 3600.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wgs84.lon(), 3.5 - 2.125 / 3600.0, epsilon = 1e-12);

        let back = datum.from_wgs84(&wgs84);
        assert_abs_diff_eq!(back.lat(), local.lat(), epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon(), local.lon(), epsilon = 1e-9);

        let outside = latlon!(10.0, 10.0);
        assert_eq!(datum.to_wgs84(&outside), outside);
        assert_eq!(datum.from_wgs84(&outside), outside);
    }
}
