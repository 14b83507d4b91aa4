//! Base map projections.
//!
//! A base projection maps geographic coordinates (radians, longitude relative to the central meridian)
//! to plane coordinates on an ellipsoid with the semi-major axis of 1. Scaling by the real axis
//! and scale factor, false easting and northing and the datum shift are applied by [`Crs`](crate::Crs).

use crate::bounds::Bounds;
use crate::ellipsoid::Ellipsoid;
use crate::error::GalileoProjError;

mod aeqd;
mod albers;
mod cassini;
mod common;
mod double_stereographic;
mod equidistant_cylindrical;
mod laea;
mod lambert_conformal;
mod lonlat;
mod mercator;
mod oblique_mercator;
mod polar_stereographic;
mod sinusoidal;
mod swiss_oblique_mercator;
mod transverse_mercator;

pub use aeqd::AzimuthalEquidistant;
pub use albers::AlbersEqualArea;
pub use cassini::CassiniSoldner;
pub use double_stereographic::DoubleStereographic;
pub use equidistant_cylindrical::EquidistantCylindrical;
pub use laea::LambertAzimuthalEqualArea;
pub use lambert_conformal::LambertConformalConic;
pub use lonlat::LonLat;
pub use mercator::Mercator;
pub use oblique_mercator::ObliqueMercator;
pub use polar_stereographic::PolarStereographic;
pub use sinusoidal::Sinusoidal;
pub use swiss_oblique_mercator::SwissObliqueMercator;
pub use transverse_mercator::TransverseMercator;

/// Parameters used to initialize a base projection. Angles are in degrees.
///
/// ```
/// use galileo_proj::proj::{Proj, ProjKind, ProjParameters};
///
/// let params = ProjParameters {
///     lat_0: Some(46.5),
///     lat_1: Some(49.0),
///     lat_2: Some(44.0),
///     ..Default::default()
/// };
/// let lcc = Proj::initialize(ProjKind::LambertConformalConic, &params).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjParameters {
    /// Ellipsoid the projection works on.
    pub ellipsoid: Ellipsoid,
    /// Latitude of origin.
    pub lat_0: Option<f64>,
    /// First standard parallel (or first point of the central line of oblique Mercator).
    pub lat_1: Option<f64>,
    /// Second standard parallel (or second point of the central line of oblique Mercator).
    pub lat_2: Option<f64>,
    /// Latitude of true scale.
    pub lat_ts: Option<f64>,
    /// Longitude of the projection center (oblique Mercator).
    pub lonc: Option<f64>,
    /// Azimuth of the central line (oblique Mercator).
    pub alpha: Option<f64>,
    /// Rectified grid angle (oblique Mercator).
    pub gamma: Option<f64>,
    /// Longitude of the first point of the central line (oblique Mercator).
    pub lon_1: Option<f64>,
    /// Longitude of the second point of the central line (oblique Mercator).
    pub lon_2: Option<f64>,
    /// Do not offset the origin to the projection center (oblique Mercator).
    pub no_off: bool,
}

impl ProjParameters {
    pub(crate) fn require(
        value: Option<f64>,
        param: &str,
        kind: ProjKind,
    ) -> Result<f64, GalileoProjError> {
        value.ok_or_else(|| GalileoProjError::MissingParameter {
            param: param.to_string(),
            proj: kind.id().to_string(),
        })
    }
}

/// Identifier of a base projection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjKind {
    /// Geographic coordinates.
    LonLat,
    /// Mercator.
    Mercator,
    /// Transverse Mercator.
    TransverseMercator,
    /// Lambert conformal conic.
    LambertConformalConic,
    /// Albers equal area conic.
    AlbersEqualArea,
    /// Lambert azimuthal equal area.
    LambertAzimuthalEqualArea,
    /// Polar stereographic.
    PolarStereographic,
    /// Oblique (double) stereographic.
    DoubleStereographic,
    /// Hotine oblique Mercator.
    ObliqueMercator,
    /// Swiss oblique Mercator.
    SwissObliqueMercator,
    /// Cassini-Soldner.
    CassiniSoldner,
    /// Equidistant cylindrical (plate carrée).
    EquidistantCylindrical,
    /// Sinusoidal.
    Sinusoidal,
    /// Azimuthal equidistant.
    AzimuthalEquidistant,
}

impl ProjKind {
    /// All projection kinds.
    pub const ALL: [ProjKind; 14] = [
        ProjKind::LonLat,
        ProjKind::Mercator,
        ProjKind::TransverseMercator,
        ProjKind::LambertConformalConic,
        ProjKind::AlbersEqualArea,
        ProjKind::LambertAzimuthalEqualArea,
        ProjKind::PolarStereographic,
        ProjKind::DoubleStereographic,
        ProjKind::ObliqueMercator,
        ProjKind::SwissObliqueMercator,
        ProjKind::CassiniSoldner,
        ProjKind::EquidistantCylindrical,
        ProjKind::Sinusoidal,
        ProjKind::AzimuthalEquidistant,
    ];

    /// Returns the kind for a `+proj` id. `utm` is not a kind of its own, see [`ProjectionStringParser`](crate::ProjectionStringParser).
    pub fn from_id(id: &str) -> Option<Self> {
        Some(match id {
            "lonlat" | "longlat" | "latlong" | "latlon" => Self::LonLat,
            "merc" => Self::Mercator,
            "tmerc" => Self::TransverseMercator,
            "lcc" => Self::LambertConformalConic,
            "aea" => Self::AlbersEqualArea,
            "laea" => Self::LambertAzimuthalEqualArea,
            "stere" => Self::PolarStereographic,
            "sterea" => Self::DoubleStereographic,
            "omerc" => Self::ObliqueMercator,
            "somerc" => Self::SwissObliqueMercator,
            "cass" => Self::CassiniSoldner,
            "eqc" => Self::EquidistantCylindrical,
            "sinu" => Self::Sinusoidal,
            "aeqd" => Self::AzimuthalEquidistant,
            _ => return None,
        })
    }

    /// `+proj` id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::LonLat => "lonlat",
            Self::Mercator => "merc",
            Self::TransverseMercator => "tmerc",
            Self::LambertConformalConic => "lcc",
            Self::AlbersEqualArea => "aea",
            Self::LambertAzimuthalEqualArea => "laea",
            Self::PolarStereographic => "stere",
            Self::DoubleStereographic => "sterea",
            Self::ObliqueMercator => "omerc",
            Self::SwissObliqueMercator => "somerc",
            Self::CassiniSoldner => "cass",
            Self::EquidistantCylindrical => "eqc",
            Self::Sinusoidal => "sinu",
            Self::AzimuthalEquidistant => "aeqd",
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LonLat => "Lat/lon (Geodetic)",
            Self::Mercator => "Mercator",
            Self::TransverseMercator => "Transverse Mercator",
            Self::LambertConformalConic => "Lambert Conformal Conic",
            Self::AlbersEqualArea => "Albers Equal Area",
            Self::LambertAzimuthalEqualArea => "Lambert Azimuthal Equal Area",
            Self::PolarStereographic => "Polar Stereographic",
            Self::DoubleStereographic => "Double Stereographic",
            Self::ObliqueMercator => "Oblique Mercator",
            Self::SwissObliqueMercator => "Swiss Oblique Mercator",
            Self::CassiniSoldner => "Cassini-Soldner",
            Self::EquidistantCylindrical => "Equidistant Cylindrical (Plate Carrée)",
            Self::Sinusoidal => "Sinusoidal",
            Self::AzimuthalEquidistant => "Azimuthal Equidistant",
        }
    }
}

/// Formulas of a single projection family.
trait BaseProjection {
    /// Projects geographic coordinates (radians) into unit ellipsoid plane coordinates.
    fn project(&self, phi: f64, lambda: f64) -> (f64, f64);
    /// Inverse of [`BaseProjection::project`], returns `(phi, lambda)`.
    fn invproject(&self, x: f64, y: f64) -> (f64, f64);
    /// Area where the formulas are valid, longitudes relative to the central meridian.
    fn algorithm_bounds(&self) -> Bounds {
        Bounds::WORLD
    }
    /// Central meridian (degrees) defined by the projection parameters themselves.
    fn central_meridian(&self) -> Option<f64> {
        None
    }
}

/// Initialized base projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Proj {
    /// Geographic coordinates.
    LonLat(LonLat),
    /// Mercator.
    Mercator(Mercator),
    /// Transverse Mercator.
    TransverseMercator(TransverseMercator),
    /// Lambert conformal conic.
    LambertConformalConic(LambertConformalConic),
    /// Albers equal area conic.
    AlbersEqualArea(AlbersEqualArea),
    /// Lambert azimuthal equal area.
    LambertAzimuthalEqualArea(LambertAzimuthalEqualArea),
    /// Polar stereographic.
    PolarStereographic(PolarStereographic),
    /// Oblique (double) stereographic.
    DoubleStereographic(DoubleStereographic),
    /// Hotine oblique Mercator.
    ObliqueMercator(ObliqueMercator),
    /// Swiss oblique Mercator.
    SwissObliqueMercator(SwissObliqueMercator),
    /// Cassini-Soldner.
    CassiniSoldner(CassiniSoldner),
    /// Equidistant cylindrical.
    EquidistantCylindrical(EquidistantCylindrical),
    /// Sinusoidal.
    Sinusoidal(Sinusoidal),
    /// Azimuthal equidistant.
    AzimuthalEquidistant(AzimuthalEquidistant),
}

macro_rules! dispatch {
    ($self:ident, $proj:ident => $expr:expr) => {
        match $self {
            Proj::LonLat($proj) => $expr,
            Proj::Mercator($proj) => $expr,
            Proj::TransverseMercator($proj) => $expr,
            Proj::LambertConformalConic($proj) => $expr,
            Proj::AlbersEqualArea($proj) => $expr,
            Proj::LambertAzimuthalEqualArea($proj) => $expr,
            Proj::PolarStereographic($proj) => $expr,
            Proj::DoubleStereographic($proj) => $expr,
            Proj::ObliqueMercator($proj) => $expr,
            Proj::SwissObliqueMercator($proj) => $expr,
            Proj::CassiniSoldner($proj) => $expr,
            Proj::EquidistantCylindrical($proj) => $expr,
            Proj::Sinusoidal($proj) => $expr,
            Proj::AzimuthalEquidistant($proj) => $expr,
        }
    };
}

impl Proj {
    /// Creates a projection of the given kind. Fails if a required parameter is missing or invalid.
    pub fn initialize(kind: ProjKind, params: &ProjParameters) -> Result<Self, GalileoProjError> {
        Ok(match kind {
            ProjKind::LonLat => Self::LonLat(LonLat),
            ProjKind::Mercator => Self::Mercator(Mercator::new(params)),
            ProjKind::TransverseMercator => {
                Self::TransverseMercator(TransverseMercator::new(params))
            }
            ProjKind::LambertConformalConic => {
                Self::LambertConformalConic(LambertConformalConic::new(params)?)
            }
            ProjKind::AlbersEqualArea => Self::AlbersEqualArea(AlbersEqualArea::new(params)?),
            ProjKind::LambertAzimuthalEqualArea => {
                Self::LambertAzimuthalEqualArea(LambertAzimuthalEqualArea::new(params))
            }
            ProjKind::PolarStereographic => {
                Self::PolarStereographic(PolarStereographic::new(params)?)
            }
            ProjKind::DoubleStereographic => {
                Self::DoubleStereographic(DoubleStereographic::new(params)?)
            }
            ProjKind::ObliqueMercator => Self::ObliqueMercator(ObliqueMercator::new(params)?),
            ProjKind::SwissObliqueMercator => {
                Self::SwissObliqueMercator(SwissObliqueMercator::new(params)?)
            }
            ProjKind::CassiniSoldner => Self::CassiniSoldner(CassiniSoldner::new(params)),
            ProjKind::EquidistantCylindrical => {
                Self::EquidistantCylindrical(EquidistantCylindrical::new(params))
            }
            ProjKind::Sinusoidal => Self::Sinusoidal(Sinusoidal::new(params)),
            ProjKind::AzimuthalEquidistant => {
                Self::AzimuthalEquidistant(AzimuthalEquidistant::new(params))
            }
        })
    }

    /// Kind of the projection.
    pub fn kind(&self) -> ProjKind {
        match self {
            Self::LonLat(_) => ProjKind::LonLat,
            Self::Mercator(_) => ProjKind::Mercator,
            Self::TransverseMercator(_) => ProjKind::TransverseMercator,
            Self::LambertConformalConic(_) => ProjKind::LambertConformalConic,
            Self::AlbersEqualArea(_) => ProjKind::AlbersEqualArea,
            Self::LambertAzimuthalEqualArea(_) => ProjKind::LambertAzimuthalEqualArea,
            Self::PolarStereographic(_) => ProjKind::PolarStereographic,
            Self::DoubleStereographic(_) => ProjKind::DoubleStereographic,
            Self::ObliqueMercator(_) => ProjKind::ObliqueMercator,
            Self::SwissObliqueMercator(_) => ProjKind::SwissObliqueMercator,
            Self::CassiniSoldner(_) => ProjKind::CassiniSoldner,
            Self::EquidistantCylindrical(_) => ProjKind::EquidistantCylindrical,
            Self::Sinusoidal(_) => ProjKind::Sinusoidal,
            Self::AzimuthalEquidistant(_) => ProjKind::AzimuthalEquidistant,
        }
    }

    /// Projects `phi, lambda` (radians, longitude relative to the central meridian) into `x, y` on the
    /// unit ellipsoid. Singular points produce NaN or infinite values.
    pub fn project(&self, phi: f64, lambda: f64) -> (f64, f64) {
        dispatch!(self, proj => proj.project(phi, lambda))
    }

    /// Inverse of [`Proj::project`], returns `(phi, lambda)` in radians.
    pub fn invproject(&self, x: f64, y: f64) -> (f64, f64) {
        dispatch!(self, proj => proj.invproject(x, y))
    }

    /// Area where the projection formulas are valid, with longitudes relative to the central meridian.
    pub fn algorithm_bounds(&self) -> Bounds {
        dispatch!(self, proj => proj.algorithm_bounds())
    }

    /// Central meridian in degrees, if the projection computes it from its own parameters. It then
    /// replaces `+lon_0`.
    pub fn central_meridian(&self) -> Option<f64> {
        dispatch!(self, proj => proj.central_meridian())
    }

    /// Returns true if the projection keeps geographic coordinates.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::LonLat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn params_for(kind: ProjKind) -> ProjParameters {
        let base = ProjParameters {
            ellipsoid: Ellipsoid::grs80(),
            ..Default::default()
        };
        match kind {
            ProjKind::LambertConformalConic | ProjKind::AlbersEqualArea => ProjParameters {
                lat_0: Some(46.5),
                lat_1: Some(49.0),
                lat_2: Some(44.0),
                ..base
            },
            ProjKind::LambertAzimuthalEqualArea => ProjParameters {
                lat_0: Some(52.0),
                ..base
            },
            ProjKind::PolarStereographic => ProjParameters {
                lat_0: Some(-90.0),
                lat_ts: Some(-71.0),
                ..base
            },
            ProjKind::DoubleStereographic => ProjParameters {
                ellipsoid: Ellipsoid::bessel1841(),
                lat_0: Some(52.15616055555555),
                ..base
            },
            ProjKind::ObliqueMercator => ProjParameters {
                lat_0: Some(45.30916666666666),
                lonc: Some(-86.0),
                alpha: Some(337.25556),
                ..base
            },
            ProjKind::SwissObliqueMercator => ProjParameters {
                ellipsoid: Ellipsoid::bessel1841(),
                lat_0: Some(46.95240555555556),
                ..base
            },
            ProjKind::AzimuthalEquidistant => ProjParameters {
                lat_0: Some(40.0),
                ..base
            },
            _ => base,
        }
    }

    #[test]
    fn ids_round_trip() {
        for kind in ProjKind::ALL {
            assert_eq!(ProjKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ProjKind::from_id("longlat"), Some(ProjKind::LonLat));
        assert_eq!(ProjKind::from_id("utm"), None);
        assert_eq!(ProjKind::from_id("unknown"), None);
    }

    #[test]
    fn random_round_trip_within_algorithm_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for kind in ProjKind::ALL {
            let proj = Proj::initialize(kind, &params_for(kind)).unwrap();
            assert_eq!(proj.kind(), kind);
            let bounds = proj.algorithm_bounds();

            for _ in 0..1000 {
                let lat = rng.gen_range(bounds.min_lat()..bounds.max_lat());
                let lon = bounds.min_lon() + rng.gen_range(0.0..bounds.width());
                let (phi, lambda) = (lat.to_radians(), common::normalize_lon(lon.to_radians()));

                let (x, y) = proj.project(phi, lambda);
                let (phi2, lambda2) = proj.invproject(x, y);

                assert_abs_diff_eq!(phi2, phi, epsilon = 1e-9);
                assert_abs_diff_eq!(
                    common::normalize_lon(lambda2 - lambda),
                    0.0,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn missing_required_parameters() {
        let params = ProjParameters::default();
        assert_matches!(
            Proj::initialize(ProjKind::LambertConformalConic, &params),
            Err(GalileoProjError::MissingParameter { param, proj }) if param == "lat_1" && proj == "lcc"
        );
        assert_matches!(
            Proj::initialize(ProjKind::AlbersEqualArea, &params),
            Err(GalileoProjError::MissingParameter { param, .. }) if param == "lat_1"
        );
        assert_matches!(
            Proj::initialize(ProjKind::DoubleStereographic, &params),
            Err(GalileoProjError::MissingParameter { param, .. }) if param == "lat_0"
        );
        assert_matches!(
            Proj::initialize(ProjKind::SwissObliqueMercator, &params),
            Err(GalileoProjError::MissingParameter { param, .. }) if param == "lat_0"
        );
        assert_matches!(
            Proj::initialize(ProjKind::ObliqueMercator, &params),
            Err(GalileoProjError::MissingParameter { .. })
        );
        assert_matches!(
            Proj::initialize(ProjKind::PolarStereographic, &params),
            Err(GalileoProjError::MissingParameter { param, .. }) if param == "lat_0"
        );
    }

    #[test]
    fn only_oblique_mercator_has_own_central_meridian() {
        for kind in ProjKind::ALL {
            let proj = Proj::initialize(kind, &params_for(kind)).unwrap();
            assert_eq!(
                proj.central_meridian().is_some(),
                kind == ProjKind::ObliqueMercator
            );
        }
    }
}
