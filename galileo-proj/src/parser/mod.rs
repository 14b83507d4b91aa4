//! PROJ.4 parameter strings (`+proj=tmerc +lat_0=49 +ellps=airy ...`) to coordinate systems.

use crate::bounds::Bounds;
use crate::catalog::{tables, Catalog, DatumDefinition};
use crate::crs::{custom_code, Crs};
use crate::datum::{Datum, GridDatum};
use crate::ellipsoid::Ellipsoid;
use crate::error::GalileoProjError;
use crate::proj::{Proj, ProjKind, ProjParameters};
use ahash::HashMap;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

mod angle;

pub use angle::parse_angle;

/// Definition used for an empty parameter string.
pub const WEB_MERCATOR_DEFINITION: &str = "+proj=merc +a=6378137 +b=6378137 +nadgrids=@null";

/// Maximum nesting of `+init` references.
pub const MAX_INIT_DEPTH: usize = 8;

const VALUED_KEYS: &[&str] = &[
    "proj", "init", "ellps", "a", "b", "es", "rf", "f", "R", "datum", "towgs84", "nadgrids", "x_0",
    "y_0", "lon_0", "lat_0", "lat_1", "lat_2", "lat_ts", "lonc", "alpha", "gamma", "lon_1",
    "lon_2", "k_0", "k", "zone", "bounds", "units", "to_meter", "pm",
];

const FLAG_KEYS: &[&str] = &["south", "no_off", "no_uoff", "no_defs", "wktext"];

lazy_static! {
    static ref TOKEN: Regex =
        Regex::new(r"^\+([a-zA-Z0-9_]+)(?:=(.*))?$").expect("token pattern is valid");
}

/// Parameters of a definition string after tokenizing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterList {
    values: HashMap<String, Option<String>>,
}

impl ParameterList {
    /// Splits a definition string into parameters, checking the syntax of every token and that
    /// every key is known.
    pub fn tokenize(definition: &str) -> Result<Self, GalileoProjError> {
        let mut values = HashMap::default();
        for token in definition.split_whitespace() {
            if !token.starts_with('+') {
                return Err(GalileoProjError::MissingPlus(token.into()));
            }

            let captures = TOKEN
                .captures(token)
                .ok_or_else(|| GalileoProjError::ParameterFormat(token.into()))?;
            let key = captures.get(1).map_or("", |m| m.as_str());
            let value = captures
                .get(2)
                .map(|m| m.as_str())
                .filter(|v| !v.is_empty());

            if VALUED_KEYS.contains(&key) {
                if value.is_none() {
                    return Err(GalileoProjError::MissingValue(key.into()));
                }
            } else if FLAG_KEYS.contains(&key) {
                if value.is_some() {
                    return Err(GalileoProjError::UnexpectedValue(key.into()));
                }
            } else {
                return Err(GalileoProjError::UnknownParameter(key.into()));
            }

            values.insert(key.to_string(), value.map(str::to_string));
        }

        Ok(Self { values })
    }

    /// Value of a parameter.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// Returns true if the parameter (or flag) is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key).flatten()
    }

    fn overlay(&mut self, other: ParameterList) {
        self.values.extend(other.values);
    }

    fn number(&self, key: &str) -> Result<Option<f64>, GalileoProjError> {
        self.value(key)
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| GalileoProjError::InvalidNumber {
                        param: key.into(),
                        value: value.into(),
                    })
            })
            .transpose()
    }

    fn angle(&self, key: &str) -> Result<Option<f64>, GalileoProjError> {
        self.value(key)
            .map(|value| parse_angle(value, key))
            .transpose()
    }
}

/// Builds [`Crs`] instances from PROJ.4 parameter strings.
///
/// `+init` references and grid names are resolved with the catalog.
///
/// ```
/// use galileo_proj::coord::LatLon;
/// use galileo_proj::{Catalog, Projection, ProjectionStringParser};
///
/// let catalog = Catalog::new();
/// let parser = ProjectionStringParser::new(&catalog);
/// let crs = parser.parse("+proj=merc +a=6378137 +b=6378137 +nadgrids=@null").unwrap();
///
/// let projected = crs.latlon_to_east_north(&LatLon::new(0.0, 0.0));
/// assert_eq!(projected.east(), 0.0);
/// assert!(crs.to_code().starts_with("proj:"));
/// ```
pub struct ProjectionStringParser<'a> {
    catalog: &'a Catalog,
}

impl<'a> ProjectionStringParser<'a> {
    /// Creates a parser resolving references with the given catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Parses a definition string. The system gets a synthetic `proj:` code derived from the
    /// definition. An empty string is Web Mercator with the `EPSG:3857` code.
    pub fn parse(&self, definition: &str) -> Result<Crs, GalileoProjError> {
        if definition.trim().is_empty() {
            return self.parse_with_code(WEB_MERCATOR_DEFINITION, "EPSG:3857");
        }

        self.parse_with_code(definition, &custom_code(definition))
    }

    /// Parses a definition string and assigns the given code to the result.
    pub fn parse_with_code(&self, definition: &str, code: &str) -> Result<Crs, GalileoProjError> {
        let parameters = self.parameters(definition)?;
        debug!("Assembling {code} from '{definition}'");

        Ok(self
            .assemble(&parameters, code)?
            .with_definition(definition.trim()))
    }

    /// Tokenizes the definition and expands `+init` references. Parameters given directly in the
    /// definition override the ones from the referenced definition.
    pub fn parameters(&self, definition: &str) -> Result<ParameterList, GalileoProjError> {
        self.expand(definition, 0)
    }

    fn expand(&self, definition: &str, depth: usize) -> Result<ParameterList, GalileoProjError> {
        let mut parameters = ParameterList::tokenize(definition)?;
        let Some(init) = parameters.take("init") else {
            return Ok(parameters);
        };

        if depth >= MAX_INIT_DEPTH {
            return Err(GalileoProjError::InitTooDeep(init));
        }

        let base_definition = self
            .catalog
            .definition(&init.to_uppercase())
            .ok_or_else(|| GalileoProjError::UnknownCode(init.clone()))?;
        let mut base = self.expand(base_definition.definition(), depth + 1)?;
        base.overlay(parameters);

        Ok(base)
    }

    fn assemble(&self, parameters: &ParameterList, code: &str) -> Result<Crs, GalileoProjError> {
        let named_datum = parameters
            .value("datum")
            .map(|name| {
                tables::datum(name).ok_or_else(|| GalileoProjError::UnknownDatum(name.into()))
            })
            .transpose()?;

        let ellipsoid = resolve_ellipsoid(parameters, named_datum.as_ref())?;
        let datum = match self.resolve_datum(parameters, ellipsoid, named_datum.as_ref())? {
            Datum::Centric(e) if e == Ellipsoid::wgs84() => Datum::Wgs84,
            datum => datum,
        };

        let proj_id = parameters
            .value("proj")
            .ok_or(GalileoProjError::ProjectionRequired)?;

        let mut x_0 = parameters.number("x_0")?.unwrap_or(0.0);
        let mut y_0 = parameters.number("y_0")?.unwrap_or(0.0);
        let mut lon_0 = parameters.angle("lon_0")?.unwrap_or(0.0);
        let mut k_0 = match parameters.number("k_0")? {
            Some(k_0) => k_0,
            None => parameters.number("k")?.unwrap_or(1.0),
        };

        let kind = if proj_id == "utm" {
            let zone = utm_zone(parameters)?;
            lon_0 = 6.0 * f64::from(zone) - 183.0;
            k_0 = 0.9996;
            x_0 = 500_000.0;
            y_0 = if parameters.contains("south") {
                10_000_000.0
            } else {
                0.0
            };
            ProjKind::TransverseMercator
        } else {
            ProjKind::from_id(proj_id)
                .ok_or_else(|| GalileoProjError::UnknownProjection(proj_id.into()))?
        };

        let proj_parameters = ProjParameters {
            ellipsoid,
            lat_0: parameters.angle("lat_0")?,
            lat_1: parameters.angle("lat_1")?,
            lat_2: parameters.angle("lat_2")?,
            lat_ts: parameters.angle("lat_ts")?,
            lonc: parameters.angle("lonc")?,
            alpha: parameters.angle("alpha")?,
            gamma: parameters.angle("gamma")?,
            lon_1: parameters.angle("lon_1")?,
            lon_2: parameters.angle("lon_2")?,
            no_off: parameters.contains("no_off") || parameters.contains("no_uoff"),
        };
        let proj = Proj::initialize(kind, &proj_parameters)?;

        let mut crs = Crs::new(code, datum, proj)
            .with_false_origin(x_0, y_0)
            .with_central_meridian(lon_0)
            .with_scale_factor(k_0)
            .with_to_meter(to_meter(parameters)?)
            .with_prime_meridian(prime_meridian(parameters)?);

        if let Some(bounds) = parse_bounds(parameters)? {
            crs = crs.with_bounds(bounds);
        }

        Ok(crs)
    }

    fn resolve_datum(
        &self,
        parameters: &ParameterList,
        ellipsoid: Ellipsoid,
        named: Option<&DatumDefinition>,
    ) -> Result<Datum, GalileoProjError> {
        if let Some(grids) = parameters.value("nadgrids") {
            return self.grid_datum(grids, ellipsoid);
        }

        if let Some(values) = parameters.value("towgs84") {
            return Datum::from_towgs84(ellipsoid, parse_towgs84(values)?);
        }

        match named {
            Some(definition) => Datum::from_towgs84(ellipsoid, definition.towgs84()),
            None => Ok(Datum::Centric(ellipsoid)),
        }
    }

    /// The first available grid of a comma separated list. Names starting with `@` are optional.
    fn grid_datum(&self, grids: &str, ellipsoid: Ellipsoid) -> Result<Datum, GalileoProjError> {
        for entry in grids.split(',') {
            let (name, optional) = match entry.strip_prefix('@') {
                Some(name) => (name, true),
                None => (entry, false),
            };

            if name == "null" {
                return Ok(Datum::Null(ellipsoid));
            }

            match self.catalog.grid(name)? {
                Some(grid) => return Ok(Datum::Grid(GridDatum::new(name, ellipsoid, grid))),
                None if optional => debug!("Optional grid {name} is not available"),
                None => return Err(GalileoProjError::GridNotFound(name.into())),
            }
        }

        warn!("None of the grids '{grids}' is available, datum shift is not applied");
        Ok(Datum::Null(ellipsoid))
    }
}

fn resolve_ellipsoid(
    parameters: &ParameterList,
    named_datum: Option<&DatumDefinition>,
) -> Result<Ellipsoid, GalileoProjError> {
    if let Some(name) = parameters.value("ellps") {
        return tables::ellipsoid(name).ok_or_else(|| GalileoProjError::UnknownEllipsoid(name.into()));
    }

    if let Some(radius) = parameters.number("R")? {
        return Ok(Ellipsoid::sphere(radius));
    }

    if let Some(a) = parameters.number("a")? {
        return if let Some(es) = parameters.number("es")? {
            Ok(Ellipsoid::from_a_es(a, es))
        } else if let Some(rf) = parameters.number("rf")? {
            Ok(Ellipsoid::from_a_rf(a, rf))
        } else if let Some(f) = parameters.number("f")? {
            Ok(Ellipsoid::from_a_f(a, f))
        } else if let Some(b) = parameters.number("b")? {
            Ok(Ellipsoid::from_a_b(a, b))
        } else {
            Err(GalileoProjError::EllipsoidCombination)
        };
    }

    Ok(named_datum.map_or_else(Ellipsoid::wgs84, DatumDefinition::ellipsoid))
}

fn parse_towgs84(values: &str) -> Result<[f64; 7], GalileoProjError> {
    let numbers = values
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| GalileoProjError::InvalidNumber {
                    param: "towgs84".into(),
                    value: value.into(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if numbers.len() != 3 && numbers.len() != 7 {
        return Err(GalileoProjError::WrongArgumentCount {
            param: "towgs84".into(),
            expected: "3 or 7".into(),
        });
    }

    let mut parameters = [0.0; 7];
    parameters[..numbers.len()].copy_from_slice(&numbers);
    Ok(parameters)
}

fn utm_zone(parameters: &ParameterList) -> Result<u8, GalileoProjError> {
    let value = parameters
        .value("zone")
        .ok_or_else(|| GalileoProjError::MissingParameter {
            param: "zone".into(),
            proj: "utm".into(),
        })?;

    value
        .parse::<u8>()
        .ok()
        .filter(|zone| (1..=60).contains(zone))
        .ok_or_else(|| GalileoProjError::InvalidParameter {
            param: "zone".into(),
            reason: format!("'{value}' is not a zone number between 1 and 60"),
        })
}

fn to_meter(parameters: &ParameterList) -> Result<f64, GalileoProjError> {
    if let Some(to_meter) = parameters.number("to_meter")? {
        return Ok(to_meter);
    }

    match parameters.value("units") {
        Some(units) => {
            tables::unit(units).ok_or_else(|| GalileoProjError::UnknownUnit(units.into()))
        }
        None => Ok(1.0),
    }
}

fn prime_meridian(parameters: &ParameterList) -> Result<f64, GalileoProjError> {
    let Some(value) = parameters.value("pm") else {
        return Ok(0.0);
    };

    match tables::prime_meridian(value) {
        Some(angle) => parse_angle(angle, "pm"),
        None => parse_angle(value, "pm")
            .map_err(|_| GalileoProjError::UnknownPrimeMeridian(value.into())),
    }
}

fn parse_bounds(parameters: &ParameterList) -> Result<Option<Bounds>, GalileoProjError> {
    let Some(value) = parameters.value("bounds") else {
        return Ok(None);
    };

    let angles = value
        .split(',')
        .map(|v| parse_angle(v.trim(), "bounds"))
        .collect::<Result<Vec<_>, _>>()?;

    match angles[..] {
        [min_lon, min_lat, max_lon, max_lat] => Ok(Some(Bounds::from_lon_lat(
            min_lon, min_lat, max_lon, max_lat,
        ))),
        _ => Err(GalileoProjError::WrongArgumentCount {
            param: "bounds".into(),
            expected: "4".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EpsgDefinition, GridSource};
    use crate::coord::{EastNorth, GeoPoint, LatLon};
    use crate::crs::Projection;
    use crate::latlon;
    use crate::ntv2::tests::sample_grid;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use bytes::Bytes;

    struct SampleGridSource;

    impl GridSource for SampleGridSource {
        fn load(&self, name: &str) -> Result<Option<Bytes>, GalileoProjError> {
            Ok((name == "sample.gsb").then(|| sample_grid(false)))
        }
    }

    fn parse(definition: &str) -> Result<Crs, GalileoProjError> {
        let catalog = Catalog::new();
        ProjectionStringParser::new(&catalog).parse(definition)
    }

    #[test]
    fn tokenizing() {
        let parameters =
            ParameterList::tokenize("+proj=utm  +zone=32\t+south +no_defs +towgs84=1,2,3").unwrap();
        assert_eq!(parameters.len(), 5);
        assert_eq!(parameters.value("proj"), Some("utm"));
        assert_eq!(parameters.value("towgs84"), Some("1,2,3"));
        assert!(parameters.contains("south"));
        assert_eq!(parameters.value("south"), None);
        assert!(!parameters.contains("lat_0"));

        assert!(ParameterList::tokenize("").unwrap().is_empty());
    }

    #[test]
    fn syntax_errors() {
        assert_matches!(
            ParameterList::tokenize("proj=merc"),
            Err(GalileoProjError::MissingPlus(token)) if token == "proj=merc"
        );
        assert_matches!(
            ParameterList::tokenize("+proj=merc +foo=bar"),
            Err(GalileoProjError::UnknownParameter(key)) if key == "foo"
        );
        assert_matches!(
            ParameterList::tokenize("+=merc"),
            Err(GalileoProjError::ParameterFormat(_))
        );
        assert_matches!(
            ParameterList::tokenize("+proj"),
            Err(GalileoProjError::MissingValue(key)) if key == "proj"
        );
        assert_matches!(
            ParameterList::tokenize("+proj="),
            Err(GalileoProjError::MissingValue(key)) if key == "proj"
        );
        assert_matches!(
            ParameterList::tokenize("+proj=utm +south=yes"),
            Err(GalileoProjError::UnexpectedValue(key)) if key == "south"
        );
    }

    #[test]
    fn spherical_mercator() {
        let crs = parse("+proj=merc +a=6378137 +b=6378137 +nadgrids=@null").unwrap();
        assert_matches!(crs.datum(), Datum::Null(e) if e.is_spherical());

        let projected = crs.latlon_to_east_north(&latlon!(50.56857222222222, 11.232275));
        assert_abs_diff_eq!(projected.east(), 1_250_371.1334500168, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.north(), 6_545_331.055189664, epsilon = 1e-6);

        let projected = crs.latlon_to_east_north(&LatLon::new(
            parse_angle("37d20'18.76\"N", "lat").unwrap(),
            parse_angle("118d39'30.42\"W", "lon").unwrap(),
        ));
        assert_abs_diff_eq!(projected.east(), -13_208_998.232319113, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.north(), 4_486_401.160664663, epsilon = 1e-6);
    }

    #[test]
    fn empty_definition_is_web_mercator() {
        let crs = parse("  ").unwrap();
        assert_eq!(crs.to_code(), "EPSG:3857");
        assert_eq!(crs.definition(), Some(WEB_MERCATOR_DEFINITION));
        assert_eq!(crs.proj().kind(), ProjKind::Mercator);
    }

    #[test]
    fn custom_definitions_get_synthetic_codes() {
        let definition = "+proj=longlat +datum=WGS84 +no_defs";
        let crs = parse(definition).unwrap();
        assert_eq!(crs.to_code(), custom_code(definition));
        assert_eq!(crs.definition(), Some(definition));
        assert_eq!(crs.datum(), &Datum::Wgs84);
        assert!(crs.is_geographic());
    }

    #[test]
    fn init_expansion() {
        let catalog = Catalog::new();
        let parser = ProjectionStringParser::new(&catalog);

        let wgs84 = parser.parse("+init=epsg:4326").unwrap();
        let mercator = parser.parse("+init=EPSG:3857").unwrap();
        let point = wgs84.east_north_to_latlon(&EastNorth::new(11.232274, 50.5685716));
        let projected = mercator.latlon_to_east_north(&point);
        assert_abs_diff_eq!(projected.east(), 1_250_371.0221305261, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.north(), 6_545_330.946136694, epsilon = 1e-6);

        let shifted = parser.parse("+init=epsg:3857 +x_0=1000").unwrap();
        let projected_shifted = shifted.latlon_to_east_north(&point);
        assert_abs_diff_eq!(
            projected_shifted.east(),
            projected.east() + 1000.0,
            epsilon = 1e-6
        );
        assert_eq!(projected_shifted.north(), projected.north());

        let parameters = parser.parameters("+init=epsg:3857 +x_0=1000").unwrap();
        assert_eq!(parameters.value("x_0"), Some("1000"));
        assert_eq!(parameters.value("proj"), Some("merc"));
        assert!(!parameters.contains("init"));
    }

    #[test]
    fn init_errors() {
        let catalog = Catalog::empty().with_definitions([
            EpsgDefinition::new("EPSG:1", "first", "+init=epsg:2"),
            EpsgDefinition::new("EPSG:2", "second", "+init=epsg:1"),
        ]);
        let parser = ProjectionStringParser::new(&catalog);

        assert_matches!(
            parser.parse("+init=epsg:1"),
            Err(GalileoProjError::InitTooDeep(_))
        );
        assert_matches!(
            parser.parse("+init=epsg:999999"),
            Err(GalileoProjError::UnknownCode(code)) if code == "epsg:999999"
        );
    }

    #[test]
    fn ellipsoid_resolution() {
        assert_eq!(
            parse("+proj=longlat +R=6371000").unwrap().ellipsoid(),
            Ellipsoid::sphere(6_371_000.0)
        );
        assert_eq!(
            parse("+proj=longlat +a=6378388 +rf=297").unwrap().ellipsoid(),
            Ellipsoid::hayford()
        );
        assert_eq!(
            parse("+proj=longlat +a=6378137 +es=0.006694379990141317")
                .unwrap()
                .ellipsoid()
                .a(),
            6_378_137.0
        );
        assert_eq!(
            parse("+proj=longlat +ellps=intl").unwrap().ellipsoid(),
            Ellipsoid::hayford()
        );
        assert_eq!(
            parse("+proj=longlat +datum=potsdam").unwrap().ellipsoid(),
            Ellipsoid::bessel1841()
        );
        assert_eq!(
            parse("+proj=longlat").unwrap().ellipsoid(),
            Ellipsoid::wgs84()
        );

        assert_matches!(
            parse("+proj=merc +a=6378137"),
            Err(GalileoProjError::EllipsoidCombination)
        );
        assert_matches!(
            parse("+proj=merc +ellps=potato"),
            Err(GalileoProjError::UnknownEllipsoid(name)) if name == "potato"
        );
    }

    #[test]
    fn datum_resolution() {
        assert_matches!(
            parse("+proj=longlat +datum=potsdam").unwrap().datum(),
            Datum::SevenParameter(_)
        );
        assert_matches!(
            parse("+proj=longlat +ellps=bessel +towgs84=598.1,73.7,418.2")
                .unwrap()
                .datum(),
            Datum::ThreeParameter(_)
        );
        assert_matches!(
            parse("+proj=longlat +ellps=GRS80 +towgs84=0,0,0").unwrap().datum(),
            Datum::Centric(e) if *e == Ellipsoid::grs80()
        );
        assert_matches!(
            parse("+proj=longlat +datum=NAD83").unwrap().datum(),
            Datum::Centric(e) if *e == Ellipsoid::grs80()
        );
        assert_eq!(parse("+proj=longlat +datum=WGS84").unwrap().datum(), &Datum::Wgs84);
        assert_matches!(
            parse("+proj=longlat +ellps=intl").unwrap().datum(),
            Datum::Centric(e) if *e == Ellipsoid::hayford()
        );

        // Explicit parameters take precedence over the named datum.
        assert_matches!(
            parse("+proj=longlat +datum=potsdam +towgs84=0,0,0").unwrap().datum(),
            Datum::Centric(e) if *e == Ellipsoid::bessel1841()
        );

        assert_matches!(
            parse("+proj=merc +towgs84=1,2"),
            Err(GalileoProjError::WrongArgumentCount { param, expected })
                if param == "towgs84" && expected == "3 or 7"
        );
        assert_matches!(
            parse("+proj=merc +towgs84=1,2,x"),
            Err(GalileoProjError::InvalidNumber { param, .. }) if param == "towgs84"
        );
        assert_matches!(
            parse("+proj=merc +datum=atlantis"),
            Err(GalileoProjError::UnknownDatum(name)) if name == "atlantis"
        );
    }

    #[test]
    fn grid_datums() {
        let catalog = Catalog::empty().with_grid_source(SampleGridSource);
        let parser = ProjectionStringParser::new(&catalog);

        assert_matches!(
            parser.parse("+proj=longlat +ellps=clrk80ign +nadgrids=@null").unwrap().datum(),
            Datum::Null(_)
        );
        assert_matches!(
            parser.parse("+proj=longlat +ellps=clrk80ign +nadgrids=@missing.gsb").unwrap().datum(),
            Datum::Null(_)
        );
        assert_matches!(
            parser
                .parse("+proj=longlat +ellps=clrk80ign +nadgrids=@missing.gsb,sample.gsb")
                .unwrap()
                .datum(),
            Datum::Grid(grid) if grid.name() == "sample.gsb"
        );
        assert_matches!(
            parser.parse("+proj=longlat +ellps=clrk80ign +nadgrids=missing.gsb"),
            Err(GalileoProjError::GridNotFound(name)) if name == "missing.gsb"
        );

        let crs = parser
            .parse("+proj=longlat +ellps=clrk80ign +nadgrids=sample.gsb")
            .unwrap();
        let local = crs.east_north_to_latlon(&EastNorth::new(3.5, 44.5));
        assert_abs_diff_eq!(local.lat(), 44.5 + 1.25 / 3600.0, epsilon = 1e-12);
        assert_abs_diff_eq!(local.lon(), 3.5 - 2.125 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_errors() {
        assert_matches!(
            parse("+ellps=GRS80 +x_0=100"),
            Err(GalileoProjError::ProjectionRequired)
        );
        assert_matches!(
            parse("+proj=bogus"),
            Err(GalileoProjError::UnknownProjection(id)) if id == "bogus"
        );
        assert_matches!(
            parse("+proj=lcc +ellps=GRS80"),
            Err(GalileoProjError::MissingParameter { param, .. }) if param == "lat_1"
        );
        assert_matches!(
            parse("+proj=merc +lat_ts=abc"),
            Err(GalileoProjError::InvalidAngle { param, value }) if param == "lat_ts" && value == "abc"
        );
        assert_matches!(
            parse("+proj=merc +x_0=1,5"),
            Err(GalileoProjError::InvalidNumber { param, value }) if param == "x_0" && value == "1,5"
        );
        assert_matches!(
            parse("+proj=utm +ellps=GRS80"),
            Err(GalileoProjError::MissingParameter { param, proj }) if param == "zone" && proj == "utm"
        );
        assert_matches!(
            parse("+proj=utm +zone=61"),
            Err(GalileoProjError::InvalidParameter { param, .. }) if param == "zone"
        );
    }

    #[test]
    fn utm_zones() {
        let north = parse("+proj=utm +zone=32 +ellps=GRS80 +towgs84=0,0,0 +units=m +no_defs").unwrap();
        assert_eq!(north.central_meridian(), 9.0);
        assert_eq!(north.k_0(), 0.9996);

        let projected = north.latlon_to_east_north(&latlon!(52.0, 9.0));
        let arc = Ellipsoid::grs80().meridional_arc(52f64.to_radians());
        assert_abs_diff_eq!(projected.east(), 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.north(), 0.9996 * arc, epsilon = 1e-3);

        let south = parse("+proj=utm +zone=33 +south +datum=WGS84").unwrap();
        assert_eq!(south.central_meridian(), 15.0);
        assert_eq!(south.y_0(), 10_000_000.0);
        let projected = south.latlon_to_east_north(&latlon!(-30.0, 15.0));
        let arc = Ellipsoid::wgs84().meridional_arc((-30f64).to_radians());
        assert_abs_diff_eq!(projected.north(), 10_000_000.0 + 0.9996 * arc, epsilon = 1e-3);
    }

    #[test]
    fn scalar_parameters() {
        let meters = parse("+proj=merc +a=6378137 +b=6378137").unwrap();
        let kilometers = parse("+proj=merc +a=6378137 +b=6378137 +units=km").unwrap();
        let custom = parse("+proj=merc +a=6378137 +b=6378137 +to_meter=0.5").unwrap();
        let scaled = parse("+proj=merc +a=6378137 +b=6378137 +k=0.5").unwrap();
        let point = latlon!(40.0, 20.0);

        let reference = meters.latlon_to_east_north(&point);
        assert_abs_diff_eq!(
            kilometers.latlon_to_east_north(&point).east(),
            reference.east() / 1000.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            custom.latlon_to_east_north(&point).north(),
            reference.north() * 2.0,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            scaled.latlon_to_east_north(&point).east(),
            reference.east() / 2.0,
            epsilon = 1e-6
        );

        assert_matches!(
            parse("+proj=merc +units=parsec"),
            Err(GalileoProjError::UnknownUnit(unit)) if unit == "parsec"
        );
    }

    #[test]
    fn prime_meridians() {
        let paris = parse("+proj=longlat +ellps=clrk80ign +pm=paris").unwrap();
        assert_abs_diff_eq!(paris.prime_meridian(), 2.337229166666667, epsilon = 1e-12);

        let angle = parse("+proj=longlat +pm=-9.5").unwrap();
        assert_eq!(angle.prime_meridian(), -9.5);

        let ferro = parse("+proj=longlat +pm=ferro").unwrap();
        assert_abs_diff_eq!(ferro.prime_meridian(), -17.666666666666668, epsilon = 1e-12);

        assert_matches!(
            parse("+proj=longlat +pm=atlantis"),
            Err(GalileoProjError::UnknownPrimeMeridian(name)) if name == "atlantis"
        );
    }

    #[test]
    fn explicit_bounds() {
        let crs = parse("+proj=merc +bounds=-10,35d30',30,70").unwrap();
        assert_eq!(
            crs.world_bounds(),
            Bounds::from_lon_lat(-10.0, 35.5, 30.0, 70.0)
        );

        assert_matches!(
            parse("+proj=merc +bounds=1,2,3"),
            Err(GalileoProjError::WrongArgumentCount { param, expected }) if param == "bounds" && expected == "4"
        );
        assert_matches!(
            parse("+proj=merc +bounds=1,2,3,x"),
            Err(GalileoProjError::InvalidAngle { param, .. }) if param == "bounds"
        );
    }

    #[test]
    fn angles_in_parameters() {
        let crs = parse("+proj=tmerc +lat_0=49d +lon_0=2dW +k_0=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +towgs84=0,0,0").unwrap();
        assert_eq!(crs.central_meridian(), -2.0);
        let projected = crs.latlon_to_east_north(&latlon!(49.0, -2.0));
        assert_abs_diff_eq!(projected.east(), 400_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(projected.north(), -100_000.0, epsilon = 1e-6);
    }
}
