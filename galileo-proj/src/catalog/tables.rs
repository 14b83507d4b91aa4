//! Named ellipsoids, datums, prime meridians and units accepted in definition strings.

use crate::ellipsoid::Ellipsoid;

/// Ids of all named ellipsoids.
pub const ELLIPSOID_IDS: &[&str] = &[
    "WGS84", "GRS80", "intl", "clrk66", "clrk80ign", "clrk80", "bessel", "bess_nam", "krass",
    "airy", "mod_airy", "helmert", "aust_SA", "evrst30", "evrstSS", "WGS72", "GRS67", "hough",
    "fschr68", "andrae", "sphere",
];

/// Ids of all named datums.
pub const DATUM_IDS: &[&str] = &[
    "WGS84",
    "NAD83",
    "GRS80",
    "GGRS87",
    "potsdam",
    "carthage",
    "hermannskogel",
    "ire65",
    "nzgd49",
    "OSGB36",
];

/// Ellipsoid by its `+ellps` id.
pub fn ellipsoid(id: &str) -> Option<Ellipsoid> {
    let ellipsoid = match id {
        "WGS84" => Ellipsoid::wgs84(),
        "GRS80" => Ellipsoid::grs80(),
        "intl" => Ellipsoid::hayford(),
        "clrk66" => Ellipsoid::clarke1866(),
        "clrk80ign" => Ellipsoid::clarke_ign(),
        "clrk80" => Ellipsoid::from_a_rf(6_378_249.145, 293.4663),
        "bessel" => Ellipsoid::bessel1841(),
        "bess_nam" => Ellipsoid::from_a_rf(6_377_483.865, 299.1528128),
        "krass" => Ellipsoid::from_a_rf(6_378_245.0, 298.3),
        "airy" => Ellipsoid::from_a_b(6_377_563.396, 6_356_256.910),
        "mod_airy" => Ellipsoid::from_a_b(6_377_340.189, 6_356_034.446),
        "helmert" => Ellipsoid::from_a_rf(6_378_200.0, 298.3),
        "aust_SA" => Ellipsoid::from_a_rf(6_378_160.0, 298.25),
        "evrst30" => Ellipsoid::from_a_rf(6_377_276.345, 300.8017),
        "evrstSS" => Ellipsoid::from_a_rf(6_377_298.556, 300.8017),
        "WGS72" => Ellipsoid::from_a_rf(6_378_135.0, 298.26),
        "GRS67" => Ellipsoid::from_a_rf(6_378_160.0, 298.247_167_427),
        "hough" => Ellipsoid::from_a_rf(6_378_270.0, 297.0),
        "fschr68" => Ellipsoid::from_a_rf(6_378_150.0, 298.3),
        "andrae" => Ellipsoid::from_a_rf(6_377_104.43, 300.0),
        "sphere" => Ellipsoid::sphere(6_370_997.0),
        _ => return None,
    };

    Some(ellipsoid)
}

/// Named datum: an ellipsoid and the `+towgs84` parameters used for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumDefinition {
    ellipsoid: Ellipsoid,
    towgs84: [f64; 7],
}

impl DatumDefinition {
    fn new(ellipsoid: Ellipsoid, towgs84: [f64; 7]) -> Self {
        Self { ellipsoid, towgs84 }
    }

    fn translation(ellipsoid: Ellipsoid, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(ellipsoid, [dx, dy, dz, 0.0, 0.0, 0.0, 0.0])
    }

    /// Ellipsoid of the datum.
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Transformation parameters in the `+towgs84` order.
    pub fn towgs84(&self) -> [f64; 7] {
        self.towgs84
    }
}

/// Datum by its `+datum` id.
pub fn datum(id: &str) -> Option<DatumDefinition> {
    let definition = match id {
        "WGS84" => DatumDefinition::translation(Ellipsoid::wgs84(), 0.0, 0.0, 0.0),
        "NAD83" | "GRS80" => DatumDefinition::translation(Ellipsoid::grs80(), 0.0, 0.0, 0.0),
        "GGRS87" => DatumDefinition::translation(Ellipsoid::grs80(), -199.87, 74.79, 246.62),
        "potsdam" => DatumDefinition::new(
            Ellipsoid::bessel1841(),
            [598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7],
        ),
        "carthage" => DatumDefinition::translation(Ellipsoid::clarke_ign(), -263.0, 6.0, 431.0),
        "hermannskogel" => DatumDefinition::new(
            Ellipsoid::bessel1841(),
            [577.326, 90.129, 463.919, 5.137, 1.474, 5.297, 2.4232],
        ),
        "ire65" => DatumDefinition::new(
            ellipsoid("mod_airy")?,
            [482.530, -130.596, 564.557, -1.042, -0.214, -0.631, 8.15],
        ),
        "nzgd49" => DatumDefinition::new(
            Ellipsoid::hayford(),
            [59.47, -5.04, 187.44, 0.47, -0.1, 1.024, -4.5993],
        ),
        "OSGB36" => DatumDefinition::new(
            ellipsoid("airy")?,
            [446.448, -125.157, 542.060, 0.1502, 0.2470, 0.8421, -20.4894],
        ),
        _ => return None,
    };

    Some(definition)
}

/// Longitude of a named prime meridian as an angle string.
pub fn prime_meridian(name: &str) -> Option<&'static str> {
    let angle = match name {
        "greenwich" => "0dE",
        "lisbon" => "9d07'54.862\"W",
        "paris" => "2d20'14.025\"E",
        "bogota" => "74d04'51.3\"W",
        "madrid" => "3d41'14.55\"W",
        "rome" => "12d27'8.4\"E",
        "bern" => "7d26'22.5\"E",
        "jakarta" => "106d48'27.79\"E",
        "ferro" => "17d40'W",
        "brussels" => "4d22'4.71\"E",
        "stockholm" => "18d3'29.8\"E",
        "athens" => "23d42'58.815\"E",
        "oslo" => "10d43'22.5\"E",
        _ => return None,
    };

    Some(angle)
}

/// Length of a named unit in meters.
pub fn unit(name: &str) -> Option<f64> {
    let to_meter = match name {
        "km" => 1000.0,
        "m" => 1.0,
        "dm" => 0.1,
        "cm" => 0.01,
        "mm" => 0.001,
        "kmi" => 1852.0,
        "in" => 0.0254,
        "ft" => 0.3048,
        "yd" => 0.9144,
        "mi" => 1609.344,
        "fath" => 1.8288,
        "ch" => 20.1168,
        "link" => 0.201168,
        "us-in" => 100.0 / 3937.0,
        "us-ft" => 1200.0 / 3937.0,
        "us-yd" => 3600.0 / 3937.0,
        "us-ch" => 79200.0 / 3937.0,
        "us-mi" => 6_336_000.0 / 3937.0,
        "ind-yd" => 0.91439523,
        "ind-ft" => 0.30479841,
        "ind-ch" => 20.11669506,
        _ => return None,
    };

    Some(to_meter)
}
