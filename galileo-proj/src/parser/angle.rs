use crate::error::GalileoProjError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANGLE: Regex = Regex::new(
        r#"(?i)^(-)?(?:(\d+(?:\.\d*)?)|(?:(\d+(?:\.\d*)?)d)?(?:(\d+(?:\.\d*)?)')?(?:(\d+(?:\.\d*)?)")?)([NSEW])?$"#
    )
    .expect("angle pattern is valid");
}

/// Parses an angle in degrees.
///
/// Accepts decimal degrees (`-12.5`) and degrees, minutes and seconds (`11d13'56.19"`), both with
/// an optional hemisphere suffix. Each of the degrees, minutes and seconds parts is optional, but
/// at least one must be present. Hemisphere letters are case insensitive, `S` and `W` negate the
/// value.
///
/// ```
/// use galileo_proj::parser::parse_angle;
///
/// let lon = parse_angle("118d39'30.42\"W", "lon").unwrap();
/// assert!((lon + 118.65845).abs() < 1e-9);
/// ```
pub fn parse_angle(value: &str, param: &str) -> Result<f64, GalileoProjError> {
    let invalid = || GalileoProjError::InvalidAngle {
        param: param.into(),
        value: value.into(),
    };

    let captures = ANGLE.captures(value).ok_or_else(invalid)?;
    let part = |index: usize| -> Result<f64, GalileoProjError> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().map_err(|_| invalid()),
            None => Ok(0.0),
        }
    };

    if (2..=5).all(|index| captures.get(index).is_none()) {
        return Err(invalid());
    }

    let mut angle = part(2)? + part(3)? + part(4)? / 60.0 + part(5)? / 3600.0;
    if captures.get(1).is_some() {
        angle = -angle;
    }
    let hemisphere = captures.get(6).map(|m| m.as_str().to_ascii_uppercase());
    if matches!(hemisphere.as_deref(), Some("S" | "W")) {
        angle = -angle;
    }

    Ok(angle)
}
