use crate::error::GalileoProjError;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::io::BufRead;

lazy_static! {
    static ref RECORD: Regex =
        Regex::new(r"^<([^>]+)>\s*(.*?)\s*<>\s*$").expect("record pattern is valid");
}

/// Named definition string of a coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpsgDefinition {
    code: String,
    name: String,
    definition: String,
}

impl EpsgDefinition {
    /// Creates a new definition. The code is stored in upper case.
    pub fn new(code: &str, name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            code: code.to_uppercase(),
            name: name.into(),
            definition: definition.into(),
        }
    }

    /// Code, e.g. `EPSG:4326`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// PROJ.4 parameter string.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

/// Reads definitions in the `epsg` file format:
///
/// ```text
/// # WGS 84
/// <4326> +proj=longlat +datum=WGS84 +no_defs <>
/// ```
///
/// Each record must be preceded by a comment line with the name of the system. Numeric codes get
/// the `EPSG:` prefix. Records that cannot be read are skipped.
pub fn read_definitions(reader: impl BufRead) -> Result<Vec<EpsgDefinition>, GalileoProjError> {
    let mut definitions = vec![];
    let mut name: Option<String> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            name = Some(comment.trim().to_string());
            continue;
        }

        let Some(captures) = RECORD.captures(line) else {
            warn!("Skipping unreadable projection record at line {}: {line}", index + 1);
            continue;
        };

        let Some(record_name) = name.take() else {
            return Err(GalileoProjError::DefinitionSource(format!(
                "record at line {} has no name",
                index + 1
            )));
        };

        let code = captures.get(1).map_or("", |m| m.as_str()).trim();
        let definition = captures.get(2).map_or("", |m| m.as_str());
        let code = if code.contains(':') {
            code.to_string()
        } else {
            format!("EPSG:{code}")
        };

        definitions.push(EpsgDefinition::new(&code, record_name, definition));
    }

    Ok(definitions)
}
