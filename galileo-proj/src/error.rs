//! Error types used by the crate.

use crate::ntv2::Ntv2Error;
use thiserror::Error;

/// Configuration error. Raised while a projection definition is parsed or assembled, never while
/// individual points are converted.
#[derive(Debug, Error)]
pub enum GalileoProjError {
    /// A token in a definition string does not start with `+`.
    #[error("parameter must begin with a '+' sign (found '{0}')")]
    MissingPlus(String),
    /// A token does not have the `+key[=value]` form.
    #[error("unexpected parameter format ('{0}')")]
    ParameterFormat(String),
    /// Parameter key is not known.
    #[error("unknown parameter: '{0}'")]
    UnknownParameter(String),
    /// Parameter that requires a value was given without one.
    #[error("value expected for parameter '{0}'")]
    MissingValue(String),
    /// Flag parameter was given a value.
    #[error("parameter '{0}' does not take a value")]
    UnexpectedValue(String),
    /// Value could not be parsed as a number.
    #[error("unable to parse value '{value}' of parameter '{param}' as number")]
    InvalidNumber {
        /// Parameter name.
        param: String,
        /// Original value.
        value: String,
    },
    /// Value could not be parsed as an angle.
    #[error("unable to parse value '{value}' of parameter '{param}' as coordinate value")]
    InvalidAngle {
        /// Parameter name.
        param: String,
        /// Original value.
        value: String,
    },
    /// A parameter list has the wrong number of elements.
    #[error("unexpected number of arguments for parameter '{param}' (must be {expected})")]
    WrongArgumentCount {
        /// Parameter name.
        param: String,
        /// Human readable description of the accepted counts.
        expected: String,
    },
    /// Parameter required by the projection is not set.
    #[error("parameter '{param}' required for projection '{proj}'")]
    MissingParameter {
        /// Parameter name.
        param: String,
        /// Projection id.
        proj: String,
    },
    /// Parameter value is outside of the range accepted by the projection.
    #[error("invalid value of parameter '{param}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        param: String,
        /// Details.
        reason: String,
    },
    /// `a` given together with none or an unsupported set of the other ellipsoid parameters.
    #[error("combination of ellipsoid parameters is not supported")]
    EllipsoidCombination,
    /// Unknown ellipsoid id.
    #[error("ellipsoid '{0}' not supported")]
    UnknownEllipsoid(String),
    /// Unknown datum id.
    #[error("unknown datum identifier: '{0}'")]
    UnknownDatum(String),
    /// Unknown projection id.
    #[error("unknown projection identifier: '{0}'")]
    UnknownProjection(String),
    /// Unknown prime meridian name.
    #[error("unknown prime meridian: '{0}'")]
    UnknownPrimeMeridian(String),
    /// Unknown length unit.
    #[error("unknown unit: '{0}'")]
    UnknownUnit(String),
    /// The definition does not name a projection.
    #[error("projection required (+proj=*)")]
    ProjectionRequired,
    /// Code is not in the catalog.
    #[error("unknown projection code: '{0}'")]
    UnknownCode(String),
    /// `+init` references nest deeper than allowed.
    #[error("too many nested +init references while expanding '{0}'")]
    InitTooDeep(String),
    /// Grid file is not available from the grid source.
    #[error("grid file '{0}' not found")]
    GridNotFound(String),
    /// Grid file exists but cannot be decoded.
    #[error("failed to decode grid file")]
    Grid(#[from] Ntv2Error),
    /// EPSG definition source is malformed.
    #[error("corrupted projection definition source: {0}")]
    DefinitionSource(String),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}
