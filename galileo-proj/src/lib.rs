//! Galileo proj converts coordinates between WGS84 geographic coordinates and the projected
//! coordinates of map projections. Coordinate systems are described with PROJ.4 parameter strings
//! or referenced by their EPSG codes.
//!
//! # Quick start
//!
//! ```
//! use galileo_proj::coord::{EastNorth, GeoPoint, LatLon};
//! use galileo_proj::{Catalog, ChainProjection, Projection};
//!
//! let catalog = Catalog::new();
//! let bng = catalog.get("EPSG:27700").unwrap();
//!
//! let projected = bng.latlon_to_east_north(&LatLon::new(51.4778, -0.0014));
//! let back = bng.east_north_to_latlon(&projected);
//! assert!((back.lat() - 51.4778).abs() < 1e-9);
//!
//! let chain = ChainProjection::new(
//!     catalog.get("EPSG:4326").unwrap(),
//!     catalog.projection("+proj=merc +a=6378137 +b=6378137 +nadgrids=@null").unwrap(),
//! );
//! let mercator = chain.convert(&EastNorth::new(0.0, 0.0));
//! assert_eq!((mercator.east(), mercator.north()), (0.0, 0.0));
//! ```
//!
//! # Main components
//!
//! * [`Ellipsoid`] is a reference ellipsoid with the geodesic formulas depending only on its shape.
//! * [`Datum`] converts geographic coordinates between a local ellipsoid and WGS84, either with
//!   a Helmert transformation or with an NTv2 grid ([`ntv2`]).
//! * [`Proj`](proj::Proj) is a base projection working on a unit ellipsoid.
//! * [`Crs`] combines all of the above with false origin, scale and units. It implements the
//!   [`Projection`] trait.
//! * [`ProjectionStringParser`] creates [`Crs`] from PROJ.4 strings.
//! * [`Catalog`] knows definitions by code, loads grid files and caches created systems.
//!
//! Conversions never fail. Points that cannot be converted produce non-finite coordinates. All
//! configuration errors are reported with [`GalileoProjError`] when a system is created.

pub mod bounds;
pub mod catalog;
pub mod coord;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
pub mod error;
pub mod ntv2;
pub mod parser;
pub mod proj;

pub use bounds::Bounds;
pub use catalog::{Catalog, DirectoryGridSource, EpsgDefinition, GridSource};
pub use crs::{custom_code, ChainProjection, Crs, Projection};
pub use datum::Datum;
pub use ellipsoid::Ellipsoid;
pub use error::GalileoProjError;
pub use parser::{parse_angle, ProjectionStringParser};
