//! Registry of coordinate system definitions, grid shift files and constructed systems.

use crate::crs::Crs;
use crate::error::GalileoProjError;
use crate::ntv2::GridShiftFile;
use crate::parser::ProjectionStringParser;
use ahash::HashMap;
use log::{debug, error, info};
use parking_lot::RwLock;
use quick_cache::sync::Cache;
use std::io::BufRead;
use std::sync::Arc;

mod epsg;
mod grid_source;
pub mod tables;

pub use epsg::{read_definitions, EpsgDefinition};
pub use grid_source::{DirectoryGridSource, GridSource};
pub use tables::DatumDefinition;

const BUILTIN_DEFINITIONS: &str = include_str!("../../data/epsg");
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Registry of coordinate systems.
///
/// Holds the definition strings by code, resolves grid files through the configured
/// [`GridSource`]s and caches both the loaded grids and the systems built from the definitions.
/// A catalog is meant to be created once and shared.
///
/// ```
/// use galileo_proj::coord::LatLon;
/// use galileo_proj::{Catalog, Projection};
///
/// let catalog = Catalog::new();
/// let crs = catalog.get("EPSG:3857").unwrap();
/// let projected = crs.latlon_to_east_north(&LatLon::new(0.0, 0.0));
/// assert_eq!((projected.east(), projected.north()), (0.0, 0.0));
/// ```
pub struct Catalog {
    definitions: HashMap<String, EpsgDefinition>,
    grid_sources: Vec<Box<dyn GridSource>>,
    grids: RwLock<HashMap<String, Arc<GridShiftFile>>>,
    systems: Cache<String, Arc<Crs>>,
}

impl Catalog {
    /// Creates a catalog with the built-in definitions and without grid sources.
    pub fn new() -> Self {
        let catalog = Self::empty();
        match read_definitions(BUILTIN_DEFINITIONS.as_bytes()) {
            Ok(definitions) => catalog.with_definitions(definitions),
            Err(err) => {
                error!("Failed to read built-in projection definitions: {err}");
                catalog
            }
        }
    }

    /// Creates a catalog without any definitions.
    pub fn empty() -> Self {
        Self {
            definitions: HashMap::default(),
            grid_sources: vec![],
            grids: RwLock::new(HashMap::default()),
            systems: Cache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Adds definitions. Definitions with an existing code replace the old ones.
    pub fn with_definitions(mut self, definitions: impl IntoIterator<Item = EpsgDefinition>) -> Self {
        for definition in definitions {
            self.definitions
                .insert(definition.code().to_string(), definition);
        }

        debug!("Catalog has {} definitions", self.definitions.len());
        self
    }

    /// Adds definitions read from a source in the `epsg` file format.
    pub fn with_definitions_from(self, reader: impl BufRead) -> Result<Self, GalileoProjError> {
        Ok(self.with_definitions(read_definitions(reader)?))
    }

    /// Adds a grid source. Sources are queried in the order they were added.
    pub fn with_grid_source(mut self, source: impl GridSource + 'static) -> Self {
        self.grid_sources.push(Box::new(source));
        self
    }

    /// Sets the number of constructed systems kept in the cache.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.systems = Cache::new(capacity.max(1));
        self
    }

    /// Definition by code. Codes are case insensitive.
    pub fn definition(&self, code: &str) -> Option<&EpsgDefinition> {
        self.definitions.get(&code.to_uppercase())
    }

    /// All known codes in alphabetical order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Parser resolving references with this catalog.
    pub fn parser(&self) -> ProjectionStringParser<'_> {
        ProjectionStringParser::new(self)
    }

    /// Coordinate system by code. Systems are built once and then served from the cache.
    pub fn get(&self, code: &str) -> Result<Arc<Crs>, GalileoProjError> {
        let code = code.to_uppercase();
        self.systems.get_or_insert_with(&code, || {
            let definition = self
                .definition(&code)
                .ok_or_else(|| GalileoProjError::UnknownCode(code.clone()))?;

            debug!("Building {code} ({})", definition.name());
            let crs = self
                .parser()
                .parse_with_code(definition.definition(), definition.code())?
                .with_name(definition.name());

            Ok(Arc::new(crs))
        })
    }

    /// Coordinate system from a catalog code or a definition string (anything that is empty or
    /// starts with `+`).
    pub fn projection(&self, code_or_definition: &str) -> Result<Arc<Crs>, GalileoProjError> {
        let trimmed = code_or_definition.trim();
        if trimmed.is_empty() || trimmed.starts_with('+') {
            Ok(Arc::new(self.parser().parse(trimmed)?))
        } else {
            self.get(trimmed)
        }
    }

    /// Grid shift file by name. The file is loaded and decoded at the first request. Returns
    /// `Ok(None)` if none of the grid sources has the file.
    pub fn grid(&self, name: &str) -> Result<Option<Arc<GridShiftFile>>, GalileoProjError> {
        if let Some(grid) = self.grids.read().get(name) {
            return Ok(Some(grid.clone()));
        }

        let mut grids = self.grids.write();
        if let Some(grid) = grids.get(name) {
            return Ok(Some(grid.clone()));
        }

        for source in &self.grid_sources {
            if let Some(data) = source.load(name)? {
                let grid = Arc::new(GridShiftFile::from_bytes(data, false)?);
                info!(
                    "Loaded grid {name} with {} sub-grids",
                    grid.header().sub_grid_count
                );

                grids.insert(name.to_string(), grid.clone());
                return Ok(Some(grid));
            }
        }

        Ok(None)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("definitions", &self.definitions.len())
            .field("grid_sources", &self.grid_sources.len())
            .field("grids", &self.grids.read().len())
            .field("systems", &self.systems.len())
            .finish()
    }
}
