//! Configuration loading from TOML files.
//!
//! Every section and key is optional; anything left out takes the market's
//! built-in value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{ConfigError, Result};
use crate::geometry::GeoCoord;
use crate::georef::{DrawingBounds, GeoBounds, GeoTransform, TransformParams};
use crate::io::CoordSpace;
use crate::operations::doors::DEFAULT_DOOR_EPSILON_M;
use crate::operations::preprocess::{DEFAULT_ROOF_INSET_M, DEFAULT_WALL_THICKNESS_M};
use crate::operations::route::DEFAULT_MERGE_TOLERANCE;
use crate::pipeline::PipelineOptions;

/// Where the source data lives and which space it is drawn in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub booths: PathBuf,
    pub walkways: PathBuf,
    pub entrances: Option<PathBuf>,
    pub space: CoordSpace,
    /// yEd floor plan; when set, booths and walkways come from it instead
    /// of the GeoJSON files.
    pub graphml: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            booths: PathBuf::from("data/floor.geojson"),
            walkways: PathBuf::from("data/walkways.geojson"),
            entrances: None,
            space: CoordSpace::Geographic,
            graphml: None,
        }
    }
}

/// Offset distances in metres.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub roof_inset_m: f64,
    pub wall_thickness_m: f64,
    pub door_epsilon_m: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            roof_inset_m: DEFAULT_ROOF_INSET_M,
            wall_thickness_m: DEFAULT_WALL_THICKNESS_M,
            door_epsilon_m: DEFAULT_DOOR_EPSILON_M,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Walkway vertices closer than this (degrees) are one node.
    pub merge_tolerance: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }
}

/// Endpoints a fresh session starts from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub origin: GeoCoord,
    pub destination: GeoCoord,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            origin: GeoCoord::new(-79.359_141_210_226_92, 43.812_614_077_877_61),
            destination: GeoCoord::new(-79.359_742_826_814_03, 43.812_829_177_963_664),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub geometry: GeometryConfig,
    pub routing: RoutingConfig,
    /// Geographic box of the map.
    pub bounds: GeoBounds,
    /// Floor-plan extent in drawing units.
    pub extent: DrawingBounds,
    pub transform: TransformParams,
    pub navigation: NavigationConfig,
}

impl Config {
    /// Loads configuration from a TOML file. Relative data paths are
    /// resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(dir) = path.parent() {
            config.data.resolve_against(dir);
        }
        Ok(config)
    }

    /// Loads configuration, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "using default configuration");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            roof_inset_m: self.geometry.roof_inset_m,
            wall_thickness_m: self.geometry.wall_thickness_m,
            door_epsilon_m: self.geometry.door_epsilon_m,
            merge_tolerance: self.routing.merge_tolerance,
        }
    }

    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the calibration is singular.
    pub fn transform(&self) -> Result<GeoTransform> {
        GeoTransform::new(self.transform, self.extent)
    }
}

impl DataConfig {
    fn resolve_against(&mut self, dir: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        join(&mut self.booths);
        join(&mut self.walkways);
        for p in [self.entrances.as_mut(), self.graphml.as_mut()].into_iter().flatten() {
            join(p);
        }
    }
}
