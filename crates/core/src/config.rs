//! Tunable game constants and the tile projection derived from them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CellCoord, LatLng, TokenValue};

pub const DEFAULT_ANCHOR: LatLng = LatLng::new(36.997936938057016, -122.05703507501151);
pub const DEFAULT_TILE_DEGREES: f64 = 1e-4;
pub const DEFAULT_INTERACT_RADIUS: u32 = 3;
pub const DEFAULT_GRID_MARGIN: u32 = 5;
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.5;
pub const DEFAULT_TARGET_VALUE: TokenValue = 32;
pub const DEFAULT_SAVE_KEY: &str = "cellmerge.save.v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// South-west corner of cell (0, 0) and the default player position.
    pub anchor: LatLng,
    pub tile_degrees: f64,
    pub interact_radius: u32,
    pub grid_margin: u32,
    pub spawn_probability: f64,
    pub value_options: Vec<TokenValue>,
    pub target_value: TokenValue,
    pub save_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR,
            tile_degrees: DEFAULT_TILE_DEGREES,
            interact_radius: DEFAULT_INTERACT_RADIUS,
            grid_margin: DEFAULT_GRID_MARGIN,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            value_options: vec![1, 2, 4],
            target_value: DEFAULT_TARGET_VALUE,
            save_key: DEFAULT_SAVE_KEY.to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file. A missing file is not an error and yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_degrees.is_finite() && self.tile_degrees > 0.0) {
            return Err(ConfigError::Invalid("tile_degrees must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::Invalid("spawn_probability must be within [0, 1]".to_string()));
        }
        if self.value_options.is_empty() || self.value_options.contains(&0) {
            return Err(ConfigError::Invalid(
                "value_options must list at least one positive value".to_string(),
            ));
        }
        if self.target_value == 0 {
            return Err(ConfigError::Invalid("target_value must be positive".to_string()));
        }
        if self.save_key.is_empty() {
            return Err(ConfigError::Invalid("save_key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Cell containing a continuous position.
    pub fn cell_of(&self, pos: LatLng) -> CellCoord {
        let i = ((pos.lat - self.anchor.lat) / self.tile_degrees).floor();
        let j = ((pos.lng - self.anchor.lng) / self.tile_degrees).floor();
        CellCoord::new(i as i32, j as i32)
    }

    /// `(south_west, north_east)` corners of a cell.
    pub fn cell_bounds(&self, coord: CellCoord) -> (LatLng, LatLng) {
        let south = self.anchor.lat + f64::from(coord.i) * self.tile_degrees;
        let west = self.anchor.lng + f64::from(coord.j) * self.tile_degrees;
        (
            LatLng::new(south, west),
            LatLng::new(south + self.tile_degrees, west + self.tile_degrees),
        )
    }

    pub fn cell_center(&self, coord: CellCoord) -> LatLng {
        let (south_west, _) = self.cell_bounds(coord);
        LatLng::new(
            south_west.lat + self.tile_degrees / 2.0,
            south_west.lng + self.tile_degrees / 2.0,
        )
    }
}
