use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric token value. Tokens only ever double, so an unsigned integer suffices.
pub type TokenValue = u64;

/// Integer tile address relative to the configured anchor. `i` grows northward
/// (latitude), `j` grows eastward (longitude).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub i: i32,
    pub j: i32,
}

impl CellCoord {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Chebyshev distance, so the reach zone around a cell is a square.
    pub fn chebyshev(self, other: CellCoord) -> u32 {
        self.i.abs_diff(other.i).max(self.j.abs_diff(other.j))
    }

    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self { i: self.i.saturating_add(di), j: self.j.saturating_add(dj) }
    }

    /// Key used for the persisted overlay list.
    pub fn key(self) -> String {
        format!("{},{}", self.i, self.j)
    }

    /// Parses `"i,j"`; whitespace around either component is tolerated so keys
    /// written as `"i, j"` load too.
    pub fn parse_key(raw: &str) -> Option<Self> {
        let (i, j) = raw.split_once(',')?;
        Some(Self { i: i.trim().parse().ok()?, j: j.trim().parse().ok()? })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Continuous geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
