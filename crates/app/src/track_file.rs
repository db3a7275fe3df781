//! Recorded position tracks used as the live location feed.

use std::fs;
use std::io;
use std::path::Path;

use cellmerge_core::{LatLng, TrackProvider};

/// Load a JSON array of `{"lat": .., "lng": ..}` fixes.
pub fn load_track(path: &Path) -> io::Result<Vec<LatLng>> {
    let content = fs::read_to_string(path)?;
    parse_track(&content)
}

pub fn parse_track(content: &str) -> io::Result<Vec<LatLng>> {
    let fixes: Vec<LatLng> = serde_json::from_str(content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if fixes.iter().any(|fix| !fix.lat.is_finite() || !fix.lng.is_finite()) {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "track contains a non-finite fix"));
    }
    Ok(fixes)
}

pub fn load_track_provider(path: &Path) -> io::Result<TrackProvider> {
    load_track(path).map(TrackProvider::new)
}
