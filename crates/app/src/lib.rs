pub mod app_loop;
pub mod file_storage;
pub mod launch;
pub mod map_view;
pub mod track_file;

use cellmerge_core::LatLng;

pub const APP_NAME: &str = "Cellmerge";

/// Format a position with five decimals, about one metre of precision.
pub fn format_position(position: LatLng) -> String {
    format!("{:.5}, {:.5}", position.lat, position.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_position_rounds_to_five_decimals() {
        assert_eq!(format_position(LatLng::new(36.997936938, -122.057035075)), "36.99794, -122.05704");
    }
}
