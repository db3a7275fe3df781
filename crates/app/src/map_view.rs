//! Projection between screen pixels and the lat/lng cell lattice.
//!
//! The map panel is centred on the player. Screen `y` grows downward while
//! latitude grows northward, so the vertical axis is flipped here and
//! nowhere else.

use cellmerge_core::{CellCoord, GameConfig, LatLng, ViewportBounds};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Overlap of two rects, `None` when they do not overlap.
    pub fn intersect(&self, other: PanelRect) -> Option<PanelRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        (right > left && bottom > top)
            .then(|| PanelRect { x: left, y: top, width: right - left, height: bottom - top })
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub panel: PanelRect,
    pub center: LatLng,
    degrees_per_px: f64,
}

impl MapView {
    pub fn new(panel: PanelRect, center: LatLng, cell_px: f32, config: &GameConfig) -> Self {
        let degrees_per_px = config.tile_degrees / f64::from(cell_px.max(1.0));
        Self { panel, center, degrees_per_px }
    }

    pub fn screen_of(&self, pos: LatLng) -> (f32, f32) {
        let (cx, cy) = self.panel.center();
        let dx = (pos.lng - self.center.lng) / self.degrees_per_px;
        let dy = (pos.lat - self.center.lat) / self.degrees_per_px;
        (cx + dx as f32, cy - dy as f32)
    }

    pub fn lat_lng_at(&self, x: f32, y: f32) -> LatLng {
        let (cx, cy) = self.panel.center();
        LatLng::new(
            self.center.lat + f64::from(cy - y) * self.degrees_per_px,
            self.center.lng + f64::from(x - cx) * self.degrees_per_px,
        )
    }

    /// Geographic bounds covered by the panel.
    pub fn viewport(&self) -> ViewportBounds {
        ViewportBounds::around(
            self.center,
            f64::from(self.panel.height) / 2.0 * self.degrees_per_px,
            f64::from(self.panel.width) / 2.0 * self.degrees_per_px,
        )
    }

    pub fn cell_rect(&self, config: &GameConfig, coord: CellCoord) -> PanelRect {
        let (south_west, north_east) = config.cell_bounds(coord);
        let (left, bottom) = self.screen_of(south_west);
        let (right, top) = self.screen_of(north_east);
        PanelRect { x: left, y: top, width: right - left, height: bottom - top }
    }

    /// Cell under a screen point, or `None` outside the map panel.
    pub fn cell_at(&self, config: &GameConfig, x: f32, y: f32) -> Option<CellCoord> {
        self.panel.contains(x, y).then(|| config.cell_of(self.lat_lng_at(x, y)))
    }
}
