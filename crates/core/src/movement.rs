//! Movement input providers.
//!
//! Exactly one controller is active at a time: discrete button steps or a live
//! position feed. Both end up calling the session's single "set player position"
//! entry point. Stopping a live controller unsubscribes it so no stale fix is
//! delivered after a switch.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LatLng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    #[default]
    Buttons,
    Geolocation,
}

impl MovementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buttons => "buttons",
            Self::Geolocation => "geolocation",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Buttons => Self::Geolocation,
            Self::Geolocation => Self::Buttons,
        }
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buttons" => Ok(Self::Buttons),
            "geolocation" => Ok(Self::Geolocation),
            other => Err(format!("movement mode '{other}' must be 'buttons' or 'geolocation'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Cell delta as `(di, dj)`; north is increasing latitude.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("location feed failed: {0}")]
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PositionEvent {
    Fix(LatLng),
    Error(LocationError),
}

/// A live position feed. Events are only delivered between `start` and `stop`.
pub trait PositionSource {
    fn start(&mut self) -> Result<(), LocationError>;
    fn stop(&mut self);
    fn poll(&mut self) -> Vec<PositionEvent>;
}

/// Hands out a fresh feed each time live movement is selected.
pub trait LocationProvider {
    fn open_source(&mut self) -> Box<dyn PositionSource>;
}

/// Feed that replays a fixed track, one fix per poll.
#[derive(Clone, Debug, Default)]
pub struct TrackSource {
    fixes: VecDeque<LatLng>,
    active: bool,
}

impl TrackSource {
    pub fn new(fixes: impl IntoIterator<Item = LatLng>) -> Self {
        Self { fixes: fixes.into_iter().collect(), active: false }
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

impl PositionSource for TrackSource {
    fn start(&mut self) -> Result<(), LocationError> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn poll(&mut self) -> Vec<PositionEvent> {
        if !self.active {
            return Vec::new();
        }
        self.fixes.pop_front().map(PositionEvent::Fix).into_iter().collect()
    }
}

/// Feed for a device without positioning; starting it always fails.
#[derive(Clone, Debug)]
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl PositionSource for UnavailableSource {
    fn start(&mut self) -> Result<(), LocationError> {
        Err(LocationError::Unavailable(self.reason.clone()))
    }

    fn stop(&mut self) {}

    fn poll(&mut self) -> Vec<PositionEvent> {
        Vec::new()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocationDevice;

impl LocationProvider for NoLocationDevice {
    fn open_source(&mut self) -> Box<dyn PositionSource> {
        Box::new(UnavailableSource::new("no positioning device"))
    }
}

/// Provider that opens a new replay of the same track on every switch.
#[derive(Clone, Debug, Default)]
pub struct TrackProvider {
    fixes: Vec<LatLng>,
}

impl TrackProvider {
    pub fn new(fixes: Vec<LatLng>) -> Self {
        Self { fixes }
    }
}

impl LocationProvider for TrackProvider {
    fn open_source(&mut self) -> Box<dyn PositionSource> {
        Box::new(TrackSource::new(self.fixes.iter().copied()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonInput {
    enabled: bool,
}

impl ButtonInput {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

pub struct LiveLocationInput {
    source: Box<dyn PositionSource>,
    subscribed: bool,
}

impl LiveLocationInput {
    pub fn subscribed(&self) -> bool {
        self.subscribed
    }
}

pub enum MovementController {
    Buttons(ButtonInput),
    LiveLocation(LiveLocationInput),
}

impl MovementController {
    pub fn buttons() -> Self {
        Self::Buttons(ButtonInput::default())
    }

    /// Buttons that are already accepting steps. Buttons cannot fail to start.
    pub fn started_buttons() -> Self {
        Self::Buttons(ButtonInput { enabled: true })
    }

    pub fn live(source: Box<dyn PositionSource>) -> Self {
        Self::LiveLocation(LiveLocationInput { source, subscribed: false })
    }

    pub fn mode(&self) -> MovementMode {
        match self {
            Self::Buttons(_) => MovementMode::Buttons,
            Self::LiveLocation(_) => MovementMode::Geolocation,
        }
    }

    pub fn start(&mut self) -> Result<(), LocationError> {
        match self {
            Self::Buttons(input) => {
                input.enabled = true;
                Ok(())
            }
            Self::LiveLocation(input) => {
                input.source.start()?;
                input.subscribed = true;
                Ok(())
            }
        }
    }

    pub fn stop(&mut self) {
        match self {
            Self::Buttons(input) => input.enabled = false,
            Self::LiveLocation(input) => {
                input.source.stop();
                input.subscribed = false;
            }
        }
    }

    /// Pending live events. Always empty for buttons or an unsubscribed feed.
    pub fn poll(&mut self) -> Vec<PositionEvent> {
        match self {
            Self::LiveLocation(input) if input.subscribed => input.source.poll(),
            _ => Vec::new(),
        }
    }

    pub fn accepts_steps(&self) -> bool {
        matches!(self, Self::Buttons(input) if input.enabled)
    }
}

impl fmt::Debug for MovementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buttons(input) => f.debug_tuple("Buttons").field(input).finish(),
            Self::LiveLocation(input) => {
                f.debug_struct("LiveLocation").field("subscribed", &input.subscribed).finish()
            }
        }
    }
}
