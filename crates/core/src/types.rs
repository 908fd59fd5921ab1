use core::{fmt::Display, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Animation playback rate in frames per second.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fps(u8);

impl Fps {
    /// The lowest supported playback rate.
    pub const MIN: u8 = 1;
    /// The highest supported playback rate.
    pub const MAX: u8 = 24;
    /// Rate used for the freshly imported animations.
    pub const DEFAULT: Self = Self(8);

    /// Creates a new playback rate, the value must be in the `[1, 24]` range.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::FpsOutOfRange(value))
        }
    }

    /// Returns the raw frames per second value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the time between two adjacent frames, i.e. `1000 / fps` milliseconds.
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs(1) / u32::from(self.0)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Fps {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Fps> for u8 {
    fn from(fps: Fps) -> Self {
        fps.0
    }
}

impl FromStr for Fps {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = u8::from_str(s.trim()).map_err(Error::format)?;
        Self::new(value)
    }
}

impl Display for Fps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque unique animation identifier.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct AnimationId(pub String);

impl AnimationId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnimationId {
    fn from(inner: &str) -> Self {
        Self(inner.to_owned())
    }
}

impl FromStr for AnimationId {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for AnimationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The state of the connection between the application and the device bus.
///
/// Transitions are driven entirely by the bus client.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("disconnected"),
            ConnectionState::Connecting => f.write_str("connecting"),
            ConnectionState::Connected => f.write_str("connected"),
            ConnectionState::Failed => f.write_str("failed"),
        }
    }
}
