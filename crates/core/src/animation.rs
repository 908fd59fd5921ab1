//! Animation data model and its persisted representation.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    grid::Grid,
    types::{AnimationId, Fps},
    Error, Result,
};

/// Playback description of an animation: frame rate, loop flag and the frames themselves.
///
/// An animation always has at least one frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawAnimationData")]
pub struct AnimationData {
    pub fps: Fps,
    #[serde(rename = "loop")]
    pub looped: bool,
    frames: Vec<Grid>,
}

#[derive(Deserialize)]
struct RawAnimationData {
    fps: Fps,
    #[serde(rename = "loop", default = "default_loop")]
    looped: bool,
    frames: Vec<Grid>,
}

fn default_loop() -> bool {
    true
}

impl TryFrom<RawAnimationData> for AnimationData {
    type Error = Error;

    fn try_from(raw: RawAnimationData) -> Result<Self> {
        let mut data = Self::new(raw.fps, raw.frames)?;
        data.looped = raw.looped;
        Ok(data)
    }
}

impl AnimationData {
    /// Creates a new looped animation from the given frames.
    pub fn new(fps: Fps, frames: Vec<Grid>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::InvariantViolation(
                "an animation must have at least one frame",
            ));
        }

        Ok(Self {
            fps,
            looped: true,
            frames,
        })
    }

    /// Creates a single empty frame animation with the default frame rate.
    pub fn blank() -> Self {
        Self {
            fps: Fps::DEFAULT,
            looped: true,
            frames: vec![Grid::empty()],
        }
    }

    /// Returns the animation frames.
    pub fn frames(&self) -> &[Grid] {
        &self.frames
    }

    /// Consumes the animation and returns its frames.
    pub fn into_frames(self) -> Vec<Grid> {
        self.frames
    }

    /// Returns the frames count, it is never zero.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false, kept for the API symmetry with the [`Self::len`] method.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// An animation record kept in the animations store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnimationRecord {
    /// Identifier assigned once at creation time.
    pub id: AnimationId,
    /// User visible animation name.
    pub name: String,
    /// Creation timestamp.
    #[serde(rename = "createdAt", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub data: AnimationData,
}

impl AnimationRecord {
    /// Creates a new record with a fresh identifier and the current timestamp.
    pub fn new(name: &str, data: AnimationData) -> Result<Self> {
        Ok(Self {
            id: AnimationId::generate(),
            name: validate_name(name)?,
            created_at: Utc::now().trunc_subsecs(3),
            data,
        })
    }

    /// Validates the record before it gets persisted.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name).map(drop)
    }
}

/// ISO-8601 timestamps in UTC with the milliseconds always present.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// Returns a trimmed name or an error if there is nothing left after trimming.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name.to_owned())
}
