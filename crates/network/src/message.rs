//! LumiPet device messages

use lumipet_core::{AnimationData, Error, Fps, Grid, Result, PLACEHOLDER_NAME};
use serde::{Deserialize, Serialize};

use crate::Channels;

/// Outgoing device message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Destination channel.
    pub topic: String,
    pub payload: String,
}

impl Message {
    /// Creates a message which sets a single static pattern.
    pub fn pattern(channels: &Channels, grid: &Grid) -> Self {
        Self {
            topic: channels.pattern.clone(),
            payload: grid.to_string(),
        }
    }

    /// Creates a message which uploads animation frames to the device.
    pub fn animation(channels: &Channels, name: Option<&str>, data: &AnimationData) -> Result<Self> {
        let payload = AnimationPayload::new(name, data);
        Ok(Self {
            topic: channels.animation_list.clone(),
            payload: serde_json::to_string(&payload).map_err(Error::format)?,
        })
    }

    /// Creates a message which plays an animation already uploaded to the device.
    pub fn play(channels: &Channels, name: Option<&str>) -> Self {
        Self {
            topic: channels.animation_play.clone(),
            payload: display_name(name).to_owned(),
        }
    }
}

/// Animation representation sent over the animation-list channel.
///
/// ```json
/// { "name": "wave", "fps": 8, "frames": ["00000000,...", "..."] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnimationPayload {
    pub name: String,
    pub fps: Fps,
    pub frames: Vec<Grid>,
}

impl AnimationPayload {
    /// Creates a payload, a missing or blank name is replaced by the placeholder.
    pub fn new(name: Option<&str>, data: &AnimationData) -> Self {
        Self {
            name: display_name(name).to_owned(),
            fps: data.fps,
            frames: data.frames().to_vec(),
        }
    }

    /// Converts the payload into a looped animation.
    pub fn into_animation_data(self) -> Result<AnimationData> {
        AnimationData::new(self.fps, self.frames)
    }
}

/// Returns the given name or the placeholder for the unsaved animations.
pub(crate) fn display_name(name: Option<&str>) -> &str {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => PLACEHOLDER_NAME,
    }
}

#[cfg(test)]
mod tests {
    use lumipet_core::{AnimationData, Fps, Grid, PLACEHOLDER_NAME};
    use pretty_assertions::assert_eq;

    use super::Message;
    use crate::Channels;

    #[test]
    fn test_animation_message_layout() {
        let data = AnimationData::new(
            Fps::new(12).unwrap(),
            vec![Grid::empty(), Grid::empty().toggle(0, 0)],
        )
        .unwrap();

        let message = Message::animation(&Channels::default(), Some("blink"), &data).unwrap();
        assert_eq!(message.topic, "LumiPet/animation_list/set");
        assert_eq!(
            message.payload,
            concat!(
                r#"{"name":"blink","fps":12,"frames":["#,
                r#""00000000,00000000,00000000,00000000,00000000,00000000,00000000,00000000","#,
                r#""10000000,00000000,00000000,00000000,00000000,00000000,00000000,00000000"]}"#,
            )
        );
    }

    #[test]
    fn test_blank_names_use_placeholder() {
        let channels = Channels::default();
        for name in [None, Some(""), Some("   ")] {
            assert_eq!(Message::play(&channels, name).payload, PLACEHOLDER_NAME);
        }
        assert_eq!(Message::play(&channels, Some(" wave ")).payload, "wave");
    }
}
