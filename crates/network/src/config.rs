//! Bus client and device channels configuration.

use serde::{Deserialize, Serialize};

/// Default address of the device bus broker.
pub const DEFAULT_BROKER_URL: &str = "ws://192.168.43.239:9001/mqtt";

/// Names of the device channels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Channels {
    /// Sets a single static pattern, the payload is a grid string.
    pub pattern: String,
    /// Uploads an animation, the payload is a JSON object with frames.
    pub animation_list: String,
    /// Plays an already uploaded animation, the payload is its name.
    pub animation_play: String,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            pattern: "LumiPet/pattern/set".to_owned(),
            animation_list: "LumiPet/animation_list/set".to_owned(),
            animation_play: "LumiPet/animation_play/set".to_owned(),
        }
    }
}

/// Bus client settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BusConfig {
    /// Broker address.
    pub broker_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub channels: Channels,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            broker_url: DEFAULT_BROKER_URL.to_owned(),
            username: None,
            password: None,
            channels: Channels::default(),
        }
    }
}
