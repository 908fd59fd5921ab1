//! LumiPet command line utility helpers.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::imageops::FilterType;
use lumipet_app::{
    core::{grid::GRID_SIZE, Grid},
    network::{BusConfig, MemoryBus, Message},
};
use serde::{Deserialize, Serialize};

/// Default directory for the animations store.
pub const DEFAULT_STORE_DIR: &str = "lumipet-store";

/// The utility configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Device bus settings.
    pub bus: BusConfig,
    /// Directory with the stored animations.
    pub store_dir: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

impl Configuration {
    /// Reads the configuration from the given JSON file.
    ///
    /// A missing file gives the default configuration.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No configuration at {path:?}, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration from {path:?}"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed configuration in {path:?}"))
    }
}

/// Reduces an image to 8x8 row-major grayscale values.
pub fn pixelate_image(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    let image = image::open(path).with_context(|| format!("Unable to open image {path:?}"))?;

    let size = GRID_SIZE as u32;
    Ok(image
        .resize_exact(size, size, FilterType::Triangle)
        .to_luma8()
        .into_raw())
}

/// Renders a grid as a block of text, one line per row.
pub fn render_grid(grid: &Grid) -> String {
    let mut out = String::with_capacity(GRID_SIZE * (GRID_SIZE * 2 + 1));
    for row in grid.rows() {
        for on in row {
            out.push_str(if on { "██" } else { "··" });
        }
        out.push('\n');
    }
    out
}

/// Creates a dry-run bus, the published messages are only logged.
pub fn dry_run_bus(config: &BusConfig) -> MemoryBus {
    log::info!(
        "Using a dry-run bus instead of {} (user: {})",
        config.broker_url,
        config.username.as_deref().unwrap_or("anonymous")
    );
    MemoryBus::default()
}

/// Formats the published messages for the output.
pub fn describe_messages(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        // Writing into a string never fails.
        let _ = writeln!(out, "[{}] {}", message.topic, message.payload);
    }
    out
}

#[cfg(test)]
mod tests {
    use lumipet_app::core::Grid;
    use pretty_assertions::assert_eq;

    use super::{render_grid, Configuration, DEFAULT_STORE_DIR};

    #[test]
    fn test_render_grid() {
        let rendered = render_grid(&Grid::empty().toggle(0, 0).toggle(7, 7));
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "██··············");
        assert_eq!(lines[7], "··············██");
    }

    #[test]
    fn test_configuration_defaults() {
        let config: Configuration =
            serde_json::from_str(r#"{ "bus": { "username": "mqtt" } }"#).unwrap();
        assert_eq!(config.store_dir.to_str(), Some(DEFAULT_STORE_DIR));
        assert_eq!(config.bus.username.as_deref(), Some("mqtt"));
        assert_eq!(config.bus.channels.pattern, "LumiPet/pattern/set");

        let dir = tempfile::tempdir().unwrap();
        let missing = Configuration::load(dir.path().join("lumipet.json")).unwrap();
        assert_eq!(missing, Configuration::default());
    }

    #[test]
    fn test_malformed_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumipet.json");
        std::fs::write(&path, "{ bus: }").unwrap();
        assert!(Configuration::load(&path).is_err());
    }
}
