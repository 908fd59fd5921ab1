//! LumiPet animation editor
//!
//! Editing session logic: the frames timeline, its local playback and the glue which
//! saves the animation to the store and sends it to the device.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn,
    clippy::len_without_is_empty
)]

pub use lumipet_core as core;
pub use lumipet_core::{Error as LumipetError, Result as LumipetResult};
pub use lumipet_network as network;
pub use lumipet_storage as storage;

pub use crate::{
    editor::Editor,
    playback::Playback,
    timeline::{Frames, Timeline},
};

mod editor;
mod playback;
mod timeline;
