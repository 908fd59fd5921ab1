//! LumiPet animation core
//!
//! Data model shared by the whole workspace: 8x8 binary frames, animations made of
//! them, their persisted records and the common error type.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

pub use crate::{
    animation::{AnimationData, AnimationRecord},
    errors::{Error, Result},
    grid::Grid,
    types::{AnimationId, ConnectionState, Fps},
};

pub mod animation;
pub mod errors;
pub mod grid;
pub mod types;

/// Name used for the animations which have not been saved yet.
pub const PLACEHOLDER_NAME: &str = "[preview] untitled";
