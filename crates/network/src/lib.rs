//! LumiPet device synchronization layer
//!
//! This crate translates the editor state into the device messages and publishes them
//! via an implementation agnostic publish/subscribe bus.

// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
// Too many false positives.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::missing_const_for_fn
)]

use std::fmt::Display;

pub use lumipet_core as core;
use lumipet_core::ConnectionState;

pub use crate::{
    config::{BusConfig, Channels, DEFAULT_BROKER_URL},
    import::{
        import_from_video, import_from_video_frames, parse_animation_payload,
        parse_frame_matrices, VideoFrameSource, DEFAULT_THRESHOLD,
    },
    memory::MemoryBus,
    message::{AnimationPayload, Message},
    sync::DeviceSync,
};

mod config;
mod import;
mod memory;
mod message;
mod sync;

/// The trait provides the operations of an external publish/subscribe bus client.
///
/// The connection lifecycle is driven by the client itself, the state transitions
/// happen in response to the transport events and can only be observed via
/// [`Bus::state`].
pub trait Bus {
    /// Error type returned on transport failure.
    type Error: Display;
    /// Returns the current connection state.
    fn state(&self) -> ConnectionState;
    /// Starts connecting to the broker.
    fn connect(&mut self) -> Result<(), Self::Error>;
    /// Publishes a message to the given topic.
    ///
    /// The client is not required to check the connection state.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;
    /// Closes the connection.
    fn disconnect(&mut self);
}

impl<T: Bus + ?Sized> Bus for &mut T {
    type Error = T::Error;

    fn state(&self) -> ConnectionState {
        T::state(self)
    }

    fn connect(&mut self) -> Result<(), Self::Error> {
        T::connect(self)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        T::publish(self, topic, payload)
    }

    fn disconnect(&mut self) {
        T::disconnect(self);
    }
}
