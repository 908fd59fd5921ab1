//! Publishing of the editor state to the device.

use lumipet_core::{AnimationData, ConnectionState, Error, Grid, Result};

use crate::{Bus, Channels, Message};

/// LumiPet device synchronization protocol.
///
/// Every publish attempt checks the bus connection state inline: if the bus is not
/// connected, the attempt fails immediately with [`Error::NotConnected`] and nothing
/// is sent. There is no queue and no retry, this is up to the caller.
///
/// The protocol never connects or disconnects the bus, the bus lifecycle belongs to
/// the session owning it.
#[derive(Debug)]
pub struct DeviceSync<B> {
    bus: B,
    channels: Channels,
}

impl<B: Bus> DeviceSync<B> {
    /// Creates a new protocol instance on top of the given bus with the default channels.
    pub fn new(bus: B) -> Self {
        Self::with_channels(bus, Channels::default())
    }

    /// Creates a new protocol instance that publishes to the given channels.
    pub fn with_channels(bus: B, channels: Channels) -> Self {
        Self { bus, channels }
    }

    /// Returns the current bus connection state.
    pub fn state(&self) -> ConnectionState {
        self.bus.state()
    }

    /// Returns a reference to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consumes the protocol and returns the underlying bus.
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Sends a single static pattern to the device.
    pub fn publish_single_pattern(&mut self, grid: &Grid) -> Result<()> {
        self.ensure_connected()?;
        self.send(Message::pattern(&self.channels, grid))
    }

    /// Uploads an animation to the device.
    ///
    /// The unsaved animations are sent with the placeholder name.
    pub fn publish_animation(&mut self, name: Option<&str>, data: &AnimationData) -> Result<()> {
        self.ensure_connected()?;
        let message = Message::animation(&self.channels, name, data)?;
        self.send(message)
    }

    /// Asks the device to play an animation which it has already received.
    pub fn publish_play_command(&mut self, name: Option<&str>) -> Result<()> {
        self.ensure_connected()?;
        self.send(Message::play(&self.channels, name))
    }

    /// Uploads an animation and immediately plays it.
    pub fn preview(&mut self, name: Option<&str>, data: &AnimationData) -> Result<()> {
        self.publish_animation(name, data)?;
        self.publish_play_command(name)
    }

    fn ensure_connected(&self) -> Result<()> {
        let state = self.bus.state();
        if state.is_connected() {
            Ok(())
        } else {
            log::warn!("Rejected publish attempt, the bus is {state}");
            Err(Error::NotConnected(state))
        }
    }

    fn send(&mut self, message: Message) -> Result<()> {
        log::trace!("Publishing {} to [{}]", message.payload, message.topic);
        self.bus
            .publish(&message.topic, message.payload.as_bytes())
            .map_err(Error::transport)?;
        log::info!(
            "Published {} bytes to [{}]",
            message.payload.len(),
            message.topic
        );
        Ok(())
    }
}
