//! In-memory bus implementation.

use lumipet_core::ConnectionState;

use crate::{Bus, Message};

/// The bus which keeps the published messages in memory instead of sending them.
///
/// Useful as a dry-run transport and as a test double: the connection state can be
/// forced with [`MemoryBus::set_state`] to emulate the transport callbacks.
#[derive(Debug, Default, Clone)]
pub struct MemoryBus {
    state: ConnectionState,
    published: Vec<Message>,
    fail_publish: bool,
}

impl MemoryBus {
    /// Creates a new bus in the connected state.
    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            ..Self::default()
        }
    }

    /// Emulates a connection state change reported by the transport.
    pub fn set_state(&mut self, state: ConnectionState) {
        log::debug!("Bus state changed: {} -> {state}", self.state);
        self.state = state;
    }

    /// Makes the subsequent publish calls fail as if the transport was broken.
    pub fn fail_publish(&mut self, fail: bool) {
        self.fail_publish = fail;
    }

    /// Returns all messages published so far.
    pub fn published(&self) -> &[Message] {
        &self.published
    }

    /// Takes all messages published so far.
    pub fn take_published(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.published)
    }
}

impl Bus for MemoryBus {
    type Error = &'static str;

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn connect(&mut self) -> Result<(), Self::Error> {
        self.set_state(ConnectionState::Connected);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        if self.fail_publish {
            return Err("publish failed");
        }

        let payload = String::from_utf8_lossy(payload).into_owned();
        self.published.push(Message {
            topic: topic.to_owned(),
            payload,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        self.set_state(ConnectionState::Disconnected);
    }
}
