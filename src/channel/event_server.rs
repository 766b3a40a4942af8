//! Controller side of the event channel.

use crate::channel::ServerHandle;
use crate::debugger::error::Error;
use crate::debugger::DebugListener;
use crate::wire::{Ack, Event};
use log::debug;
use std::sync::Arc;

/// Receives debuggee events and feeds them to a [`DebugListener`].
///
/// The listener runs on the channel thread before the ack is written, so
/// once the debuggee's push returns, the controller has seen the event.
pub struct EventServer {
    server: ServerHandle,
}

impl EventServer {
    pub fn start(listener: Arc<dyn DebugListener>) -> Result<Self, Error> {
        let server = ServerHandle::spawn("event", move |mut connection| {
            let event: Event = connection.read()?;
            debug!(target: "wire", "event: {event:?}");
            dispatch(&event, listener.as_ref());
            connection.write(&Ack::Received)
        })?;
        Ok(Self { server })
    }

    /// Port the debuggee pushes events to, hand it to
    /// [`DebugSession::connect`](crate::session::DebugSession::connect).
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Stop accepting and join the channel thread.
    pub fn stop(mut self) {
        self.server.stop();
    }
}

fn dispatch(event: &Event, listener: &dyn DebugListener) {
    match event {
        Event::Connected { host, port } => listener.on_connected(host, *port),
        Event::Suspended { reason } => listener.on_suspended(*reason),
        Event::Resumed { reason } => listener.on_resumed(*reason),
        Event::Terminated => listener.on_terminated(),
    }
}
