//! Debuggee side of the event channel: pushes engine events out.

use crate::channel::EXCHANGE_TIMEOUT;
use crate::debugger::error::Error;
use crate::debugger::{DebugListener, ResumeReason, SuspendReason};
use crate::weak_error;
use crate::wire::{Ack, Connection, Event};
use std::net::{SocketAddr, TcpStream};

/// Pushes events to the controller, one connection per event.
///
/// As a [`DebugListener`] it is best effort: an event the controller does
/// not take is logged and dropped, a dead event channel never blocks the
/// debugged program.
#[derive(Debug, Clone)]
pub struct EventClient {
    addr: SocketAddr,
}

impl EventClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Push one event and wait for the controller's receipt.
    pub fn send(&self, event: &Event) -> Result<(), Error> {
        let stream = TcpStream::connect_timeout(&self.addr, EXCHANGE_TIMEOUT)?;
        let mut connection = Connection::with_timeout(stream, EXCHANGE_TIMEOUT)?;
        connection.write(event)?;
        let Ack::Received = connection.read::<Ack>()?;
        Ok(())
    }
}

impl DebugListener for EventClient {
    fn on_connected(&self, host: &str, port: u16) {
        let event = Event::Connected {
            host: host.to_string(),
            port,
        };
        weak_error!(self.send(&event), "connected event push error");
    }

    fn on_suspended(&self, reason: SuspendReason) {
        weak_error!(
            self.send(&Event::Suspended { reason }),
            "suspended event push error"
        );
    }

    fn on_resumed(&self, reason: ResumeReason) {
        weak_error!(
            self.send(&Event::Resumed { reason }),
            "resumed event push error"
        );
    }

    fn on_terminated(&self) {
        weak_error!(self.send(&Event::Terminated), "terminated event push error");
    }
}
