//! Debuggee side session wiring.

use crate::channel::{EventClient, RequestServer};
use crate::debugger::error::Error;
use crate::debugger::{DebuggerBuilder, LocalDebugger};
use crate::wire::Event;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

/// Everything the debuggee process needs for one debug session: the
/// engine, its request server and the event push channel.
pub struct DebugSession {
    debugger: Arc<LocalDebugger>,
    requests: RequestServer,
}

impl DebugSession {
    /// Wire a new engine to a controller listening for events at
    /// `events_addr`.
    ///
    /// Builds the engine with the event channel as its listener (a
    /// listener set on `builder` is replaced), starts the request server
    /// on an ephemeral port and announces that port with a `Connected`
    /// event. The announcement must succeed, a session whose controller
    /// never learns the port would be useless.
    pub fn connect(events_addr: SocketAddr, builder: DebuggerBuilder) -> Result<Self, Error> {
        let events = EventClient::new(events_addr);
        let debugger = Arc::new(builder.with_listener(Arc::new(events.clone())).build());
        let requests = RequestServer::start(debugger.clone())?;
        events.send(&Event::Connected {
            host: "127.0.0.1".to_string(),
            port: requests.port(),
        })?;
        info!(target: "debugger", "session connected, requests on port {}", requests.port());
        Ok(Self { debugger, requests })
    }

    /// The engine to hand to the host runtime's hooks.
    pub fn debugger(&self) -> &Arc<LocalDebugger> {
        &self.debugger
    }

    pub fn request_port(&self) -> u16 {
        self.requests.port()
    }

    /// Stop the request channel and join its thread.
    pub fn shutdown(self) {
        self.requests.stop();
    }
}
