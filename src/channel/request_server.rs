//! Debuggee side of the request channel.

use crate::channel::ServerHandle;
use crate::debugger::error::Error;
use crate::debugger::LocalDebugger;
use crate::wire::Request;
use log::debug;
use std::sync::Arc;

/// Listens for controller requests and runs them against the engine.
///
/// One request and one response per connection. A malformed request aborts
/// its exchange without an answer, the server keeps accepting.
pub struct RequestServer {
    server: ServerHandle,
}

impl RequestServer {
    pub fn start(debugger: Arc<LocalDebugger>) -> Result<Self, Error> {
        let server = ServerHandle::spawn("request", move |mut connection| {
            let request: Request = connection.read()?;
            debug!(target: "wire", "request: {request:?}");
            let response = request.execute(&debugger);
            connection.write(&response)
        })?;
        Ok(Self { server })
    }

    /// Port the controller sends requests to.
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Stop accepting and join the channel thread.
    pub fn stop(mut self) {
        self.server.stop();
    }
}
