//! Controller side of the request channel.

use crate::channel::EXCHANGE_TIMEOUT;
use crate::debugger::error::Error;
use crate::wire::{Connection, Request, Response};
use log::debug;
use std::net::{SocketAddr, TcpStream};

/// Issues one request per connection against a debuggee.
///
/// Holds no socket between calls, so a client stays valid across debuggee
/// restarts for as long as the address does.
#[derive(Debug, Clone)]
pub struct RequestClient {
    addr: SocketAddr,
}

impl RequestClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Open a connection, send `request`, wait for the response.
    pub fn call(&self, request: &Request) -> Result<Response, Error> {
        let stream = TcpStream::connect_timeout(&self.addr, EXCHANGE_TIMEOUT)?;
        let mut connection = Connection::with_timeout(stream, EXCHANGE_TIMEOUT)?;
        connection.write(request)?;
        let response: Response = connection.read()?;
        debug!(target: "wire", "{request:?} answered with {response:?}");
        Ok(response)
    }
}
