//! Socket channels between a debuggee and its controller.
//!
//! Both channels follow the same shape: an ephemeral loopback port, one
//! message and one reply per accepted connection, a dedicated serving
//! thread stopped through a flag. [`RequestServer`] and [`EventClient`]
//! live in the debuggee, [`RequestClient`] and [`EventServer`] in the
//! controller.

mod event_client;
mod event_server;
mod request_client;
mod request_server;

pub use event_client::EventClient;
pub use event_server::EventServer;
pub use request_client::RequestClient;
pub use request_server::RequestServer;

use crate::debugger::error::Error;
use crate::wire::Connection;
use log::{info, warn};
use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long `accept` may stay idle before the stop flag is polled again,
/// this bounds shutdown latency.
const ACCEPT_PERIOD: Duration = Duration::from_millis(25);

/// Deadline for a whole exchange on one accepted or opened connection.
pub(crate) const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// A serving thread plus the handle that stops it.
///
/// Connections are handled one at a time on the thread itself, which is
/// what serializes request handling against the engine.
pub(crate) struct ServerHandle {
    port: u16,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Bind an ephemeral loopback port and serve connections with
    /// `handler`. Returns once the port is bound, so the port number is
    /// immediately usable.
    pub fn spawn<H>(name: &'static str, handler: H) -> Result<Self, Error>
    where
        H: FnMut(Connection) -> Result<(), Error> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let (bound_sender, bound_receiver) = mpsc::sync_channel(0);
        let thread = thread::Builder::new()
            .name(format!("stepwire-{name}"))
            .spawn({
                let stop = stop.clone();
                move || serve(name, handler, bound_sender, stop)
            })?;

        match bound_receiver.recv() {
            Ok(Ok(port)) => Ok(Self {
                port,
                stop,
                thread: Some(thread),
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(Error::ChannelStartup(name))
            }
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Raise the stop flag and join the serving thread.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve<H>(
    name: &'static str,
    mut handler: H,
    bound: mpsc::SyncSender<Result<u16, Error>>,
    stop: Arc<AtomicBool>,
) where
    H: FnMut(Connection) -> Result<(), Error>,
{
    let listener = match bind() {
        Ok(listener) => listener,
        Err(e) => {
            let _ = bound.send(Err(e));
            return;
        }
    };
    let port = match listener.local_addr() {
        Ok(addr) => addr.port(),
        Err(e) => {
            let _ = bound.send(Err(e.into()));
            return;
        }
    };
    if bound.send(Ok(port)).is_err() {
        return;
    }
    info!(target: "wire", "{name} channel listening on 127.0.0.1:{port}");

    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = exchange(stream, &mut handler) {
                    warn!(target: "wire", "{name} exchange with {peer} failed: {e}");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(ACCEPT_PERIOD),
            Err(e) => warn!(target: "wire", "{name} accept failed: {e}"),
        }
    }
    info!(target: "wire", "{name} channel stopped");
}

fn bind() -> Result<TcpListener, Error> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

fn exchange<H>(stream: TcpStream, handler: &mut H) -> Result<(), Error>
where
    H: FnMut(Connection) -> Result<(), Error>,
{
    // the listener is non blocking, accepted sockets must not be
    stream.set_nonblocking(false)?;
    handler(Connection::with_timeout(stream, EXCHANGE_TIMEOUT)?)
}
