//! Remote debug core for embeddable script runtimes.
//!
//! A host runtime makes its programs debuggable by driving a
//! [`LocalDebugger`] through four execution hooks (method and statement
//! enter/leave) and exposing its scopes behind the [`debugger::host`]
//! traits. A controller, in the same process or across a socket pair,
//! suspends, inspects and steps the program through the [`Debugger`]
//! operations.
//!
//! The remote path runs over two channels: the request channel carries
//! synchronous request/response pairs into the debuggee, the event
//! channel pushes suspension and termination events back out. Both use
//! ephemeral ports, one message per connection and a length prefixed
//! JSON envelope, see [`wire`].

pub mod channel;
pub mod debugger;
pub mod proxy;
pub mod session;
pub mod wire;

pub use debugger::{
    DebugListener, Debugger, DebuggerBuilder, Error, LocalDebugger, ResumeReason, Status,
    SuspendReason,
};
pub use proxy::{LivenessProbe, RemoteDebugger, RemoteFrame};
pub use session::DebugSession;
