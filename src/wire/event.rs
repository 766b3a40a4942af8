//! Events the debuggee pushes on the event channel.

use crate::debugger::{ResumeReason, SuspendReason};
use serde::{Deserialize, Serialize};

/// One asynchronous notification, debuggee to controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Event {
    /// First event of a session, tells the controller where the request
    /// channel listens.
    Connected { host: String, port: u16 },
    Suspended { reason: SuspendReason },
    Resumed { reason: ResumeReason },
    Terminated,
}

/// Receipt the controller answers every event with. The debuggee does not
/// continue past a suspension until it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Ack {
    Received,
}
