//! Answers the debuggee sends back on the request channel.

use crate::debugger::snapshot::{StackFrame, Variable};
use crate::debugger::Status;
use serde::{Deserialize, Serialize};

/// Response to exactly one [`Request`](crate::wire::Request).
///
/// `Done` answers the command family, the query family answers with its
/// value. `Failed` carries the engine error as text, rendering it is all a
/// controller can do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Response {
    Status { status: Status },
    Line { line: Option<u32> },
    Stack { frames: Vec<StackFrame> },
    Variables { variables: Vec<Variable> },
    Stepping { stepping: bool },
    Done,
    Failed { reason: String },
}
