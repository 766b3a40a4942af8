//! Controller requests and their server side dispatch.

use crate::debugger::snapshot::SourceSpan;
use crate::debugger::{Debugger, LocalDebugger};
use crate::wire::Response;
use serde::{Deserialize, Serialize};

/// One synchronous request of the request channel.
///
/// The wire form is an envelope, `kind` picks the variant and the variant
/// fields travel under `payload`. A `kind` nobody knows is a decode error,
/// not a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Request {
    GetStatus,
    GetLine,
    GetStack,
    GetVariables { frame: u32 },
    InstallBreakpoint { section: SourceSpan, armed: bool },
    Suspend,
    Resume,
    StepInto,
    StepOver,
    StepOut,
    IsStepping,
}

impl Request {
    /// Run the request against the engine. Engine errors collapse into
    /// [`Response::Failed`], the exchange itself never fails here.
    pub fn execute(&self, debugger: &LocalDebugger) -> Response {
        let result = match self {
            Request::GetStatus => Ok(Response::Status {
                status: debugger.status(),
            }),
            Request::GetLine => debugger.line().map(|line| Response::Line { line }),
            Request::GetStack => debugger.stack().map(|frames| Response::Stack { frames }),
            Request::GetVariables { frame } => debugger
                .variables(*frame)
                .map(|variables| Response::Variables { variables }),
            Request::InstallBreakpoint { section, armed } => debugger
                .install_breakpoint(section, *armed)
                .map(|_| Response::Done),
            Request::Suspend => debugger.suspend().map(|_| Response::Done),
            Request::Resume => debugger.resume().map(|_| Response::Done),
            Request::StepInto => debugger.step_into().map(|_| Response::Done),
            Request::StepOver => debugger.step_over().map(|_| Response::Done),
            Request::StepOut => debugger.step_out().map(|_| Response::Done),
            Request::IsStepping => debugger
                .is_stepping()
                .map(|stepping| Response::Stepping { stepping }),
        };
        result.unwrap_or_else(|e| Response::Failed {
            reason: e.to_string(),
        })
    }
}
