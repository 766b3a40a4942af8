//! Controller side view of a remote debuggee.

use crate::channel::RequestClient;
use crate::debugger::error::Error;
use crate::debugger::snapshot::{SourceSpan, StackFrame, Variable};
use crate::debugger::{Debugger, Status};
use crate::muted_error;
use crate::wire::{Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;

/// Tells whether the debuggee process or thread is still alive. Consulted
/// out of band, before spending a network round trip on a peer that has
/// already exited.
pub type LivenessProbe = Arc<dyn Fn() -> bool + Send + Sync>;

/// [`Debugger`] implementation forwarding every operation over the
/// request channel.
///
/// Failures follow the per family policy: `status` degrades to a status
/// value, queries raise [`Error::Unreachable`], commands are best effort
/// pushes to a possibly exiting debuggee and swallow transport failures.
pub struct RemoteDebugger {
    client: RequestClient,
    alive: LivenessProbe,
}

impl RemoteDebugger {
    pub fn new(addr: SocketAddr, alive: LivenessProbe) -> Self {
        Self {
            client: RequestClient::new(addr),
            alive,
        }
    }

    /// The remote stack wrapped into lazily resolving proxy frames.
    pub fn frames(&self) -> Result<Vec<RemoteFrame<'_>>, Error> {
        Ok(self
            .stack()?
            .into_iter()
            .map(|frame| RemoteFrame {
                debugger: self,
                frame,
            })
            .collect())
    }

    fn query(&self, request: &Request) -> Result<Response, Error> {
        match self.client.call(request) {
            Ok(Response::Failed { reason }) => Err(Error::Remote(reason)),
            Ok(response) => Ok(response),
            Err(e) => Err(Error::Unreachable(e.to_string())),
        }
    }

    fn command(&self, request: &Request) -> Result<(), Error> {
        if !(self.alive)() {
            return Ok(());
        }
        match muted_error!(self.client.call(request), "command push error") {
            Some(Response::Done) | None => Ok(()),
            Some(Response::Failed { reason }) => Err(Error::Remote(reason)),
            Some(_) => Err(Error::UnexpectedResponse("command")),
        }
    }
}

impl Debugger for RemoteDebugger {
    fn status(&self) -> Status {
        if !(self.alive)() {
            return Status::Terminated;
        }
        match muted_error!(self.client.call(&Request::GetStatus), "status poll error") {
            Some(Response::Status { status }) => status,
            Some(_) | None => Status::Unreachable,
        }
    }

    fn line(&self) -> Result<Option<u32>, Error> {
        match self.query(&Request::GetLine)? {
            Response::Line { line } => Ok(line),
            _ => Err(Error::UnexpectedResponse("get-line")),
        }
    }

    fn stack(&self) -> Result<Vec<StackFrame>, Error> {
        match self.query(&Request::GetStack)? {
            Response::Stack { frames } => Ok(frames),
            _ => Err(Error::UnexpectedResponse("get-stack")),
        }
    }

    fn variables(&self, frame: u32) -> Result<Vec<Variable>, Error> {
        match self.query(&Request::GetVariables { frame })? {
            Response::Variables { variables } => Ok(variables),
            _ => Err(Error::UnexpectedResponse("get-variables")),
        }
    }

    fn install_breakpoint(&self, span: &SourceSpan, armed: bool) -> Result<(), Error> {
        self.command(&Request::InstallBreakpoint {
            section: span.clone(),
            armed,
        })
    }

    fn suspend(&self) -> Result<(), Error> {
        self.command(&Request::Suspend)
    }

    fn resume(&self) -> Result<(), Error> {
        self.command(&Request::Resume)
    }

    fn step_into(&self) -> Result<(), Error> {
        self.command(&Request::StepInto)
    }

    fn step_over(&self) -> Result<(), Error> {
        self.command(&Request::StepOver)
    }

    fn step_out(&self) -> Result<(), Error> {
        self.command(&Request::StepOut)
    }

    fn is_stepping(&self) -> Result<bool, Error> {
        match self.query(&Request::IsStepping)? {
            Response::Stepping { stepping } => Ok(stepping),
            _ => Err(Error::UnexpectedResponse("is-stepping")),
        }
    }
}

/// One frame of the remote stack.
///
/// Wraps the transferred snapshot and fetches variables on demand with
/// one more round trip, keyed by the frame index.
pub struct RemoteFrame<'a> {
    debugger: &'a RemoteDebugger,
    frame: StackFrame,
}

impl RemoteFrame<'_> {
    pub fn snapshot(&self) -> &StackFrame {
        &self.frame
    }

    /// Bindings of this frame. The round trip is skipped when the
    /// snapshot already knows there is nothing to fetch.
    pub fn variables(&self) -> Result<Vec<Variable>, Error> {
        if !self.frame.has_variables {
            return Ok(Vec::new());
        }
        self.debugger.variables(self.frame.index)
    }
}
