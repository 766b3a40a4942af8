//! Debug engine module: the stateful core of the crate.
//!
//! [`LocalDebugger`] lives inside the process that runs the script. The
//! host runtime drives it through the four execution hooks, a controller
//! drives it through the [`Debugger`] operations, usually from another
//! thread (or another process, via [`crate::proxy::RemoteDebugger`]).

pub mod error;
mod frame;
pub mod host;
pub mod snapshot;
pub mod step;

pub use error::Error;

use frame::{CallStack, LiveFrame};
use host::{Declaration, Scope, Section};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use snapshot::{SourceSpan, StackFrame, Variable};
use std::sync::{Arc, Condvar, Mutex};
use step::StepTarget;
use strum_macros::Display;

/// Lifecycle of a debugged program as the controller sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Status {
    /// Engine created, no hook has fired yet.
    Starting,
    /// Execution thread is between suspensions.
    Running,
    /// Execution thread is parked inside a hook.
    Suspended,
    /// Termination requested but the program still unwinds.
    Terminating,
    /// The program is done.
    Terminated,
    /// Reported by a remote proxy that lost its debuggee.
    Unreachable,
}

/// Why the engine parked the execution thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SuspendReason {
    Stepping,
    Breakpoint,
    Requested,
}

/// Which controller operation woke the execution thread up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ResumeReason {
    Resumed,
    StepInto,
    StepOver,
    StepOut,
}

/// Observer of engine lifecycle changes.
///
/// Callbacks run on the execution thread while it is inside a hook, so they
/// may block it. The event channel does: a suspension callback returns only
/// once the controller acknowledged the pushed event.
pub trait DebugListener: Send + Sync {
    fn on_connected(&self, _host: &str, _port: u16) {}
    fn on_suspended(&self, _reason: SuspendReason) {}
    fn on_resumed(&self, _reason: ResumeReason) {}
    fn on_terminated(&self) {}
}

struct NullListener;

impl DebugListener for NullListener {}

/// Debugger operations available identically on the in-process engine and
/// on a remote proxy.
///
/// The `can_*` family is advisory: the engine does not reject an operation
/// issued from the wrong state, a controller is expected to consult these
/// before acting.
pub trait Debugger {
    fn status(&self) -> Status;

    /// Current line of the innermost frame, `None` while the stack is empty.
    fn line(&self) -> Result<Option<u32>, Error>;

    /// Snapshot of the call stack, outermost frame first.
    fn stack(&self) -> Result<Vec<StackFrame>, Error>;

    /// Bindings of the frame at `frame` index. A stale or out of range
    /// index yields an empty collection, not an error.
    fn variables(&self, frame: u32) -> Result<Vec<Variable>, Error>;

    /// Arm or disarm the breakpoint flag of the section at `span`.
    fn install_breakpoint(&self, span: &SourceSpan, armed: bool) -> Result<(), Error>;

    /// Ask the execution thread to park at its next hook. Non blocking.
    fn suspend(&self) -> Result<(), Error>;

    /// Wake the execution thread with no step armed.
    fn resume(&self) -> Result<(), Error>;

    fn step_into(&self) -> Result<(), Error>;
    fn step_over(&self) -> Result<(), Error>;
    fn step_out(&self) -> Result<(), Error>;

    /// Is a step target currently armed.
    fn is_stepping(&self) -> Result<bool, Error>;

    fn is_suspended(&self) -> bool {
        self.status() == Status::Suspended
    }

    fn is_terminated(&self) -> bool {
        matches!(self.status(), Status::Terminated | Status::Unreachable)
    }

    fn can_suspend(&self) -> bool {
        self.status() == Status::Running
    }

    fn can_resume(&self) -> bool {
        self.is_suspended()
    }

    fn can_step_into(&self) -> bool {
        self.is_suspended()
    }

    fn can_step_over(&self) -> bool {
        self.is_suspended()
    }

    fn can_step_out(&self) -> bool {
        self.is_suspended()
    }
}

struct EngineState {
    status: Status,
    target: StepTarget,
    suspend_requested: bool,
    terminate_requested: bool,
    wake: bool,
    resume_reason: ResumeReason,
    stack: CallStack,
    /// Most recently observed scope, breakpoints are resolved through it.
    enclosing: Option<Arc<dyn Scope>>,
    terminated_notified: bool,
}

impl EngineState {
    fn mark_running(&mut self) {
        if self.status == Status::Starting {
            self.status = Status::Running;
        }
    }
}

/// The in-process debug engine.
///
/// Exactly one execution thread calls the hook methods, any number of
/// controller calls may arrive concurrently from other threads. All
/// mutable state sits behind one mutex, suspension is a condvar rendezvous
/// on the same mutex.
pub struct LocalDebugger {
    state: Mutex<EngineState>,
    woken: Condvar,
    listener: Mutex<Arc<dyn DebugListener>>,
}

impl LocalDebugger {
    /// Swap the event listener. The previous one is dropped.
    pub fn set_listener(&self, listener: Arc<dyn DebugListener>) {
        *self.listener.lock().unwrap() = listener;
    }

    fn listener(&self) -> Arc<dyn DebugListener> {
        self.listener.lock().unwrap().clone()
    }

    /// Hook: the program is about to execute the body of `decl`.
    ///
    /// Pushes a frame, then parks if a step target, a breakpoint flag or a
    /// pending suspend request says so. Returns [`Error::Terminated`] once
    /// termination was requested, the host runtime is expected to unwind.
    pub fn enter_method(&self, scope: &Arc<dyn Scope>, decl: &dyn Declaration) -> Result<(), Error> {
        self.check_terminated()?;
        let suspend = {
            let mut state = self.state.lock().unwrap();
            state.mark_running();
            state.enclosing = Some(scope.clone());
            state.stack.push(decl.name(), decl.span(), scope.clone());
            let size = state.stack.size();
            if state.target.matches_enter(size) {
                Some(SuspendReason::Stepping)
            } else if decl.is_breakpoint() {
                Some(SuspendReason::Breakpoint)
            } else if state.suspend_requested {
                Some(SuspendReason::Requested)
            } else {
                None
            }
        };
        if let Some(reason) = suspend {
            self.park(reason);
        }
        self.check_terminated()
    }

    /// Hook: the program finished the body entered by the matching
    /// [`enter_method`](Self::enter_method). Pops the frame.
    pub fn leave_method(&self, scope: &Arc<dyn Scope>, _section: &dyn Section) -> Result<(), Error> {
        self.check_terminated()?;
        if let Some(reason) = self.leave_check(scope) {
            self.park(reason);
        }
        if self.state.lock().unwrap().stack.pop().is_none() {
            warn!(target: "debugger", "leave hook on an empty stack");
        }
        self.check_terminated()
    }

    /// Hook: the program is about to execute the statement `section`.
    ///
    /// The top frame moves to the statement location, the stack depth does
    /// not change.
    pub fn enter_statement(
        &self,
        scope: &Arc<dyn Scope>,
        section: &dyn Section,
    ) -> Result<(), Error> {
        self.check_terminated()?;
        let suspend = {
            let mut state = self.state.lock().unwrap();
            state.mark_running();
            state.enclosing = Some(scope.clone());
            state.stack.relocate_top(section.span(), scope.clone());
            let size = state.stack.size();
            if state.target.matches_enter(size) {
                Some(SuspendReason::Stepping)
            } else if section.is_breakpoint() {
                Some(SuspendReason::Breakpoint)
            } else if state.suspend_requested {
                Some(SuspendReason::Requested)
            } else {
                None
            }
        };
        if let Some(reason) = suspend {
            self.park(reason);
        }
        self.check_terminated()
    }

    /// Hook: the statement finished. Checks step and suspend conditions
    /// but never touches the stack, the frame stays where
    /// [`enter_statement`](Self::enter_statement) moved it.
    pub fn leave_statement(
        &self,
        scope: &Arc<dyn Scope>,
        _section: &dyn Section,
    ) -> Result<(), Error> {
        self.check_terminated()?;
        if let Some(reason) = self.leave_check(scope) {
            self.park(reason);
        }
        self.check_terminated()
    }

    /// Hook: the program ended on its own. Publishes `Terminated` to the
    /// listener, once.
    pub fn notify_terminated(&self) {
        let publish = {
            let mut state = self.state.lock().unwrap();
            if state.terminated_notified {
                false
            } else {
                state.terminated_notified = true;
                state.status = Status::Terminated;
                true
            }
        };
        if publish {
            info!(target: "debugger", "program terminated");
            self.listener().on_terminated();
        }
    }

    /// Request termination of the debugged program.
    ///
    /// Wakes a parked execution thread, its current hook then returns
    /// [`Error::Terminated`] and the host runtime unwinds to
    /// [`notify_terminated`](Self::notify_terminated).
    pub fn terminate(&self) {
        let mut state = self.state.lock().unwrap();
        state.terminate_requested = true;
        if state.status != Status::Terminated {
            state.status = Status::Terminating;
        }
        state.wake = true;
        self.woken.notify_all();
        info!(target: "debugger", "termination requested");
    }

    fn check_terminated(&self) -> Result<(), Error> {
        if self.state.lock().unwrap().terminate_requested {
            Err(Error::Terminated)
        } else {
            Ok(())
        }
    }

    fn leave_check(&self, scope: &Arc<dyn Scope>) -> Option<SuspendReason> {
        let mut state = self.state.lock().unwrap();
        state.mark_running();
        state.enclosing = Some(scope.clone());
        let size = state.stack.size();
        if state.target.matches_leave(size) {
            Some(SuspendReason::Stepping)
        } else if state.suspend_requested {
            Some(SuspendReason::Requested)
        } else {
            None
        }
    }

    /// Park the execution thread until a resume family operation wakes it.
    /// No timeout: an abandoned program stays parked until its controller
    /// answers or terminates it.
    fn park(&self, reason: SuspendReason) {
        {
            let mut state = self.state.lock().unwrap();
            state.status = Status::Suspended;
            state.suspend_requested = false;
            state.wake = false;
        }
        info!(target: "debugger", "suspended ({reason})");
        self.listener().on_suspended(reason);

        let resumed = {
            let mut state = self.state.lock().unwrap();
            while !state.wake {
                state = self.woken.wait(state).unwrap();
            }
            state.wake = false;
            if state.terminate_requested {
                None
            } else {
                state.status = Status::Running;
                Some(state.resume_reason)
            }
        };
        if let Some(reason) = resumed {
            info!(target: "debugger", "resumed ({reason})");
            self.listener().on_resumed(reason);
        }
    }

    fn wake(&self, reason: ResumeReason, retarget: impl FnOnce(&EngineState) -> StepTarget) {
        let mut state = self.state.lock().unwrap();
        let target = retarget(&state);
        state.target = target;
        state.resume_reason = reason;
        state.wake = true;
        self.woken.notify_all();
    }
}

impl Default for LocalDebugger {
    fn default() -> Self {
        DebuggerBuilder::new().build()
    }
}

impl Debugger for LocalDebugger {
    fn status(&self) -> Status {
        self.state.lock().unwrap().status
    }

    fn line(&self) -> Result<Option<u32>, Error> {
        Ok(self.state.lock().unwrap().stack.top().map(LiveFrame::line))
    }

    fn stack(&self) -> Result<Vec<StackFrame>, Error> {
        Ok(self.state.lock().unwrap().stack.snapshot())
    }

    fn variables(&self, frame: u32) -> Result<Vec<Variable>, Error> {
        let state = self.state.lock().unwrap();
        Ok(state
            .stack
            .frame(frame)
            .map(LiveFrame::variables)
            .unwrap_or_default())
    }

    fn install_breakpoint(&self, span: &SourceSpan, armed: bool) -> Result<(), Error> {
        let scope = self
            .state
            .lock()
            .unwrap()
            .enclosing
            .clone()
            .ok_or(Error::NoEnclosingScope)?;
        let section = scope
            .locate_section(span)
            .ok_or_else(|| Error::SectionNotFound(span.clone()))?;
        section.set_breakpoint(armed);
        info!(
            target: "debugger",
            "breakpoint at {span} {}", if armed { "armed" } else { "disarmed" }
        );
        Ok(())
    }

    fn suspend(&self) -> Result<(), Error> {
        self.state.lock().unwrap().suspend_requested = true;
        Ok(())
    }

    fn resume(&self) -> Result<(), Error> {
        self.wake(ResumeReason::Resumed, |_| StepTarget::FREE_RUN);
        Ok(())
    }

    fn step_into(&self) -> Result<(), Error> {
        self.wake(ResumeReason::StepInto, |state| state.target.deeper());
        Ok(())
    }

    fn step_over(&self) -> Result<(), Error> {
        self.wake(ResumeReason::StepOver, |state| {
            StepTarget::over(state.stack.size())
        });
        Ok(())
    }

    fn step_out(&self) -> Result<(), Error> {
        self.wake(ResumeReason::StepOut, |state| state.target.shallower());
        Ok(())
    }

    fn is_stepping(&self) -> Result<bool, Error> {
        Ok(self.state.lock().unwrap().target.is_stepping())
    }
}

/// Builder of a [`LocalDebugger`].
pub struct DebuggerBuilder {
    entry_target: StepTarget,
    listener: Arc<dyn DebugListener>,
}

impl DebuggerBuilder {
    pub fn new() -> Self {
        Self {
            entry_target: StepTarget::FREE_RUN,
            listener: Arc::new(NullListener),
        }
    }

    /// Arm a step target that suspends at the very first entered section.
    pub fn stop_on_entry(mut self, stop: bool) -> Self {
        self.entry_target = if stop {
            StepTarget::ENTRY
        } else {
            StepTarget::FREE_RUN
        };
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn DebugListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn build(self) -> LocalDebugger {
        LocalDebugger {
            state: Mutex::new(EngineState {
                status: Status::Starting,
                target: self.entry_target,
                suspend_requested: false,
                terminate_requested: false,
                wake: false,
                resume_reason: ResumeReason::Resumed,
                stack: CallStack::default(),
                enclosing: None,
                terminated_notified: false,
            }),
            woken: Condvar::new(),
            listener: Mutex::new(self.listener),
        }
    }
}

impl Default for DebuggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
