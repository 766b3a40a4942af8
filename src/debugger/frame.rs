//! Live call stack bookkeeping, mutated only from the execution thread.

use crate::debugger::host::Scope;
use crate::debugger::snapshot::{SourceSpan, StackFrame, Variable};
use std::sync::Arc;

/// One activation record still attached to the running program.
///
/// Keeps the scope handle so bindings resolve on demand, a [`StackFrame`]
/// snapshot detaches from it.
pub(crate) struct LiveFrame {
    method: String,
    span: SourceSpan,
    index: u32,
    scope: Arc<dyn Scope>,
}

impl LiveFrame {
    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn snapshot(&self) -> StackFrame {
        StackFrame {
            method: self.method.clone(),
            span: self.span.clone(),
            index: self.index,
            has_variables: !self.scope.binding_names().is_empty(),
        }
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.scope
            .binding_names()
            .iter()
            .filter_map(|name| self.scope.binding(name))
            .collect()
    }
}

/// Frame stack of the executing program.
///
/// Entering a method pushes, leaving one pops. Entering a statement only
/// relocates the top frame, so statement flow never changes the depth.
#[derive(Default)]
pub(crate) struct CallStack {
    frames: Vec<LiveFrame>,
}

impl CallStack {
    pub fn size(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn push(&mut self, method: String, span: SourceSpan, scope: Arc<dyn Scope>) {
        let index = self.size();
        self.frames.push(LiveFrame {
            method,
            span,
            index,
            scope,
        });
    }

    pub fn pop(&mut self) -> Option<LiveFrame> {
        self.frames.pop()
    }

    /// Move the top frame to a new location within its method.
    ///
    /// A statement reached outside of any method (top level script code)
    /// finds the stack empty and materializes an anonymous frame.
    pub fn relocate_top(&mut self, span: SourceSpan, scope: Arc<dyn Scope>) {
        match self.frames.pop() {
            Some(top) => self.frames.push(LiveFrame {
                method: top.method,
                index: top.index,
                span,
                scope,
            }),
            None => self.push(String::new(), span, scope),
        }
    }

    pub fn top(&self) -> Option<&LiveFrame> {
        self.frames.last()
    }

    pub fn frame(&self, index: u32) -> Option<&LiveFrame> {
        self.frames.get(index as usize)
    }

    /// Detached copy of the whole stack, outermost frame first.
    pub fn snapshot(&self) -> Vec<StackFrame> {
        self.frames.iter().map(LiveFrame::snapshot).collect()
    }
}
