//! Contracts a host runtime implements to make its programs debuggable.
//!
//! The engine never interprets script source itself. It sees the program
//! through these traits: [`Section`]s carry source locations and breakpoint
//! flags, [`Scope`]s expose the bindings visible at a point of execution.

use crate::debugger::snapshot::{SourceSpan, Variable};
use std::sync::Arc;

/// Fragment of executable source, a statement or a whole declaration.
///
/// Sections are owned by the host runtime and shared with the engine, the
/// engine only reads the location and flips the breakpoint flag.
pub trait Section: Send + Sync {
    fn span(&self) -> SourceSpan;
    fn is_breakpoint(&self) -> bool;
    fn set_breakpoint(&self, armed: bool);
}

/// Named executable unit, typically a method or a function body.
pub trait Declaration: Section {
    fn name(&self) -> String;
}

/// Live lexical scope at some point of the running program.
///
/// Methods are called from the controller service thread while the program
/// is suspended, so implementations must tolerate being read from a thread
/// other than the one executing the program.
pub trait Scope: Send + Sync {
    /// Names of bindings visible in this scope, outermost last.
    fn binding_names(&self) -> Vec<String>;

    /// Look a binding up by name, `None` when the name is not bound.
    fn binding(&self, name: &str) -> Option<Variable>;

    /// Find the section at the given location, searching everything
    /// reachable from this scope. Used to install breakpoints.
    fn locate_section(&self, span: &SourceSpan) -> Option<Arc<dyn Section>>;
}
