//! Inspection snapshots exchanged between the debug engine and a front end.
//!
//! Everything here is detached from the running program: plain data, cheap to
//! clone, safe to ship across the wire.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Region of script source that a frame or a breakpoint points at.
///
/// `line` is 1-based, `start` and `end` are absolute character offsets into
/// the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub path: String,
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    pub fn new(path: impl Into<String>, line: u32, start: u32, end: u32) -> Self {
        Self {
            path: path.into(),
            line,
            start,
            end,
        }
    }
}

impl Display for SourceSpan {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// One activation record of a suspended program.
///
/// Equality is positional: a frame taken before a step compares equal to a
/// fresh one taken after it as long as both sit at the same stack index,
/// even though the current line moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrame {
    pub method: String,
    pub span: SourceSpan,
    pub index: u32,
    pub has_variables: bool,
}

impl PartialEq for StackFrame {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for StackFrame {}

impl Display for StackFrame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "#{} {} at {}", self.index, self.method, self.span)
    }
}

/// Named binding captured from a frame scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Declared type of the binding as the runtime spells it.
    pub r#type: String,
    pub value: Value,
}

/// Runtime value rendered for display, the concrete type may be narrower
/// than the declared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub r#type: String,
    pub display: String,
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.display)
    }
}
