use crate::debugger::snapshot::SourceSpan;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // --------------------------------- generic errors --------------------------------------------
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    // --------------------------------- engine errors ---------------------------------------------
    #[error("execution terminated by debugger")]
    Terminated,
    #[error("no scope observed yet, breakpoints need a started program")]
    NoEnclosingScope,
    #[error("no section found at {0}")]
    SectionNotFound(SourceSpan),

    // --------------------------------- wire errors -----------------------------------------------
    #[error("connection closed by peer")]
    ConnectionClosed,
    #[error("malformed frame: {0}")]
    Frame(&'static str),
    #[error("unexpected response for {0}")]
    UnexpectedResponse(&'static str),
    #[error("{0} channel failed to start")]
    ChannelStartup(&'static str),

    // --------------------------------- remote debuggee errors ------------------------------------
    #[error("debuggee rejected request: {0}")]
    Remote(String),
    #[error("debuggee unreachable: {0}")]
    Unreachable(String),
}

#[macro_export]
macro_rules! _error {
    ($log_fn: path, $res: expr) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "debugger", "{}", e);
                None
            }
        }
    };
    ($log_fn: path, $res: expr, $msg: tt) => {
        match $res {
            Ok(value) => Some(value),
            Err(e) => {
                $log_fn!(target: "debugger", concat!($msg, " {}"), e);
                None
            }
        }
    };
}

/// Transforms `Result` into `Option` and logs an error if it occurs.
#[macro_export]
macro_rules! weak_error {
    ($res: expr) => {
        $crate::_error!(log::warn, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::warn, $res, $msg)
    };
}

/// Transforms `Result` into `Option` and put error into debug logs if it occurs.
#[macro_export]
macro_rules! muted_error {
    ($res: expr) => {
        $crate::_error!(log::debug, $res)
    };
    ($res: expr, $msg: tt) => {
        $crate::_error!(log::debug, $res, $msg)
    };
}
