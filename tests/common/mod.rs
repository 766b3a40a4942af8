#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Once};
use std::thread;
use std::time::Duration;

use stepwire::debugger::host::{Declaration, Scope, Section};
use stepwire::debugger::snapshot::{SourceSpan, Value, Variable};
use stepwire::{DebugListener, Error, LocalDebugger, ResumeReason, SuspendReason};

pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(5);

static LOGS: Once = Once::new();

pub fn init_logs() {
    LOGS.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Script statement with a breakpoint flag, the smallest debuggable unit.
pub struct FakeSection {
    span: SourceSpan,
    breakpoint: AtomicBool,
}

impl FakeSection {
    pub fn new(path: &str, line: u32, start: u32, end: u32) -> Arc<Self> {
        Arc::new(Self {
            span: SourceSpan::new(path, line, start, end),
            breakpoint: AtomicBool::new(false),
        })
    }
}

impl Section for FakeSection {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }

    fn is_breakpoint(&self) -> bool {
        self.breakpoint.load(Ordering::SeqCst)
    }

    fn set_breakpoint(&self, armed: bool) {
        self.breakpoint.store(armed, Ordering::SeqCst);
    }
}

/// Named method declaration of the fake script.
pub struct FakeDeclaration {
    name: String,
    span: SourceSpan,
    breakpoint: AtomicBool,
}

impl FakeDeclaration {
    pub fn new(name: &str, path: &str, line: u32, start: u32, end: u32) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            span: SourceSpan::new(path, line, start, end),
            breakpoint: AtomicBool::new(false),
        })
    }
}

impl Section for FakeDeclaration {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }

    fn is_breakpoint(&self) -> bool {
        self.breakpoint.load(Ordering::SeqCst)
    }

    fn set_breakpoint(&self, armed: bool) {
        self.breakpoint.store(armed, Ordering::SeqCst);
    }
}

impl Declaration for FakeDeclaration {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Lexical scope of the fake script: fixed bindings plus a section
/// registry for breakpoint resolution.
pub struct FakeScope {
    variables: Vec<Variable>,
    sections: Vec<Arc<dyn Section>>,
}

impl FakeScope {
    pub fn new(variables: Vec<Variable>, sections: Vec<Arc<dyn Section>>) -> Arc<Self> {
        Arc::new(Self {
            variables,
            sections,
        })
    }
}

impl Scope for FakeScope {
    fn binding_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn binding(&self, name: &str) -> Option<Variable> {
        self.variables.iter().find(|v| v.name == name).cloned()
    }

    fn locate_section(&self, span: &SourceSpan) -> Option<Arc<dyn Section>> {
        self.sections.iter().find(|s| s.span() == *span).cloned()
    }
}

pub fn variable(name: &str, r#type: &str, display: &str) -> Variable {
    Variable {
        name: name.to_string(),
        r#type: r#type.to_string(),
        value: Value {
            r#type: r#type.to_string(),
            display: display.to_string(),
        },
    }
}

/// What the controller side observed, in arrival order.
#[derive(Debug, PartialEq)]
pub enum Notice {
    Connected(String, u16),
    Suspended(SuspendReason),
    Resumed(ResumeReason),
    Terminated,
}

/// Listener that forwards every callback into an mpsc channel, the test
/// thread asserts on the received sequence.
pub struct TestListener {
    sender: mpsc::Sender<Notice>,
}

impl TestListener {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<Notice>) {
        init_logs();
        let (sender, receiver) = mpsc::channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl DebugListener for TestListener {
    fn on_connected(&self, host: &str, port: u16) {
        let _ = self.sender.send(Notice::Connected(host.to_string(), port));
    }

    fn on_suspended(&self, reason: SuspendReason) {
        let _ = self.sender.send(Notice::Suspended(reason));
    }

    fn on_resumed(&self, reason: ResumeReason) {
        let _ = self.sender.send(Notice::Resumed(reason));
    }

    fn on_terminated(&self) {
        let _ = self.sender.send(Notice::Terminated);
    }
}

pub fn expect_notice(events: &mpsc::Receiver<Notice>) -> Notice {
    events
        .recv_timeout(NOTICE_TIMEOUT)
        .expect("no notice within timeout")
}

pub fn expect_suspended(events: &mpsc::Receiver<Notice>) -> SuspendReason {
    match expect_notice(events) {
        Notice::Suspended(reason) => reason,
        other => panic!("expected a suspension, got {other:?}"),
    }
}

pub fn expect_resumed(events: &mpsc::Receiver<Notice>) -> ResumeReason {
    match expect_notice(events) {
        Notice::Resumed(reason) => reason,
        other => panic!("expected a resume, got {other:?}"),
    }
}

pub fn expect_terminated(events: &mpsc::Receiver<Notice>) {
    match expect_notice(events) {
        Notice::Terminated => {}
        other => panic!("expected termination, got {other:?}"),
    }
}

pub fn expect_connected(events: &mpsc::Receiver<Notice>) -> (String, u16) {
    match expect_notice(events) {
        Notice::Connected(host, port) => (host, port),
        other => panic!("expected the connected event, got {other:?}"),
    }
}

/// The canonical fake program:
///
/// ```text
/// 1  method main():            app.ws
/// 2      first statement
/// 3      helper()
/// 4      last statement
///
/// 10 method helper():
/// 11     helper statement
/// ```
///
/// `main` binds `x` and `message`, `helper` binds `count`.
pub struct Demo {
    pub main_decl: Arc<FakeDeclaration>,
    pub first_stmt: Arc<FakeSection>,
    pub call_stmt: Arc<FakeSection>,
    pub last_stmt: Arc<FakeSection>,
    pub helper_decl: Arc<FakeDeclaration>,
    pub helper_stmt: Arc<FakeSection>,
    pub main_scope: Arc<dyn Scope>,
    pub helper_scope: Arc<dyn Scope>,
}

impl Demo {
    pub fn new() -> Arc<Self> {
        init_logs();
        let main_decl = FakeDeclaration::new("main", "app.ws", 1, 0, 120);
        let first_stmt = FakeSection::new("app.ws", 2, 20, 45);
        let call_stmt = FakeSection::new("app.ws", 3, 46, 60);
        let last_stmt = FakeSection::new("app.ws", 4, 61, 85);
        let helper_decl = FakeDeclaration::new("helper", "app.ws", 10, 121, 200);
        let helper_stmt = FakeSection::new("app.ws", 11, 140, 170);

        let sections: Vec<Arc<dyn Section>> = vec![
            main_decl.clone(),
            first_stmt.clone(),
            call_stmt.clone(),
            last_stmt.clone(),
            helper_decl.clone(),
            helper_stmt.clone(),
        ];
        let main_scope = FakeScope::new(
            vec![
                variable("x", "Integer", "42"),
                variable("message", "Text", "\"hello\""),
            ],
            sections.clone(),
        );
        let helper_scope = FakeScope::new(vec![variable("count", "Integer", "7")], sections);

        Arc::new(Self {
            main_decl,
            first_stmt,
            call_stmt,
            last_stmt,
            helper_decl,
            helper_stmt,
            main_scope,
            helper_scope,
        })
    }

    /// Drive the whole program through the hooks, the way an interpreter
    /// would.
    pub fn run(&self, debugger: &LocalDebugger) -> Result<(), Error> {
        debugger.enter_method(&self.main_scope, self.main_decl.as_ref())?;
        self.statement(debugger, &self.main_scope, &self.first_stmt)?;

        debugger.enter_statement(&self.main_scope, self.call_stmt.as_ref())?;
        debugger.enter_method(&self.helper_scope, self.helper_decl.as_ref())?;
        self.statement(debugger, &self.helper_scope, &self.helper_stmt)?;
        debugger.leave_method(&self.helper_scope, self.helper_decl.as_ref())?;
        debugger.leave_statement(&self.main_scope, self.call_stmt.as_ref())?;

        self.statement(debugger, &self.main_scope, &self.last_stmt)?;
        debugger.leave_method(&self.main_scope, self.main_decl.as_ref())?;
        Ok(())
    }

    fn statement(
        &self,
        debugger: &LocalDebugger,
        scope: &Arc<dyn Scope>,
        stmt: &Arc<FakeSection>,
    ) -> Result<(), Error> {
        debugger.enter_statement(scope, stmt.as_ref())?;
        debugger.leave_statement(scope, stmt.as_ref())?;
        Ok(())
    }
}

/// Run the demo program on its own execution thread, reporting
/// termination the way a host runtime must.
pub fn spawn_script(
    demo: Arc<Demo>,
    debugger: Arc<LocalDebugger>,
) -> thread::JoinHandle<Result<(), Error>> {
    thread::spawn(move || {
        let result = demo.run(&debugger);
        debugger.notify_terminated();
        result
    })
}
