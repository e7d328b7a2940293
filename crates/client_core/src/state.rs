use shared::protocol::{ClientCommand, InboundFrame};

use crate::{
    connection::ConnectionEvent,
    controls,
    diagnostics::{Diagnostic, DiagnosticLog},
    error::CommandUnavailable,
    reducer::reduce,
    registry::ModuleRegistry,
    snapshot::DeviceSnapshot,
};

/// Everything a front-end shows: the current snapshot and the log. Owns the
/// snapshot exclusively; every change goes through [`reduce`].
pub struct DashboardState {
    registry: ModuleRegistry,
    snapshot: Option<DeviceSnapshot>,
    log: DiagnosticLog,
}

impl DashboardState {
    pub fn new(log_capacity: usize) -> Self {
        Self::with_registry(ModuleRegistry::default(), log_capacity)
    }

    pub fn with_registry(registry: ModuleRegistry, log_capacity: usize) -> Self {
        Self {
            registry,
            snapshot: None,
            log: DiagnosticLog::with_capacity(log_capacity),
        }
    }

    pub fn snapshot(&self) -> Option<&DeviceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Reduces one frame and returns the log lines it produced, which are
    /// also recorded.
    pub fn apply_frame(&mut self, frame: InboundFrame) -> Vec<Diagnostic> {
        let reduction = reduce(self.snapshot.take(), frame, &self.registry);
        self.snapshot = reduction.snapshot;
        for diagnostic in &reduction.diagnostics {
            self.record(diagnostic.clone());
        }
        reduction.diagnostics
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.trace();
        self.log.push(diagnostic);
    }

    /// Folds a connection event into the state. Returns the new log lines.
    pub fn handle(&mut self, event: ConnectionEvent) -> Vec<Diagnostic> {
        match event {
            ConnectionEvent::Frame(frame) => self.apply_frame(frame),
            ConnectionEvent::Diagnostic(diagnostic) => {
                self.record(diagnostic.clone());
                vec![diagnostic]
            }
            ConnectionEvent::Connected | ConnectionEvent::Closed(_) => Vec::new(),
        }
    }

    pub fn available_commands(&self) -> Vec<ClientCommand> {
        controls::available_commands(self.snapshot())
    }

    pub fn check_command(&self, command: &ClientCommand) -> Result<(), CommandUnavailable> {
        controls::check_command(self.snapshot(), command)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(crate::diagnostics::DEFAULT_LOG_CAPACITY)
    }
}
