pub mod connection;
pub mod controls;
pub mod diagnostics;
pub mod error;
pub mod reducer;
pub mod registry;
pub mod snapshot;
mod state;

pub use connection::{
    CloseReport, CommandSender, ConnectionEvent, ConnectionManager, ConnectionSettings,
};
pub use diagnostics::{Diagnostic, DiagnosticLog, Severity};
pub use reducer::{reduce, Reduction};
pub use registry::{ModuleKind, ModuleRegistry};
pub use snapshot::{DeviceSnapshot, ModuleRecord};
pub use state::DashboardState;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
