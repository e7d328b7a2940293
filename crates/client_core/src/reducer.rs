//! The sole mutator of the device snapshot.
//!
//! [`reduce`] takes the previous snapshot by value and returns the next one
//! together with the log lines the event produced. Events that contradict the
//! current snapshot are reported as [`ProtocolViolation`]s and leave it as it
//! was.

use shared::protocol::{InboundFrame, ServerEvent};
use tracing::{debug, warn};

use crate::{
    diagnostics::{Diagnostic, Severity},
    error::ProtocolViolation,
    registry::ModuleRegistry,
    snapshot::{DeviceSnapshot, ModuleRecord},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub snapshot: Option<DeviceSnapshot>,
    pub diagnostics: Vec<Diagnostic>,
    pub violation: Option<ProtocolViolation>,
}

pub fn reduce(
    previous: Option<DeviceSnapshot>,
    frame: InboundFrame,
    registry: &ModuleRegistry,
) -> Reduction {
    let mut reduction = Reduction {
        snapshot: None,
        diagnostics: Vec::new(),
        violation: None,
    };
    reduction.snapshot = match frame {
        InboundFrame::Event(event) => apply_event(previous, event, registry, &mut reduction),
        InboundFrame::Unrecognized(raw) => {
            reduction
                .diagnostics
                .push(Diagnostic::new(Severity::Info, "MSG", raw.to_string()));
            previous
        }
    };
    reduction
}

fn apply_event(
    previous: Option<DeviceSnapshot>,
    event: ServerEvent,
    registry: &ModuleRegistry,
    reduction: &mut Reduction,
) -> Option<DeviceSnapshot> {
    let kind = event.kind();
    match event {
        ServerEvent::Reset => None,
        ServerEvent::Bomb {
            serial_number,
            widgets,
        } => {
            debug!(serial = %serial_number, widgets = widgets.len(), "device described");
            Some(DeviceSnapshot::new(serial_number, widgets))
        }
        ServerEvent::State { state } => {
            let Some(mut snapshot) = previous else {
                return reject(None, ProtocolViolation::NoDevice { kind }, reduction);
            };
            reduction
                .diagnostics
                .push(Diagnostic::new(Severity::Info, "STATE", state.clone()));
            snapshot.state = state;
            Some(snapshot)
        }
        ServerEvent::AddModule {
            location,
            module_type,
            serial,
            state,
            error_level,
            details,
        } => {
            let Some(mut snapshot) = previous else {
                return reject(None, ProtocolViolation::NoDevice { kind }, reduction);
            };
            let existing = snapshot.module(location).map(|module| module.name.clone());
            if let Some(existing) = existing {
                return reject(
                    Some(snapshot),
                    ProtocolViolation::SlotOccupied { location, existing },
                    reduction,
                );
            }
            let name = registry.display_name(module_type);
            debug!(%location, %module_type, module = %name, "module added");
            snapshot.modules[location.index()] = Some(ModuleRecord {
                module_type,
                name,
                serial,
                state,
                error_level,
                details,
            });
            Some(snapshot)
        }
        ServerEvent::UpdateModule {
            location,
            state,
            details,
        } => {
            let Some(mut snapshot) = previous else {
                return reject(None, ProtocolViolation::NoDevice { kind }, reduction);
            };
            if snapshot.module(location).is_none() {
                return reject(
                    Some(snapshot),
                    ProtocolViolation::SlotEmpty { location },
                    reduction,
                );
            }
            if let Some(module) = snapshot.modules[location.index()].as_mut() {
                module.state = state;
                module.details = details;
            }
            Some(snapshot)
        }
        ServerEvent::Error {
            module,
            level,
            message,
        } => {
            let mut snapshot = previous;
            let target = module.and_then(|location| {
                let name = snapshot.as_ref()?.module(location)?.name.clone();
                Some((location, name))
            });
            match target {
                Some((location, name)) => {
                    reduction
                        .diagnostics
                        .push(Diagnostic::leveled(level, format!("{name}: {message}")));
                    if let Some(record) = snapshot
                        .as_mut()
                        .and_then(|device| device.modules[location.index()].as_mut())
                    {
                        record.error_level = record.error_level.max(level);
                    }
                }
                None => {
                    reduction.diagnostics.push(Diagnostic::leveled(level, message));
                    if let Some(device) = snapshot.as_mut() {
                        device.error_level = device.error_level.max(level);
                    }
                }
            }
            snapshot
        }
    }
}

fn reject(
    snapshot: Option<DeviceSnapshot>,
    violation: ProtocolViolation,
    reduction: &mut Reduction,
) -> Option<DeviceSnapshot> {
    warn!(%violation, "protocol: rejected out-of-order event");
    reduction.diagnostics.push(Diagnostic::new(
        Severity::Error,
        "PROTOCOL",
        violation.to_string(),
    ));
    reduction.violation = Some(violation);
    snapshot
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
