use serde_json::json;
use shared::{
    domain::{ErrorLevel, ModuleLocation, ModuleTypeId},
    protocol::{ClientCommand, InboundFrame, ServerEvent},
};

use super::*;

fn frame(value: serde_json::Value) -> InboundFrame {
    InboundFrame::from_value(value).expect("valid frame")
}

#[test]
fn dashboard_records_reducer_output_newest_first() {
    let mut state = DashboardState::new(10);
    state.apply_frame(frame(json!({"type": "bomb", "serial_number": "KT4N3"})));
    let lines = state.apply_frame(frame(json!({"type": "state", "state": "GAME_STARTING"})));
    assert_eq!(lines.len(), 1);

    state.handle(ConnectionEvent::Diagnostic(Diagnostic::info("hello")));
    let logged: Vec<String> = state.log().iter().map(ToString::to_string).collect();
    assert_eq!(logged, vec!["[INFO] hello", "[STATE] GAME_STARTING"]);
    assert_eq!(
        state.snapshot().map(|s| s.state.as_str()),
        Some("GAME_STARTING")
    );
}

#[test]
fn dashboard_gates_commands_on_snapshot() {
    let mut state = DashboardState::default();
    assert_eq!(state.available_commands(), vec![ClientCommand::Reset]);

    state.handle(ConnectionEvent::Frame(frame(
        json!({"type": "bomb", "serial_number": "KT4N3", "widgets": []}),
    )));
    assert!(state.check_command(&ClientCommand::StartGame).is_ok());
    assert!(state.check_command(&ClientCommand::StartTimer).is_err());

    state.handle(ConnectionEvent::Frame(ServerEvent::Reset.into()));
    assert!(state.snapshot().is_none());
    assert_eq!(state.available_commands(), vec![ClientCommand::Reset]);
}

#[test]
fn dashboard_keeps_snapshot_on_violation() {
    let mut state = DashboardState::default();
    state.apply_frame(frame(json!({"type": "bomb", "serial_number": "KT4N3"})));
    let lines = state.apply_frame(frame(json!({
        "type": "update_module",
        "location": 0,
        "state": "GAME",
        "details": {}
    })));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].severity, Severity::Error);
    assert_eq!(state.snapshot().map(|s| s.serial.as_str()), Some("KT4N3"));
}

#[test]
fn custom_registry_overrides_names() {
    struct Clock;
    impl ModuleKind for Clock {
        fn display_name(&self) -> String {
            "Clock".into()
        }
    }

    let mut registry = ModuleRegistry::empty();
    registry.register(ModuleTypeId(1), Clock);
    let mut state = DashboardState::with_registry(registry, 5);
    state.apply_frame(frame(json!({"type": "bomb", "serial_number": "KT4N3"})));
    state.apply_frame(frame(json!({
        "type": "add_module",
        "location": 0,
        "module_type": 1,
        "serial": "C-1",
        "state": "GAME",
        "error_level": "NONE",
        "details": {}
    })));
    state.apply_frame(frame(json!({
        "type": "add_module",
        "location": 1,
        "module_type": 2,
        "serial": "W-1",
        "state": "GAME",
        "error_level": "RECOVERED",
        "details": {}
    })));

    let snapshot = state.snapshot().expect("device");
    let names: Vec<&str> = snapshot.occupied().map(|(_, m)| m.name.as_str()).collect();
    assert_eq!(names, vec!["Clock", "Unknown Module 2"]);
    assert_eq!(
        snapshot
            .module(ModuleLocation::new(1).expect("slot"))
            .map(|m| m.error_level),
        Some(ErrorLevel::Recovered)
    );
}
