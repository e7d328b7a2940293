use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{ErrorLevel, ModuleLocation, ModuleSerial, ModuleTypeId},
    error::FrameError,
};

/// Frames sent by the client. `Login` is sent exactly once per connection,
/// before anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    Login {
        ui_version: String,
        password: Option<String>,
    },
    Reset,
    StartGame,
    StartTimer,
    PauseGame,
    UnpauseGame,
}

impl ClientCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientCommand::Login { .. } => "login",
            ClientCommand::Reset => "reset",
            ClientCommand::StartGame => "start_game",
            ClientCommand::StartTimer => "start_timer",
            ClientCommand::PauseGame => "pause_game",
            ClientCommand::UnpauseGame => "unpause_game",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Reset,
    State {
        state: String,
    },
    AddModule {
        location: ModuleLocation,
        module_type: ModuleTypeId,
        serial: ModuleSerial,
        state: String,
        error_level: ErrorLevel,
        #[serde(default)]
        details: Value,
    },
    UpdateModule {
        location: ModuleLocation,
        state: String,
        #[serde(default)]
        details: Value,
    },
    Bomb {
        serial_number: String,
        /// Edgework entries, kept as sent.
        #[serde(default)]
        widgets: Vec<Value>,
    },
    Error {
        #[serde(default)]
        module: Option<ModuleLocation>,
        level: ErrorLevel,
        message: String,
    },
}

impl ServerEvent {
    pub const KINDS: [&'static str; 6] = [
        "reset",
        "state",
        "add_module",
        "update_module",
        "bomb",
        "error",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::Reset => "reset",
            ServerEvent::State { .. } => "state",
            ServerEvent::AddModule { .. } => "add_module",
            ServerEvent::UpdateModule { .. } => "update_module",
            ServerEvent::Bomb { .. } => "bomb",
            ServerEvent::Error { .. } => "error",
        }
    }
}

/// One decoded inbound frame. Kinds this client does not model (the server's
/// `config` frame, anything newer) are carried as raw JSON so they can be
/// logged verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Event(ServerEvent),
    Unrecognized(Value),
}

impl InboundFrame {
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text).map_err(FrameError::InvalidJson)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, FrameError> {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Ok(InboundFrame::Unrecognized(value));
        };
        if !ServerEvent::KINDS.contains(&kind) {
            return Ok(InboundFrame::Unrecognized(value));
        }
        let kind = kind.to_string();
        serde_json::from_value::<ServerEvent>(value)
            .map(InboundFrame::Event)
            .map_err(|source| FrameError::InvalidPayload { kind, source })
    }
}

impl From<ServerEvent> for InboundFrame {
    fn from(value: ServerEvent) -> Self {
        InboundFrame::Event(value)
    }
}
