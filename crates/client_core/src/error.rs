use shared::domain::ModuleLocation;
use thiserror::Error;

/// An inbound event that does not fit the current snapshot. These point at a
/// corrupted or misordered event stream; the reducer reports them and keeps
/// the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("received `{kind}` before any device was described")]
    NoDevice { kind: &'static str },
    #[error("add_module for slot {location}, which already holds {existing}")]
    SlotOccupied {
        location: ModuleLocation,
        existing: String,
    },
    #[error("update_module for empty slot {location}")]
    SlotEmpty { location: ModuleLocation },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandUnavailable {
    #[error("{command} is not available without a device")]
    NoDevice { command: &'static str },
    #[error("{command} is only available in state {required}, device is {actual}")]
    WrongState {
        command: &'static str,
        required: &'static str,
        actual: String,
    },
    #[error("login is sent by the connection itself")]
    Login,
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("server url must start with ws:// or wss://: {0}")]
    InvalidUrl(String),
    #[error("failed to encode outbound frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("websocket transport failed: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}
