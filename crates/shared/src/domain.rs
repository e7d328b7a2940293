use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// Number of module slots on every casing.
pub const SLOT_COUNT: usize = 12;

/// Device state tokens the server is known to send. The state itself is passed
/// through as an opaque string; these exist for matching.
pub mod device_state {
    pub const UNINITIALIZED: &str = "UNINITIALIZED";
    pub const RESETTING: &str = "RESETTING";
    pub const INITIALIZING: &str = "INITIALIZING";
    pub const INITIALIZED: &str = "INITIALIZED";
    pub const GAME_STARTING: &str = "GAME_STARTING";
    pub const GAME_STARTED: &str = "GAME_STARTED";
    pub const GAME_PAUSED: &str = "GAME_PAUSED";
    pub const DEFUSED: &str = "DEFUSED";
    pub const EXPLODED: &str = "EXPLODED";
    pub const INITIALIZATION_FAILED: &str = "INITIALIZATION_FAILED";
}

/// Casing every freshly described device is drawn with.
pub const DEFAULT_CASING: &str = "VanillaCasing";

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(ModuleTypeId, i64);

/// Severity attached to module and device errors, in ascending order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorLevel {
    #[default]
    None,
    Info,
    Recovered,
    Warning,
    Recoverable,
    Minor,
    Major,
    InitFailure,
    Fatal,
}

impl ErrorLevel {
    pub const ALL: [ErrorLevel; 9] = [
        ErrorLevel::None,
        ErrorLevel::Info,
        ErrorLevel::Recovered,
        ErrorLevel::Warning,
        ErrorLevel::Recoverable,
        ErrorLevel::Minor,
        ErrorLevel::Major,
        ErrorLevel::InitFailure,
        ErrorLevel::Fatal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorLevel::None => "NONE",
            ErrorLevel::Info => "INFO",
            ErrorLevel::Recovered => "RECOVERED",
            ErrorLevel::Warning => "WARNING",
            ErrorLevel::Recoverable => "RECOVERABLE",
            ErrorLevel::Minor => "MINOR",
            ErrorLevel::Major => "MAJOR",
            ErrorLevel::InitFailure => "INIT_FAILURE",
            ErrorLevel::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| DomainError::UnknownErrorLevel(s.to_string()))
    }
}

/// Index of a module slot, always below [`SLOT_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ModuleLocation(u8);

impl ModuleLocation {
    pub fn new(index: usize) -> Result<Self, DomainError> {
        if index < SLOT_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(DomainError::LocationOutOfRange(index))
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn all() -> impl Iterator<Item = ModuleLocation> {
        (0..SLOT_COUNT as u8).map(ModuleLocation)
    }
}

impl TryFrom<u8> for ModuleLocation {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value))
    }
}

impl From<ModuleLocation> for u8 {
    fn from(value: ModuleLocation) -> Self {
        value.0
    }
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-module serial. The controller sends bus serials as integers while
/// other producers use strings, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleSerial(pub String);

impl<'de> Deserialize<'de> for ModuleSerial {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => ModuleSerial(text),
            Raw::Integer(value) => ModuleSerial(value.to_string()),
        })
    }
}

impl From<&str> for ModuleSerial {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ModuleSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BatteryType {
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "D")]
    D,
}

impl BatteryType {
    /// Batteries held by one holder of this type.
    pub fn battery_count(self) -> usize {
        match self {
            BatteryType::Aa => 2,
            BatteryType::D => 1,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("aa") {
            Some(BatteryType::Aa)
        } else if raw.eq_ignore_ascii_case("d") {
            Some(BatteryType::D)
        } else {
            None
        }
    }
}

/// Typed view of one edgework entry. Edgework travels and is stored as raw
/// JSON; this is derived from an entry's fields, not its `type` tag, since
/// the controller tags indicators as `port_plate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Battery { battery_type: BatteryType },
    Indicator { name: String, lit: bool },
    PortPlate { ports: Vec<String> },
    Unknown,
}

impl Widget {
    pub fn classify(raw: &Value) -> Self {
        let name = raw.get("name").and_then(Value::as_str);
        let lit = raw.get("lit").and_then(Value::as_bool);
        if let (Some(name), Some(lit)) = (name, lit) {
            return Widget::Indicator {
                name: name.to_string(),
                lit,
            };
        }

        if let Some(battery_type) = raw
            .get("battery_type")
            .and_then(Value::as_str)
            .and_then(BatteryType::parse)
        {
            return Widget::Battery { battery_type };
        }

        let tagged_plate = raw.get("type").and_then(Value::as_str) == Some("port_plate");
        match raw.get("ports") {
            Some(Value::Array(ports)) => Widget::PortPlate {
                ports: ports
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            },
            None if tagged_plate && name.is_none() => Widget::PortPlate { ports: Vec::new() },
            _ => Widget::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_widgets_by_their_fields() {
        assert_eq!(
            Widget::classify(&json!({"type": "battery", "battery_type": "aa"})),
            Widget::Battery {
                battery_type: BatteryType::Aa
            }
        );
        assert_eq!(
            Widget::classify(&json!({"type": "port_plate", "name": "FRK", "lit": true})),
            Widget::Indicator {
                name: "FRK".into(),
                lit: true
            }
        );
        assert_eq!(
            Widget::classify(&json!({"type": "port_plate", "ports": ["PARALLEL", "SERIAL"]})),
            Widget::PortPlate {
                ports: vec!["PARALLEL".into(), "SERIAL".into()]
            }
        );
        assert_eq!(
            Widget::classify(&json!({"type": "port_plate"})),
            Widget::PortPlate { ports: Vec::new() }
        );
    }

    #[test]
    fn malformed_widgets_are_unknown() {
        for raw in [
            json!({"type": "battery", "battery_type": "C"}),
            json!({"type": "indicator", "name": "CAR"}),
            json!({"type": "port_plate", "name": "CAR"}),
            json!({"type": "sticker", "color": "red"}),
            json!("battery"),
        ] {
            assert_eq!(Widget::classify(&raw), Widget::Unknown, "{raw}");
        }
    }
}
