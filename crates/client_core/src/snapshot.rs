use serde::Serialize;
use serde_json::Value;
use shared::domain::{
    device_state, ErrorLevel, ModuleLocation, ModuleSerial, ModuleTypeId, Widget, DEFAULT_CASING,
    SLOT_COUNT,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRecord {
    pub module_type: ModuleTypeId,
    pub name: String,
    pub serial: ModuleSerial,
    pub state: String,
    pub error_level: ErrorLevel,
    pub details: Value,
}

/// Client-side reconstruction of the device. Absent (`None` at the call
/// site) until the server describes a device, and again after every reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub state: String,
    pub serial: String,
    pub casing: String,
    pub modules: [Option<ModuleRecord>; SLOT_COUNT],
    /// Edgework exactly as the server described it.
    pub edgework: Vec<Value>,
    /// Highest severity of errors not attributed to a module. Raising it never
    /// touches a module's own level.
    pub error_level: ErrorLevel,
}

impl DeviceSnapshot {
    pub fn new(serial: impl Into<String>, edgework: Vec<Value>) -> Self {
        Self {
            state: device_state::INITIALIZED.to_string(),
            serial: serial.into(),
            casing: DEFAULT_CASING.to_string(),
            modules: Default::default(),
            edgework,
            error_level: ErrorLevel::None,
        }
    }

    pub fn module(&self, location: ModuleLocation) -> Option<&ModuleRecord> {
        self.modules[location.index()].as_ref()
    }

    pub fn occupied(&self) -> impl Iterator<Item = (ModuleLocation, &ModuleRecord)> {
        ModuleLocation::all().filter_map(|location| {
            self.module(location).map(|module| (location, module))
        })
    }

    pub fn worst_error_level(&self) -> ErrorLevel {
        self.occupied()
            .map(|(_, module)| module.error_level)
            .fold(self.error_level, ErrorLevel::max)
    }

    pub fn widgets(&self) -> impl Iterator<Item = Widget> + '_ {
        self.edgework.iter().map(Widget::classify)
    }

    pub fn edgework_summary(&self) -> EdgeworkSummary {
        let mut summary = EdgeworkSummary::default();
        for widget in self.widgets() {
            match widget {
                Widget::Battery { battery_type } => {
                    summary.battery_holders += 1;
                    summary.batteries += battery_type.battery_count();
                }
                Widget::Indicator { name, lit: true } => summary.lit_indicators.push(name),
                Widget::Indicator { name, lit: false } => summary.unlit_indicators.push(name),
                Widget::PortPlate { ports } => {
                    summary.port_plates += 1;
                    summary.ports.extend(ports);
                }
                Widget::Unknown => {}
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeworkSummary {
    pub batteries: usize,
    pub battery_holders: usize,
    pub lit_indicators: Vec<String>,
    pub unlit_indicators: Vec<String>,
    pub port_plates: usize,
    pub ports: Vec<String>,
}
