//! Module-type registry.
//!
//! Maps the integer type the controller reports for each module to a
//! [`ModuleKind`], with [`UnknownModule`] standing in for anything not listed.

use std::collections::HashMap;

use serde_json::Value;
use shared::domain::ModuleTypeId;

pub trait ModuleKind: Send + Sync {
    fn display_name(&self) -> String;

    /// Short human-readable reading of the module's `details` payload.
    fn summarize(&self, _details: &Value) -> Option<String> {
        None
    }
}

struct Timer;
struct Wires;
struct Button;
struct Keypad;
struct SimonSays;
struct ComplicatedWires;
struct Password;
struct VentingGas;

fn string_list(details: &Value, key: &str) -> Option<Vec<String>> {
    let items = details.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

impl ModuleKind for Timer {
    fn display_name(&self) -> String {
        "Timer".into()
    }
}

impl ModuleKind for Wires {
    fn display_name(&self) -> String {
        "Wires".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        let wires = details.get("wires")?.as_array()?;
        let connected = details.get("connected").and_then(Value::as_array);
        let mut present = 0;
        let mut attached = 0;
        for (position, wire) in wires.iter().enumerate() {
            // vacant positions are reported as "EMPTY"
            if wire.as_str() == Some("EMPTY") {
                continue;
            }
            present += 1;
            let is_connected = connected
                .and_then(|connected| connected.get(position))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if is_connected {
                attached += 1;
            }
        }
        Some(format!("{present} wires, {attached}/{present} connected"))
    }
}

impl ModuleKind for Button {
    fn display_name(&self) -> String {
        "Button".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        let color = details.get("color")?.as_str()?;
        let text = details.get("text")?.as_str()?;
        let mut summary = format!("{color} {text}");
        if details.get("pressed").and_then(Value::as_bool) == Some(true) {
            summary.push_str(", pressed");
        }
        Some(summary)
    }
}

impl ModuleKind for Keypad {
    fn display_name(&self) -> String {
        "Keypad".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        string_list(details, "buttons").map(|buttons| buttons.join(" "))
    }
}

impl ModuleKind for SimonSays {
    fn display_name(&self) -> String {
        "Simon Says".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        let sequence = string_list(details, "sequence")?;
        let pressed = string_list(details, "pressed").unwrap_or_default();
        Some(format!(
            "{}/{} pressed, sequence {}",
            pressed.len(),
            sequence.len(),
            sequence.join(" ")
        ))
    }
}

impl ModuleKind for ComplicatedWires {
    fn display_name(&self) -> String {
        "Complicated Wires".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        let wires = details.get("wires")?.as_array()?;
        let connected = details
            .get("connected")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        Some(format!("{connected}/{} wires connected", wires.len()))
    }
}

impl ModuleKind for Password {
    fn display_name(&self) -> String {
        "Password".into()
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        let solution = details.get("solution").and_then(Value::as_str);
        let columns = details.get("characters")?.as_array()?.len();
        Some(match solution {
            Some(solution) => format!("{columns} columns, solution {solution}"),
            None => format!("{columns} columns"),
        })
    }
}

impl ModuleKind for VentingGas {
    fn display_name(&self) -> String {
        "Venting Gas".into()
    }
}

/// Fallback for module types without a registered kind.
pub struct UnknownModule(pub ModuleTypeId);

impl ModuleKind for UnknownModule {
    fn display_name(&self) -> String {
        format!("Unknown Module {}", self.0)
    }

    fn summarize(&self, details: &Value) -> Option<String> {
        (!details.is_null()).then(|| details.to_string())
    }
}

pub struct ModuleRegistry {
    kinds: HashMap<ModuleTypeId, Box<dyn ModuleKind>>,
}

impl ModuleRegistry {
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    pub fn register(&mut self, module_type: ModuleTypeId, kind: impl ModuleKind + 'static) {
        self.kinds.insert(module_type, Box::new(kind));
    }

    pub fn is_known(&self, module_type: ModuleTypeId) -> bool {
        self.kinds.contains_key(&module_type)
    }

    pub fn display_name(&self, module_type: ModuleTypeId) -> String {
        match self.kinds.get(&module_type) {
            Some(kind) => kind.display_name(),
            None => UnknownModule(module_type).display_name(),
        }
    }

    pub fn summarize(&self, module_type: ModuleTypeId, details: &Value) -> Option<String> {
        match self.kinds.get(&module_type) {
            Some(kind) => kind.summarize(details),
            None => UnknownModule(module_type).summarize(details),
        }
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ModuleTypeId(1), Timer);
        registry.register(ModuleTypeId(2), Wires);
        registry.register(ModuleTypeId(3), Button);
        registry.register(ModuleTypeId(4), Keypad);
        registry.register(ModuleTypeId(5), SimonSays);
        registry.register(ModuleTypeId(9), ComplicatedWires);
        registry.register(ModuleTypeId(12), Password);
        registry.register(ModuleTypeId(13), VentingGas);
        registry
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_known_names() {
        let registry = ModuleRegistry::default();
        assert_eq!(registry.display_name(ModuleTypeId(1)), "Timer");
        assert_eq!(registry.display_name(ModuleTypeId(9)), "Complicated Wires");
        assert_eq!(registry.display_name(ModuleTypeId(13)), "Venting Gas");
    }

    #[test]
    fn unknown_types_fall_back_to_generated_label() {
        let registry = ModuleRegistry::default();
        assert!(!registry.is_known(ModuleTypeId(99)));
        assert_eq!(registry.display_name(ModuleTypeId(99)), "Unknown Module 99");
        assert_eq!(
            registry.summarize(ModuleTypeId(99), &json!({"a": 1})),
            Some(r#"{"a":1}"#.to_string())
        );
        assert_eq!(registry.summarize(ModuleTypeId(99), &Value::Null), None);
    }

    #[test]
    fn summarizes_known_payloads() {
        let registry = ModuleRegistry::default();
        assert_eq!(
            registry.summarize(
                ModuleTypeId(3),
                &json!({"color": "RED", "text": "HOLD", "pressed": true})
            ),
            Some("RED HOLD, pressed".to_string())
        );
        assert_eq!(
            registry.summarize(
                ModuleTypeId(5),
                &json!({"sequence": ["RED", "BLUE"], "pressed": ["RED"]})
            ),
            Some("1/2 pressed, sequence RED BLUE".to_string())
        );
        assert_eq!(registry.summarize(ModuleTypeId(3), &json!({})), None);
    }

    #[test]
    fn wires_summary_skips_vacant_positions() {
        let registry = ModuleRegistry::default();
        let details = json!({
            "wires": ["RED", "EMPTY", "BLUE", "EMPTY", "YELLOW", "EMPTY"],
            "connected": [true, false, false, false, true, false],
            "solutions": [2]
        });
        assert_eq!(
            registry.summarize(ModuleTypeId(2), &details),
            Some("3 wires, 2/3 connected".to_string())
        );
    }
}
