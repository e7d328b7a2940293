use client_core::{DeviceSnapshot, ModuleRegistry};
use shared::domain::ModuleLocation;

/// Plain-text dump of the snapshot, one line per slot.
pub fn status_lines(snapshot: Option<&DeviceSnapshot>, registry: &ModuleRegistry) -> Vec<String> {
    let Some(snapshot) = snapshot else {
        return vec!["no device".to_string()];
    };

    let edgework = snapshot.edgework_summary();
    let mut lines = vec![
        format!(
            "device {} [{}] casing {} worst error {}",
            snapshot.serial,
            snapshot.state,
            snapshot.casing,
            snapshot.worst_error_level()
        ),
        format!(
            "edgework: {} batteries in {} holders, lit [{}], unlit [{}], {} port plates [{}]",
            edgework.batteries,
            edgework.battery_holders,
            edgework.lit_indicators.join(" "),
            edgework.unlit_indicators.join(" "),
            edgework.port_plates,
            edgework.ports.join(" ")
        ),
    ];

    for location in ModuleLocation::all() {
        let line = match snapshot.module(location) {
            None => format!("{location:>2}: -"),
            Some(module) => {
                let mut line = format!(
                    "{location:>2}: {} #{} {} ({})",
                    module.name, module.serial, module.state, module.error_level
                );
                if let Some(summary) = registry.summarize(module.module_type, &module.details) {
                    line.push_str(" - ");
                    line.push_str(&summary);
                }
                line
            }
        };
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::domain::{ErrorLevel, ModuleSerial, ModuleTypeId};

    use super::*;
    use client_core::ModuleRecord;

    #[test]
    fn prints_placeholder_without_device() {
        assert_eq!(
            status_lines(None, &ModuleRegistry::default()),
            vec!["no device".to_string()]
        );
    }

    #[test]
    fn prints_one_line_per_slot() {
        let registry = ModuleRegistry::default();
        let mut snapshot = DeviceSnapshot::new("KT4N3", Vec::new());
        snapshot.modules[3] = Some(ModuleRecord {
            module_type: ModuleTypeId(3),
            name: registry.display_name(ModuleTypeId(3)),
            serial: ModuleSerial::from("B-1"),
            state: "GAME".into(),
            error_level: ErrorLevel::Minor,
            details: json!({"color": "BLUE", "text": "ABORT"}),
        });

        let lines = status_lines(Some(&snapshot), &registry);
        assert_eq!(lines.len(), 14);
        assert_eq!(
            lines[0],
            "device KT4N3 [INITIALIZED] casing VanillaCasing worst error MINOR"
        );
        assert_eq!(lines[5], " 3: Button #B-1 GAME (MINOR) - BLUE ABORT");
        assert_eq!(lines[2], " 0: -");
    }
}
