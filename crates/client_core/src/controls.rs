use shared::{domain::device_state, protocol::ClientCommand};

use crate::{error::CommandUnavailable, snapshot::DeviceSnapshot};

/// Device state a command requires, or `None` when it is always offered.
fn required_state(command: &ClientCommand) -> Option<&'static str> {
    match command {
        ClientCommand::StartGame => Some(device_state::INITIALIZED),
        ClientCommand::StartTimer => Some(device_state::GAME_STARTING),
        ClientCommand::PauseGame => Some(device_state::GAME_STARTED),
        ClientCommand::UnpauseGame => Some(device_state::GAME_PAUSED),
        ClientCommand::Reset | ClientCommand::Login { .. } => None,
    }
}

pub fn check_command(
    snapshot: Option<&DeviceSnapshot>,
    command: &ClientCommand,
) -> Result<(), CommandUnavailable> {
    if matches!(command, ClientCommand::Login { .. }) {
        return Err(CommandUnavailable::Login);
    }
    let Some(required) = required_state(command) else {
        return Ok(());
    };
    let Some(snapshot) = snapshot else {
        return Err(CommandUnavailable::NoDevice {
            command: command.kind(),
        });
    };
    if snapshot.state == required {
        Ok(())
    } else {
        Err(CommandUnavailable::WrongState {
            command: command.kind(),
            required,
            actual: snapshot.state.clone(),
        })
    }
}

/// Operator commands currently on offer, in control-panel order.
pub fn available_commands(snapshot: Option<&DeviceSnapshot>) -> Vec<ClientCommand> {
    [
        ClientCommand::Reset,
        ClientCommand::StartGame,
        ClientCommand::StartTimer,
        ClientCommand::PauseGame,
        ClientCommand::UnpauseGame,
    ]
    .into_iter()
    .filter(|command| check_command(snapshot, command).is_ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_state(state: &str) -> DeviceSnapshot {
        let mut snapshot = DeviceSnapshot::new("KT4N3", Vec::new());
        snapshot.state = state.to_string();
        snapshot
    }

    #[test]
    fn only_reset_without_device() {
        assert_eq!(available_commands(None), vec![ClientCommand::Reset]);
        assert_eq!(
            check_command(None, &ClientCommand::StartGame),
            Err(CommandUnavailable::NoDevice {
                command: "start_game"
            })
        );
    }

    #[test]
    fn offers_commands_by_state() {
        let initialized = in_state("INITIALIZED");
        assert_eq!(
            available_commands(Some(&initialized)),
            vec![ClientCommand::Reset, ClientCommand::StartGame]
        );

        let starting = in_state("GAME_STARTING");
        assert_eq!(
            available_commands(Some(&starting)),
            vec![ClientCommand::Reset, ClientCommand::StartTimer]
        );

        let paused = in_state("GAME_PAUSED");
        assert_eq!(
            available_commands(Some(&paused)),
            vec![ClientCommand::Reset, ClientCommand::UnpauseGame]
        );
    }

    #[test]
    fn reports_wrong_state() {
        let started = in_state("GAME_STARTED");
        assert_eq!(
            check_command(Some(&started), &ClientCommand::StartTimer),
            Err(CommandUnavailable::WrongState {
                command: "start_timer",
                required: "GAME_STARTING",
                actual: "GAME_STARTED".into(),
            })
        );
        assert_eq!(check_command(Some(&started), &ClientCommand::PauseGame), Ok(()));
    }

    #[test]
    fn login_is_never_an_operator_command() {
        let login = ClientCommand::Login {
            ui_version: "0.1-a1".into(),
            password: None,
        };
        assert_eq!(check_command(None, &login), Err(CommandUnavailable::Login));
    }
}
