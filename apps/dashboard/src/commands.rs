//! Operator input read from stdin.

use shared::protocol::ClientCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Send(ClientCommand),
    Status,
    Log(usize),
    Help,
    Quit,
}

pub const DEFAULT_LOG_LINES: usize = 20;

pub const HELP: &str = "\
commands:
  reset      reset the device
  start      start the game (device INITIALIZED)
  timer      start the timer (device GAME_STARTING)
  pause      pause the game (device GAME_STARTED)
  unpause    resume the game (device GAME_PAUSED)
  status     print the device snapshot
  log [n]    print the newest n log lines
  help       show this help
  quit       exit";

pub fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let input = match word.to_ascii_lowercase().as_str() {
        "reset" => Input::Send(ClientCommand::Reset),
        "start" | "start_game" => Input::Send(ClientCommand::StartGame),
        "timer" | "start_timer" => Input::Send(ClientCommand::StartTimer),
        "pause" | "pause_game" => Input::Send(ClientCommand::PauseGame),
        "unpause" | "unpause_game" => Input::Send(ClientCommand::UnpauseGame),
        "status" | "s" => Input::Status,
        "log" | "l" => match words.next() {
            Some(count) => Input::Log(
                count
                    .parse()
                    .map_err(|_| format!("log expects a line count, got '{count}'"))?,
            ),
            None => Input::Log(DEFAULT_LOG_LINES),
        },
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operator_commands() {
        assert_eq!(
            parse_input("start"),
            Ok(Some(Input::Send(ClientCommand::StartGame)))
        );
        assert_eq!(
            parse_input("  TIMER "),
            Ok(Some(Input::Send(ClientCommand::StartTimer)))
        );
        assert_eq!(parse_input("log 5"), Ok(Some(Input::Log(5))));
        assert_eq!(parse_input("log"), Ok(Some(Input::Log(DEFAULT_LOG_LINES))));
        assert_eq!(parse_input(""), Ok(None));
        assert_eq!(parse_input("q"), Ok(Some(Input::Quit)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_input("explode").is_err());
        assert!(parse_input("log many").is_err());
    }
}
