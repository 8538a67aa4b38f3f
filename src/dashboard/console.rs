//! Line commands for the interactive console.

use crate::dashboard::state::Event;

pub const HELP: &str = "\
Commands:
  round <N>        show challenge round N
  wallet <ADDR>    look up a wallet in the selected round
  clear            clear the wallet lookup
  rounds           list available rounds
  show             render the dashboard again
  help             show this message
  quit             leave the console";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Event),
    Rounds,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let arg = parts.next();

        if parts.next().is_some() {
            return Err(format!("Too many arguments for '{}'", verb));
        }

        let command = match (verb.to_lowercase().as_str(), arg) {
            ("round" | "r", Some(n)) => {
                let round = n
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid round number: {}", n))?;
                Command::Apply(Event::SelectRound(round))
            }
            ("wallet" | "w", Some(addr)) => Command::Apply(Event::SelectWallet(addr.to_string())),
            ("clear", None) => Command::Apply(Event::ClearWallet),
            ("rounds", None) => Command::Rounds,
            ("show", None) => Command::Show,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            ("round" | "r" | "wallet" | "w", None) => {
                return Err(format!("'{}' needs an argument", verb))
            }
            _ => return Err(format!("Unknown command: {} (try 'help')", line.trim())),
        };

        Ok(Some(command))
    }
}
