use std::str::FromStr;

use engarde::{Mode, PlayerId, UnknownMode};

/// One line of console input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `card <player> <slot>`, with both numbers starting at 1.
    Card { player: PlayerId, card_index: usize },
    /// `do <n>`: the n-th action of the last printed list, starting at 1.
    Do { action_number: usize },
    Pass,
    Finish,
    Cancel,
    Retreat,
    Parry,
    New,
    Next,
    Mode(Mode),
    Show,
    Log,
    Help,
    Quit,
}

#[derive(Debug)]
pub enum CommandError {
    Empty,
    UnknownCommand { name: String },
    MissingArgument { command: &'static str, argument: &'static str },
    TooManyArguments { command: &'static str },
    InvalidPlayer { value: String },
    InvalidNumber { value: String },
    InvalidMode(UnknownMode),
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::InvalidMode(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "Type a command, or 'help' for a list"),
            CommandError::UnknownCommand { name } => {
                write!(f, "Unknown command '{}', type 'help' for a list", name)
            }
            CommandError::MissingArgument { command, argument } => {
                write!(f, "'{}' needs a {}", command, argument)
            }
            CommandError::TooManyArguments { command } => {
                write!(f, "Too many arguments for '{}'", command)
            }
            CommandError::InvalidPlayer { value } => {
                write!(f, "'{}' is not a player, use 1 or 2", value)
            }
            CommandError::InvalidNumber { value } => {
                write!(f, "'{}' is not a number starting at 1", value)
            }
            CommandError::InvalidMode(err) => write!(f, "{}", err),
        }
    }
}

pub const HELP: &str = "\
Commands:
  card <player> <slot>    play a card, e.g. 'card 1 3'
  do <n>                  perform the n-th listed action
  pass | finish | cancel | retreat | parry
  new                     start a new match
  next                    deal the next round
  mode <basic|advanced>   set the mode for the next round
  show                    print the piste and hands
  log                     print the whole match log
  help
  quit";

fn parse_number(value: &str) -> Result<usize, CommandError> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::InvalidNumber {
            value: String::from(value),
        }),
    }
}

fn parse_player(value: &str) -> Result<PlayerId, CommandError> {
    match value {
        "1" => Ok(PlayerId::One),
        "2" => Ok(PlayerId::Two),
        _ => Err(CommandError::InvalidPlayer {
            value: String::from(value),
        }),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let mut argument = |command: &'static str, argument: &'static str| {
            words
                .next()
                .ok_or(CommandError::MissingArgument { command, argument })
        };

        let (command, name): (Command, &'static str) = match name.as_str() {
            "card" | "c" => {
                let player = parse_player(argument("card", "player")?)?;
                let slot = parse_number(argument("card", "card slot")?)?;
                (
                    Command::Card {
                        player,
                        card_index: slot - 1,
                    },
                    "card",
                )
            }
            "do" | "d" => {
                let action_number = parse_number(argument("do", "action number")?)?;
                (Command::Do { action_number }, "do")
            }
            "mode" => {
                let mode = argument("mode", "mode")?
                    .parse::<Mode>()
                    .map_err(CommandError::InvalidMode)?;
                (Command::Mode(mode), "mode")
            }
            "pass" => (Command::Pass, "pass"),
            "finish" => (Command::Finish, "finish"),
            "cancel" => (Command::Cancel, "cancel"),
            "retreat" => (Command::Retreat, "retreat"),
            "parry" => (Command::Parry, "parry"),
            "new" => (Command::New, "new"),
            "next" => (Command::Next, "next"),
            "show" => (Command::Show, "show"),
            "log" => (Command::Log, "log"),
            "quit" | "exit" | "q" => (Command::Quit, "quit"),
            "help" | "?" => (Command::Help, "help"),
            other => {
                return Err(CommandError::UnknownCommand {
                    name: String::from(other),
                })
            }
        };
        if words.next().is_some() {
            return Err(CommandError::TooManyArguments { command: name });
        }
        Ok(command)
    }
}
