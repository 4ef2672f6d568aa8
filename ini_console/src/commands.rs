//! # Console Commands
//!
//! The command surface of `inictl`.
//!
//! ## Command Set
//!
//! - `get <section> <key>` - Print one value
//! - `set <section> <key> <value> [--reserve N]` - Write or create a value
//! - `sections` - List section names in file order
//! - `keys <section>` - List `key=value` pairs of a section
//! - `dump` - Print the file as JSON
//! - `cat` - Print the file verbatim
//! - `check` - Verify every line fits the window
//!
//! A section argument of `-` names the default (unnamed) section.

use thiserror::Error;

/// Section argument naming the default section
pub const DEFAULT_SECTION: &str = "-";

/// Command parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Missing command")]
    MissingCommand,

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Invalid reserve value: {0}")]
    InvalidReserve(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get {
        section: Option<String>,
        key: String,
    },
    Set {
        section: Option<String>,
        key: String,
        value: String,
        reserve: usize,
    },
    Sections,
    Keys {
        section: Option<String>,
    },
    Dump,
    Cat,
    Check,
}

impl Command {
    /// Parses a command name and its arguments
    pub fn parse(args: &[String]) -> Result<Command, CommandError> {
        let (name, rest) = args.split_first().ok_or(CommandError::MissingCommand)?;
        let mut rest = Args::new(rest);

        let command = match name.as_str() {
            "get" => Command::Get {
                section: section_arg(rest.required("section")?),
                key: rest.required("key")?.to_string(),
            },
            "set" => {
                let section = section_arg(rest.required("section")?);
                let key = rest.required("key")?.to_string();
                let value = rest.required("value")?.to_string();
                let mut reserve = 0;
                if let Some(flag) = rest.next() {
                    if flag != "--reserve" {
                        return Err(CommandError::UnexpectedArgument(flag.to_string()));
                    }
                    let raw = rest.required("reserve")?;
                    reserve = raw
                        .parse()
                        .map_err(|_| CommandError::InvalidReserve(raw.to_string()))?;
                }
                Command::Set {
                    section,
                    key,
                    value,
                    reserve,
                }
            }
            "sections" => Command::Sections,
            "keys" => Command::Keys {
                section: section_arg(rest.required("section")?),
            },
            "dump" => Command::Dump,
            "cat" => Command::Cat,
            "check" => Command::Check,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        rest.finish()?;
        Ok(command)
    }

    /// Returns true if the command may modify the file
    pub fn is_write(&self) -> bool {
        matches!(self, Command::Set { .. })
    }
}

fn section_arg(arg: &str) -> Option<String> {
    if arg == DEFAULT_SECTION {
        None
    } else {
        Some(arg.to_string())
    }
}

struct Args<'a> {
    args: std::slice::Iter<'a, String>,
}

impl<'a> Args<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args: args.iter() }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.args.next().map(String::as_str)
    }

    fn required(&mut self, name: &str) -> Result<&'a str, CommandError> {
        self.next()
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        Command::parse(&args)
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(
            parse("get net port"),
            Ok(Command::Get {
                section: Some("net".to_string()),
                key: "port".to_string()
            })
        );
        assert_eq!(
            parse("get - name"),
            Ok(Command::Get {
                section: None,
                key: "name".to_string()
            })
        );
    }

    #[test]
    fn test_parse_set_with_reserve() {
        assert_eq!(
            parse("set wifi ssid home --reserve 32"),
            Ok(Command::Set {
                section: Some("wifi".to_string()),
                key: "ssid".to_string(),
                value: "home".to_string(),
                reserve: 32
            })
        );
        assert_eq!(
            parse("set wifi ssid home --reserve x"),
            Err(CommandError::InvalidReserve("x".to_string()))
        );
        assert_eq!(
            parse("set wifi ssid home --force"),
            Err(CommandError::UnexpectedArgument("--force".to_string()))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("sections"), Ok(Command::Sections));
        assert_eq!(parse("dump"), Ok(Command::Dump));
        assert_eq!(parse("cat"), Ok(Command::Cat));
        assert_eq!(parse("check"), Ok(Command::Check));
        assert_eq!(parse("keys -"), Ok(Command::Keys { section: None }));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(CommandError::MissingCommand));
        assert_eq!(
            parse("get net"),
            Err(CommandError::MissingArgument("key".to_string()))
        );
        assert_eq!(
            parse("dump extra"),
            Err(CommandError::UnexpectedArgument("extra".to_string()))
        );
        assert_eq!(
            parse("frobnicate"),
            Err(CommandError::UnknownCommand("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_is_write() {
        assert!(parse("set a b c").unwrap().is_write());
        assert!(!parse("get a b").unwrap().is_write());
    }
}
