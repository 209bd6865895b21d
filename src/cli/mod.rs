//! Plain terminal front end over the ledger store.

pub mod commands;
pub mod output;

use std::env;

use thiserror::Error;

pub use commands::Session;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    List,
    Add { text: String },
    Import { source: String },
    Pay { id: String },
    Delete { id: String, assume_yes: bool },
    Stats { json: bool },
    Config(ConfigAction),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Show,
    Set { key: String, value: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unexpected argument `{0}`")]
    Unexpected(String),
}

impl CliCommand {
    pub fn parse<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(CliCommand::Help);
        };
        let rest: Vec<String> = args.collect();

        match command.as_str() {
            "list" | "ls" => {
                no_extra(&rest)?;
                Ok(CliCommand::List)
            }
            "add" => {
                let text = rest.join(" ");
                if text.trim().is_empty() {
                    return Err(UsageError::Missing("debt description text"));
                }
                Ok(CliCommand::Add { text })
            }
            "import" => {
                let source = single(rest, "analysis file (or `-` for stdin)")?;
                Ok(CliCommand::Import { source })
            }
            "pay" => {
                let id = single(rest, "debt id")?;
                Ok(CliCommand::Pay { id })
            }
            "delete" | "rm" => {
                let mut assume_yes = false;
                let mut positional = Vec::new();
                for arg in rest {
                    match arg.as_str() {
                        "--yes" | "-y" => assume_yes = true,
                        _ => positional.push(arg),
                    }
                }
                let id = single(positional, "debt id")?;
                Ok(CliCommand::Delete { id, assume_yes })
            }
            "stats" => {
                let mut json = false;
                for arg in rest {
                    match arg.as_str() {
                        "--json" => json = true,
                        _ => return Err(UsageError::Unexpected(arg)),
                    }
                }
                Ok(CliCommand::Stats { json })
            }
            "config" => {
                let mut rest = rest.into_iter();
                match rest.next().as_deref() {
                    None | Some("show") => {
                        no_extra(&rest.collect::<Vec<_>>())?;
                        Ok(CliCommand::Config(ConfigAction::Show))
                    }
                    Some("set") => {
                        let key = rest.next().ok_or(UsageError::Missing("config key"))?;
                        let value = rest.collect::<Vec<_>>().join(" ");
                        Ok(CliCommand::Config(ConfigAction::Set { key, value }))
                    }
                    Some(other) => Err(UsageError::Unexpected(other.to_string())),
                }
            }
            "help" | "--help" | "-h" => Ok(CliCommand::Help),
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }
}

fn no_extra(rest: &[String]) -> Result<(), UsageError> {
    match rest.first() {
        Some(arg) => Err(UsageError::Unexpected(arg.clone())),
        None => Ok(()),
    }
}

fn single(rest: Vec<String>, what: &'static str) -> Result<String, UsageError> {
    let mut rest = rest.into_iter();
    let value = rest.next().ok_or(UsageError::Missing(what))?;
    if let Some(extra) = rest.next() {
        return Err(UsageError::Unexpected(extra));
    }
    Ok(value)
}

/// Entry point used by the `debt_ledger_cli` binary.
pub fn run_cli() -> CliResult<()> {
    run_with_args(env::args().skip(1))
}

pub fn run_with_args<I>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = String>,
{
    let command = match CliCommand::parse(args) {
        Ok(command) => command,
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };
    if command == CliCommand::Help {
        print_usage();
        return Ok(());
    }
    let mut session = Session::open()?;
    commands::execute(&mut session, command)
}

fn print_usage() {
    eprintln!(
        "Usage: debt_ledger_cli <command>\n\
         Commands:\n  \
         list                     show every debt, newest first\n  \
         add <text...>            record a debt described in free text\n  \
         import <file.json|->     record a debt from an analysis result\n  \
         pay <id>                 mark a debt as paid\n  \
         delete <id> [--yes]      remove a debt permanently\n  \
         stats [--json]           show totals and the collected/pending split\n  \
         config [show]            show the current settings\n  \
         config set <key> <value> change a setting (`none` clears a command)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, UsageError> {
        CliCommand::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn no_arguments_means_help() {
        assert_eq!(parse(&[]), Ok(CliCommand::Help));
    }

    #[test]
    fn add_joins_free_text() {
        assert_eq!(
            parse(&["add", "Ana", "owes", "me", "20"]),
            Ok(CliCommand::Add {
                text: "Ana owes me 20".into()
            })
        );
        assert_eq!(
            parse(&["add"]),
            Err(UsageError::Missing("debt description text"))
        );
    }

    #[test]
    fn delete_accepts_yes_flag_anywhere() {
        assert_eq!(
            parse(&["delete", "--yes", "abcd"]),
            Ok(CliCommand::Delete {
                id: "abcd".into(),
                assume_yes: true
            })
        );
        assert_eq!(
            parse(&["rm", "abcd"]),
            Ok(CliCommand::Delete {
                id: "abcd".into(),
                assume_yes: false
            })
        );
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert_eq!(
            parse(&["pay", "a", "b"]),
            Err(UsageError::Unexpected("b".into()))
        );
        assert_eq!(
            parse(&["stats", "--csv"]),
            Err(UsageError::Unexpected("--csv".into()))
        );
        assert_eq!(
            parse(&["frobnicate"]),
            Err(UsageError::UnknownCommand("frobnicate".into()))
        );
    }

    #[test]
    fn config_shows_by_default_and_joins_set_values() {
        assert_eq!(parse(&["config"]), Ok(CliCommand::Config(ConfigAction::Show)));
        assert_eq!(
            parse(&["config", "set", "advice_command", "tipgen", "--short"]),
            Ok(CliCommand::Config(ConfigAction::Set {
                key: "advice_command".into(),
                value: "tipgen --short".into()
            }))
        );
        assert_eq!(
            parse(&["config", "set"]),
            Err(UsageError::Missing("config key"))
        );
        assert_eq!(
            parse(&["config", "reset"]),
            Err(UsageError::Unexpected("reset".into()))
        );
    }
}
