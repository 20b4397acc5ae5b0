//! Hand-rolled argument parsing.

use std::path::PathBuf;

use crate::CliError;

pub const USAGE: &str = "\
splitledger <command>

  participant add <name> [--color #rrggbb]
  participant rename <name|id> <new name>
  participant remove <name|id>
  participant list
  expense add <description> <amount> <payer> [--date YYYY-MM-DD] [--split name=pct]...
  expense edit <id> <description> <amount> <payer> [--date YYYY-MM-DD] [--split name=pct]...
  expense delete <id>
  expense list
  currency [code]
  summary
  export [file.html]
  share
  help

Without --split an expense is shared equally by every participant.
";

/// Fields shared by `expense add` and `expense edit`. Values stay as typed so
/// that validation can report them field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseArgs {
    pub description: String,
    pub amount: String,
    pub payer: String,
    pub date: Option<String>,
    /// `(participant, percentage)` pairs; empty means equal split.
    pub splits: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ParticipantAdd { name: String, color: Option<String> },
    ParticipantRename { participant: String, name: String },
    ParticipantRemove { participant: String },
    ParticipantList,
    ExpenseAdd(ExpenseArgs),
    ExpenseEdit { id: String, fields: ExpenseArgs },
    ExpenseDelete { id: String },
    ExpenseList,
    Currency { code: Option<String> },
    Summary,
    /// `None` writes to the dated default file name.
    Export { path: Option<PathBuf> },
    Share,
    Help,
}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

/// Split `args` into positionals and `--flag value` pairs.
fn split_flags(args: &[String]) -> Result<(Vec<String>, Vec<(String, String)>), CliError> {
    let mut positionals = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            let value = iter
                .next()
                .ok_or_else(|| usage(format!("--{flag} needs a value")))?;
            flags.push((flag.to_string(), value.clone()));
        } else {
            positionals.push(arg.clone());
        }
    }

    Ok((positionals, flags))
}

fn exactly<const N: usize>(positionals: Vec<String>, what: &str) -> Result<[String; N], CliError> {
    positionals
        .try_into()
        .map_err(|_| usage(format!("{what} takes {N} argument(s)")))
}

fn reject_flags(flags: &[(String, String)]) -> Result<(), CliError> {
    match flags.first() {
        Some((flag, _)) => Err(usage(format!("unexpected flag --{flag}"))),
        None => Ok(()),
    }
}

fn expense_args(positionals: Vec<String>, flags: Vec<(String, String)>) -> Result<ExpenseArgs, CliError> {
    let [description, amount, payer] = exactly::<3>(positionals, "expense")?;
    let mut date = None;
    let mut splits = Vec::new();

    for (flag, value) in flags {
        match flag.as_str() {
            "date" => date = Some(value),
            "split" => {
                let (who, pct) = value
                    .split_once('=')
                    .ok_or_else(|| usage(format!("--split expects name=pct, got {value}")))?;
                splits.push((who.to_string(), pct.to_string()));
            }
            other => return Err(usage(format!("unexpected flag --{other}"))),
        }
    }

    Ok(ExpenseArgs {
        description,
        amount,
        payer,
        date,
        splits,
    })
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let Some((head, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match head.as_str() {
        "help" | "--help" | "-h" => Ok(Command::Help),
        "summary" => Ok(Command::Summary),
        "share" => Ok(Command::Share),
        "currency" => match rest {
            [] => Ok(Command::Currency { code: None }),
            [code] => Ok(Command::Currency {
                code: Some(code.clone()),
            }),
            _ => Err(usage("currency takes at most one code")),
        },
        "export" => match rest {
            [] => Ok(Command::Export { path: None }),
            [path] => Ok(Command::Export {
                path: Some(PathBuf::from(path)),
            }),
            _ => Err(usage("export takes at most one file path")),
        },
        "participant" => parse_participant(rest),
        "expense" => parse_expense(rest),
        other => Err(usage(format!("unknown command {other:?}"))),
    }
}

fn parse_participant(args: &[String]) -> Result<Command, CliError> {
    let Some((sub, rest)) = args.split_first() else {
        return Err(usage("participant needs a subcommand"));
    };
    let (positionals, flags) = split_flags(rest)?;

    match sub.as_str() {
        "add" => {
            let [name] = exactly::<1>(positionals, "participant add")?;
            let mut color = None;
            for (flag, value) in flags {
                match flag.as_str() {
                    "color" => color = Some(value),
                    other => return Err(usage(format!("unexpected flag --{other}"))),
                }
            }
            Ok(Command::ParticipantAdd { name, color })
        }
        "rename" => {
            reject_flags(&flags)?;
            let [participant, name] = exactly::<2>(positionals, "participant rename")?;
            Ok(Command::ParticipantRename { participant, name })
        }
        "remove" => {
            reject_flags(&flags)?;
            let [participant] = exactly::<1>(positionals, "participant remove")?;
            Ok(Command::ParticipantRemove { participant })
        }
        "list" => {
            reject_flags(&flags)?;
            exactly::<0>(positionals, "participant list")?;
            Ok(Command::ParticipantList)
        }
        other => Err(usage(format!("unknown participant subcommand {other:?}"))),
    }
}

fn parse_expense(args: &[String]) -> Result<Command, CliError> {
    let Some((sub, rest)) = args.split_first() else {
        return Err(usage("expense needs a subcommand"));
    };
    let (mut positionals, flags) = split_flags(rest)?;

    match sub.as_str() {
        "add" => Ok(Command::ExpenseAdd(expense_args(positionals, flags)?)),
        "edit" => {
            if positionals.is_empty() {
                return Err(usage("expense edit needs an expense id"));
            }
            let id = positionals.remove(0);
            Ok(Command::ExpenseEdit {
                id,
                fields: expense_args(positionals, flags)?,
            })
        }
        "delete" => {
            reject_flags(&flags)?;
            let [id] = exactly::<1>(positionals, "expense delete")?;
            Ok(Command::ExpenseDelete { id })
        }
        "list" => {
            reject_flags(&flags)?;
            exactly::<0>(positionals, "expense list")?;
            Ok(Command::ExpenseList)
        }
        other => Err(usage(format!("unknown expense subcommand {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn no_arguments_prints_help() {
        assert_eq!(parse_args(&[]), Ok(Command::Help));
    }

    #[test]
    fn participant_add_with_colour() {
        assert_eq!(
            parse_args(&argv(&["participant", "add", "Alice", "--color", "#3b82f6"])),
            Ok(Command::ParticipantAdd {
                name: "Alice".into(),
                color: Some("#3b82f6".into())
            })
        );
    }

    #[test]
    fn expense_add_collects_splits_and_date() {
        let cmd = parse_args(&argv(&[
            "expense", "add", "Taxi", "42.5", "bob", "--split", "alice=25", "--date", "2024-01-02",
            "--split", "bob=75",
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            Command::ExpenseAdd(ExpenseArgs {
                description: "Taxi".into(),
                amount: "42.5".into(),
                payer: "bob".into(),
                date: Some("2024-01-02".into()),
                splits: vec![("alice".into(), "25".into()), ("bob".into(), "75".into())],
            })
        );
    }

    #[test]
    fn expense_edit_takes_id_first() {
        let cmd = parse_args(&argv(&["expense", "edit", "some-id", "Taxi", "10", "bob"])).unwrap();
        assert!(matches!(cmd, Command::ExpenseEdit { id, fields } if id == "some-id" && fields.amount == "10"));
    }

    #[test]
    fn export_path_is_optional() {
        assert_eq!(parse_args(&argv(&["export"])), Ok(Command::Export { path: None }));
        assert_eq!(
            parse_args(&argv(&["export", "out.html"])),
            Ok(Command::Export {
                path: Some(PathBuf::from("out.html"))
            })
        );
    }

    #[test]
    fn malformed_input_is_a_usage_error() {
        for bad in [
            argv(&["participant"]),
            argv(&["participant", "add"]),
            argv(&["participant", "add", "A", "--color"]),
            argv(&["expense", "add", "Taxi", "10"]),
            argv(&["expense", "add", "Taxi", "10", "bob", "--split", "bob"]),
            argv(&["participant", "list", "--all", "yes"]),
            argv(&["frobnicate"]),
        ] {
            assert!(matches!(parse_args(&bad), Err(CliError::Usage(_))), "{bad:?}");
        }
    }
}
