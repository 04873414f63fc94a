// command.rs - clap command generated from a bound description

use chrono::{DateTime, Utc};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::collections::HashMap;

use super::config::CommandDescription;
use crate::error::Result;
use crate::params::{BoundCommand, ParameterType, ParsedValues, RawValue};

/// Id of the catch-all positional; clap only collects the tokens, the
/// arity contract decides whether their number is acceptable.
const POSITIONAL_ID: &str = "[arguments]";

/// Tokens and flag values split out of a command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    pub tokens: Vec<String>,
    pub flags: HashMap<String, RawValue>,
}

/// Typed result of running a command line through a bound description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatheredCommand {
    pub arguments: ParsedValues,
    pub flags: ParsedValues,
}

fn value_name(ty: ParameterType) -> &'static str {
    match ty {
        ParameterType::String | ParameterType::StringList => "STRING",
        ParameterType::Integer | ParameterType::IntegerList => "INT",
        ParameterType::Bool => "BOOL",
        ParameterType::Date => "DATE",
    }
}

impl GatheredCommand {
    /// Arguments and flags in one set; a flag wins over an argument of the
    /// same name.
    pub fn values(&self) -> ParsedValues {
        self.arguments.clone().merge(self.flags.clone())
    }
}

/// Build the clap command for a description.
pub fn build_command(description: &CommandDescription, bound: &BoundCommand) -> Command {
    let mut command = Command::new(description.name.clone()).no_binary_name(true);
    if let Some(short) = &description.short {
        command = command.about(short.clone());
    }

    for flag in bound.flags() {
        let mut arg = Arg::new(flag.name.clone()).long(flag.name.clone());
        if let Some(short) = flag.short {
            arg = arg.short(short);
        }
        arg = match flag.ty {
            // `--flag` alone means true; `--flag=false` turns a true default off
            ParameterType::Bool => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_name(value_name(flag.ty)),
            ParameterType::StringList | ParameterType::IntegerList => arg
                .action(ArgAction::Append)
                .value_delimiter(',')
                .value_name(value_name(flag.ty)),
            _ => arg.action(ArgAction::Set).value_name(value_name(flag.ty)),
        };
        if flag.ty == ParameterType::Integer || flag.ty == ParameterType::IntegerList {
            arg = arg.allow_negative_numbers(true);
        }
        if let Some(help) = &flag.help {
            arg = arg.help(help.clone());
        }
        command = command.arg(arg);
    }

    let usage = bound
        .arguments()
        .iter()
        .map(|spec| match (spec.required, spec.ty.is_list()) {
            (true, true) => format!("<{}>...", spec.name),
            (true, false) => format!("<{}>", spec.name),
            (false, true) => format!("[{}]...", spec.name),
            (false, false) => format!("[{}]", spec.name),
        })
        .collect::<Vec<_>>()
        .join(" ");

    command.arg(
        Arg::new(POSITIONAL_ID)
            .action(ArgAction::Append)
            .num_args(1..)
            .allow_negative_numbers(true)
            .value_name("ARGS")
            .help(format!("{} ({})", usage, bound.contract())),
    )
}

/// Pull the positional tokens and the explicitly supplied flags out of the
/// matches. Flags left at clap's own default are omitted so that the
/// declared parameter defaults apply.
pub fn split_matches(matches: &ArgMatches, bound: &BoundCommand) -> CommandLine {
    let tokens = matches
        .get_many::<String>(POSITIONAL_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut flags = HashMap::new();
    for flag in bound.flags() {
        if matches.value_source(&flag.name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let raw = match flag.ty {
            ParameterType::StringList | ParameterType::IntegerList => RawValue::List(
                matches
                    .get_many::<String>(&flag.name)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            ),
            _ => match matches.get_one::<String>(&flag.name) {
                Some(value) => RawValue::String(value.clone()),
                None => continue,
            },
        };
        flags.insert(flag.name.clone(), raw);
    }

    CommandLine { tokens, flags }
}

/// Parse `argv` (without the program name) against a bound description.
pub fn parse_command_line(
    description: &CommandDescription,
    bound: &BoundCommand,
    argv: &[String],
    now: DateTime<Utc>,
) -> Result<GatheredCommand> {
    let matches = build_command(description, bound).try_get_matches_from(argv)?;
    let line = split_matches(&matches, bound);

    let flags = bound.gather_flags_at(&line.flags, now)?;
    let arguments = bound.gather_arguments_at(&line.tokens, now)?;
    Ok(GatheredCommand { arguments, flags })
}
