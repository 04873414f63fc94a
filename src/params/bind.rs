// bind.rs - Description validation and the positional arity contract

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

use super::gather::{gather_arguments_at, gather_flags_at};
use super::spec::ParameterSpec;
use super::value::{ParsedValues, RawValue};
use crate::error::{BindError, ParseError};

/// Number of positional tokens a list of argument specs accepts.
///
/// `max` is `None` when a trailing list argument absorbs the remainder; `min`
/// still counts every required spec, including a required list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityContract {
    pub min: usize,
    pub max: Option<usize>,
}

impl ArityContract {
    pub fn from_specs(specs: &[ParameterSpec]) -> Self {
        let min = specs.iter().filter(|s| s.required).count();
        let has_list = specs.iter().any(|s| s.ty.is_list());
        let max = if has_list {
            None
        } else {
            Some(min + specs.iter().filter(|s| !s.required).count())
        };
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    pub fn check(&self, count: usize) -> Result<(), ParseError> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(ParseError::Arity {
                expected: *self,
                got: count,
            })
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "argument"
    } else {
        "arguments"
    }
}

impl fmt::Display for ArityContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(0) => write!(f, "no arguments"),
            Some(max) if max == self.min => write!(f, "{} {}", max, plural(max)),
            Some(max) => write!(f, "between {} and {} arguments", self.min, max),
            None => write!(f, "at least {} {}", self.min, plural(self.min)),
        }
    }
}

type Rule = fn(&[ParameterSpec], DateTime<Utc>) -> Result<(), BindError>;

/// Checks over positional arguments, evaluated in order; the first failure wins.
const ARGUMENT_RULES: &[Rule] = &[
    check_required_after_optional,
    check_single_list,
    check_list_last,
    check_defaults,
    check_names,
    check_required_defaults,
];

/// Flags are matched by name, so only the per-spec checks apply.
const FLAG_RULES: &[Rule] = &[check_defaults, check_names, check_shorts, check_required_defaults];

fn check_required_after_optional(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    let mut optional: Option<&ParameterSpec> = None;
    for spec in specs {
        match (spec.required, optional) {
            (true, Some(previous)) => {
                return Err(BindError::RequiredAfterOptional {
                    name: spec.name.clone(),
                    previous: previous.name.clone(),
                })
            }
            (false, None) => optional = Some(spec),
            _ => {}
        }
    }
    Ok(())
}

fn check_single_list(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    let mut lists = specs.iter().filter(|s| s.ty.is_list());
    if let (Some(first), Some(second)) = (lists.next(), lists.next()) {
        return Err(BindError::MultipleListArguments {
            first: first.name.clone(),
            second: second.name.clone(),
        });
    }
    Ok(())
}

fn check_list_last(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    let last = specs.len().saturating_sub(1);
    match specs.iter().enumerate().find(|(idx, s)| s.ty.is_list() && *idx != last) {
        Some((_, spec)) => Err(BindError::ListNotLast {
            name: spec.name.clone(),
        }),
        None => Ok(()),
    }
}

fn check_defaults(specs: &[ParameterSpec], now: DateTime<Utc>) -> Result<(), BindError> {
    for spec in specs.iter().filter(|s| s.has_default()) {
        spec.default_value(now).map_err(|reason| BindError::InvalidDefault {
            name: spec.name.clone(),
            ty: spec.ty,
            reason,
        })?;
    }
    Ok(())
}

fn check_names(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    let mut seen = HashSet::new();
    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(BindError::EmptyName);
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(BindError::DuplicateName {
                name: spec.name.clone(),
            });
        }
    }
    Ok(())
}

/// `-h` belongs to the generated help flag.
fn check_shorts(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    let mut seen: HashMap<char, &str> = HashMap::from([('h', "help")]);
    for spec in specs {
        let Some(short) = spec.short else { continue };
        if let Some(first) = seen.insert(short, spec.name.as_str()) {
            return Err(BindError::DuplicateShort {
                short,
                first: first.to_string(),
                second: spec.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_required_defaults(specs: &[ParameterSpec], _now: DateTime<Utc>) -> Result<(), BindError> {
    match specs.iter().find(|s| s.required && s.has_default()) {
        Some(spec) => Err(BindError::RequiredWithDefault {
            name: spec.name.clone(),
        }),
        None => Ok(()),
    }
}

fn run_rules(rules: &[Rule], specs: &[ParameterSpec], now: DateTime<Utc>) -> Result<(), BindError> {
    rules.iter().try_for_each(|rule| rule(specs, now))
}

/// Validate an ordered list of argument specs and derive its arity contract.
pub fn bind(arguments: &[ParameterSpec]) -> Result<ArityContract, BindError> {
    bind_at(arguments, Utc::now())
}

/// Like [`bind`], with date defaults checked against `now`.
pub fn bind_at(arguments: &[ParameterSpec], now: DateTime<Utc>) -> Result<ArityContract, BindError> {
    run_rules(ARGUMENT_RULES, arguments, now)?;
    let contract = ArityContract::from_specs(arguments);
    debug!(
        arguments = arguments.len(),
        min = contract.min,
        max = ?contract.max,
        "bound argument description"
    );
    Ok(contract)
}

/// Validate flag specs. Flags carry no ordering constraint.
pub fn bind_flags(flags: &[ParameterSpec]) -> Result<(), BindError> {
    bind_flags_at(flags, Utc::now())
}

pub fn bind_flags_at(flags: &[ParameterSpec], now: DateTime<Utc>) -> Result<(), BindError> {
    run_rules(FLAG_RULES, flags, now)?;
    debug!(flags = flags.len(), "bound flag description");
    Ok(())
}

/// Argument and flag specs that passed validation, with their arity contract.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand {
    arguments: Vec<ParameterSpec>,
    flags: Vec<ParameterSpec>,
    contract: ArityContract,
}

impl BoundCommand {
    pub fn new(arguments: Vec<ParameterSpec>, flags: Vec<ParameterSpec>) -> Result<Self, BindError> {
        let contract = bind(&arguments)?;
        bind_flags(&flags)?;
        Ok(Self {
            arguments,
            flags,
            contract,
        })
    }

    pub fn arguments(&self) -> &[ParameterSpec] {
        &self.arguments
    }

    pub fn flags(&self) -> &[ParameterSpec] {
        &self.flags
    }

    pub fn contract(&self) -> ArityContract {
        self.contract
    }

    pub fn gather_arguments(&self, tokens: &[String]) -> Result<ParsedValues, ParseError> {
        self.gather_arguments_at(tokens, Utc::now())
    }

    pub fn gather_arguments_at(&self, tokens: &[String], now: DateTime<Utc>) -> Result<ParsedValues, ParseError> {
        gather_arguments_at(tokens, &self.arguments, now)
    }

    pub fn gather_flags(&self, raw: &HashMap<String, RawValue>) -> Result<ParsedValues, ParseError> {
        self.gather_flags_at(raw, Utc::now())
    }

    pub fn gather_flags_at(
        &self,
        raw: &HashMap<String, RawValue>,
        now: DateTime<Utc>,
    ) -> Result<ParsedValues, ParseError> {
        gather_flags_at(raw, &self.flags, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterType;
    use serde_json::json;

    fn string(name: &str) -> ParameterSpec {
        ParameterSpec::new(name, ParameterType::String)
    }

    fn accepted(contract: ArityContract, counts: &[usize]) -> Vec<bool> {
        counts.iter().map(|&c| contract.accepts(c)).collect()
    }

    #[test]
    fn test_zero_arguments() {
        let contract = bind(&[]).unwrap();
        assert_eq!(contract, ArityContract { min: 0, max: Some(0) });
        assert!(contract.accepts(0));
        assert!(!contract.accepts(1));
    }

    #[test]
    fn test_single_required_argument() {
        let contract = bind(&[string("foo").required()]).unwrap();
        assert_eq!(accepted(contract, &[0, 1, 2]), vec![false, true, false]);
    }

    #[test]
    fn test_two_required_arguments() {
        let contract = bind(&[string("foo").required(), string("bar").required()]).unwrap();
        assert_eq!(accepted(contract, &[0, 1, 2, 3]), vec![false, false, true, false]);
    }

    #[test]
    fn test_required_then_optional() {
        let contract = bind(&[string("foo").required(), string("bar").with_default("baz")]).unwrap();
        assert_eq!(contract, ArityContract { min: 1, max: Some(2) });
        assert_eq!(accepted(contract, &[0, 1, 2, 3]), vec![false, true, true, false]);
    }

    #[test]
    fn test_two_optional_arguments() {
        let contract = bind(&[string("foo"), string("bar")]).unwrap();
        assert_eq!(accepted(contract, &[0, 1, 2, 3]), vec![true, true, true, false]);
    }

    #[test]
    fn test_required_after_optional_fails() {
        let err = bind(&[string("foo"), string("bar").required()]).unwrap_err();
        assert_eq!(
            err,
            BindError::RequiredAfterOptional {
                name: "bar".to_string(),
                previous: "foo".to_string()
            }
        );

        // list type does not change the ordering rule
        let err = bind(&[
            string("foo"),
            ParameterSpec::new("bar", ParameterType::StringList).required(),
        ])
        .unwrap_err();
        assert!(matches!(err, BindError::RequiredAfterOptional { .. }));
    }

    #[test]
    fn test_list_contracts() {
        let required_list = bind(&[ParameterSpec::new("foo", ParameterType::StringList).required()]).unwrap();
        assert_eq!(required_list, ArityContract { min: 1, max: None });
        assert_eq!(accepted(required_list, &[0, 1, 2, 3]), vec![false, true, true, true]);

        let optional_list =
            bind(&[ParameterSpec::new("foo", ParameterType::StringList).with_default(json!(["baz"]))]).unwrap();
        assert_eq!(accepted(optional_list, &[0, 1, 2]), vec![true, true, true]);

        let after_required = bind(&[
            string("foo").required(),
            ParameterSpec::new("bar", ParameterType::StringList).required(),
        ])
        .unwrap();
        assert_eq!(accepted(after_required, &[0, 1, 2, 3]), vec![false, false, true, true]);

        let optional_after_required = bind(&[
            string("foo").required(),
            ParameterSpec::new("bar", ParameterType::StringList).with_default(json!(["blop"])),
        ])
        .unwrap();
        assert_eq!(accepted(optional_after_required, &[0, 1, 2, 3]), vec![false, true, true, true]);

        let optional_after_optional = bind(&[
            string("foo").with_default("blop"),
            ParameterSpec::new("bar", ParameterType::StringList).with_default(json!(["bloppp"])),
        ])
        .unwrap();
        assert_eq!(accepted(optional_after_optional, &[0, 1, 2, 3]), vec![true, true, true, true]);

        let int_list = bind(&[ParameterSpec::new("foo", ParameterType::IntegerList).required()]).unwrap();
        assert_eq!(accepted(int_list, &[0, 1, 3]), vec![false, true, true]);
    }

    #[test]
    fn test_list_placement_rules() {
        let err = bind(&[ParameterSpec::new("foo", ParameterType::StringList), string("bar")]).unwrap_err();
        assert_eq!(err, BindError::ListNotLast { name: "foo".to_string() });

        let err = bind(&[
            ParameterSpec::new("foo", ParameterType::StringList),
            ParameterSpec::new("bar", ParameterType::IntegerList),
        ])
        .unwrap_err();
        assert!(matches!(err, BindError::MultipleListArguments { .. }));
    }

    #[test]
    fn test_invalid_default_fails() {
        let failing = vec![
            (ParameterType::String, json!(123)),
            (ParameterType::Integer, json!("foo")),
            (ParameterType::Date, json!("22#@!")),
            (ParameterType::StringList, json!("foo")),
            (ParameterType::IntegerList, json!([])),
        ];
        for (ty, value) in failing {
            let spec = ParameterSpec::new("foo", ty).with_default(value.clone());
            let err = bind(&[spec]).unwrap_err();
            assert!(
                matches!(err, BindError::InvalidDefault { .. }),
                "expected default error for {} / {}",
                ty,
                value
            );
        }
    }

    #[test]
    fn test_names_and_required_defaults() {
        assert_eq!(
            bind(&[string("foo"), string("foo")]).unwrap_err(),
            BindError::DuplicateName { name: "foo".to_string() }
        );
        assert_eq!(bind(&[string(" ")]).unwrap_err(), BindError::EmptyName);
        assert_eq!(
            bind(&[string("foo").required().with_default("x")]).unwrap_err(),
            BindError::RequiredWithDefault { name: "foo".to_string() }
        );
    }

    #[test]
    fn test_flags_have_no_ordering_constraint() {
        let flags = vec![
            string("baz").with_default("blop"),
            string("token").required(),
            ParameterSpec::new("tags", ParameterType::StringList),
            ParameterSpec::new("ids", ParameterType::IntegerList),
        ];
        assert!(bind_flags(&flags).is_ok());

        let bad = vec![ParameterSpec::new("port", ParameterType::Integer).with_default("3306")];
        assert!(matches!(bind_flags(&bad).unwrap_err(), BindError::InvalidDefault { .. }));
    }

    #[test]
    fn test_flag_short_aliases() {
        let flags = vec![string("host").with_short('H'), string("port").with_short('P')];
        assert!(bind_flags(&flags).is_ok());

        let clash = vec![string("host").with_short('H'), string("hostname").with_short('H')];
        assert_eq!(
            bind_flags(&clash).unwrap_err(),
            BindError::DuplicateShort {
                short: 'H',
                first: "host".to_string(),
                second: "hostname".to_string(),
            }
        );

        let help = vec![string("host").with_short('h')];
        assert!(matches!(
            bind_flags(&help).unwrap_err(),
            BindError::DuplicateShort { short: 'h', .. }
        ));
    }

    #[test]
    fn test_bind_is_repeatable() {
        let specs = vec![
            string("foo").required(),
            ParameterSpec::new("bar", ParameterType::IntegerList).with_default(json!([1])),
        ];
        let snapshot = specs.clone();
        let first = bind(&specs).unwrap();
        let second = bind(&specs).unwrap();
        assert_eq!(first, second);
        assert_eq!(specs, snapshot);
    }

    #[test]
    fn test_contract_display() {
        assert_eq!(ArityContract { min: 0, max: Some(0) }.to_string(), "no arguments");
        assert_eq!(ArityContract { min: 1, max: Some(1) }.to_string(), "1 argument");
        assert_eq!(ArityContract { min: 1, max: Some(2) }.to_string(), "between 1 and 2 arguments");
        assert_eq!(ArityContract { min: 2, max: None }.to_string(), "at least 2 arguments");
    }

    #[test]
    fn test_bound_command_checks_arity() {
        let command = BoundCommand::new(
            vec![string("foo").required()],
            vec![string("baz").with_default("blop")],
        )
        .unwrap();
        assert_eq!(command.contract(), ArityContract { min: 1, max: Some(1) });

        let err = command.gather_arguments(&["a".to_string(), "b".to_string()]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Arity {
                expected: command.contract(),
                got: 2
            }
        );

        let flags = command.gather_flags(&HashMap::new()).unwrap();
        assert_eq!(flags.string("baz").unwrap().map(String::as_str), Some("blop"));
    }
}
