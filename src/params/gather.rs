// gather.rs - Turning positional tokens and flag values into typed values

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::bind::ArityContract;
use super::spec::ParameterSpec;
use super::value::{coerce_raw, coerce_token, coerce_tokens, ParsedValues, RawValue};
use crate::error::ParseError;

fn insert_default(values: &mut ParsedValues, spec: &ParameterSpec, now: DateTime<Utc>) -> Result<(), ParseError> {
    let default = spec.default_value(now).map_err(|reason| ParseError::InvalidValue {
        name: spec.name.clone(),
        ty: spec.ty,
        value: spec.default.to_string(),
        reason,
    })?;
    if let Some(value) = default {
        values.insert(spec.name.clone(), value);
    }
    Ok(())
}

/// Bind positional tokens to argument specs, in order.
pub fn gather_arguments(tokens: &[String], specs: &[ParameterSpec]) -> Result<ParsedValues, ParseError> {
    gather_arguments_at(tokens, specs, Utc::now())
}

/// Like [`gather_arguments`], resolving date values against `now`.
///
/// Scalar specs take one token each, a trailing list spec takes the rest.
/// Absent optional specs fall back to their default.
pub fn gather_arguments_at(
    tokens: &[String],
    specs: &[ParameterSpec],
    now: DateTime<Utc>,
) -> Result<ParsedValues, ParseError> {
    ArityContract::from_specs(specs).check(tokens.len())?;

    let mut values = ParsedValues::new();
    let mut remaining = tokens;

    for spec in specs {
        if spec.ty.is_list() {
            if !remaining.is_empty() {
                values.insert(spec.name.clone(), coerce_tokens(&spec.name, spec.ty, remaining)?);
                remaining = &[];
            } else if spec.required {
                return Err(ParseError::MissingArgument {
                    name: spec.name.clone(),
                });
            } else {
                insert_default(&mut values, spec, now)?;
            }
            continue;
        }

        match remaining.split_first() {
            Some((token, rest)) => {
                values.insert(spec.name.clone(), coerce_token(&spec.name, spec.ty, token, now)?);
                remaining = rest;
            }
            None if spec.required => {
                return Err(ParseError::MissingArgument {
                    name: spec.name.clone(),
                })
            }
            None => insert_default(&mut values, spec, now)?,
        }
    }

    if !remaining.is_empty() {
        return Err(ParseError::Arity {
            expected: ArityContract::from_specs(specs),
            got: tokens.len(),
        });
    }

    debug!(tokens = tokens.len(), values = values.len(), "gathered arguments");
    Ok(values)
}

/// Bind flag values to flag specs. Flags that were not supplied take their
/// default.
pub fn gather_flags(raw: &HashMap<String, RawValue>, specs: &[ParameterSpec]) -> Result<ParsedValues, ParseError> {
    gather_flags_at(raw, specs, Utc::now())
}

pub fn gather_flags_at(
    raw: &HashMap<String, RawValue>,
    specs: &[ParameterSpec],
    now: DateTime<Utc>,
) -> Result<ParsedValues, ParseError> {
    if let Some(unknown) = raw
        .keys()
        .filter(|name| !specs.iter().any(|spec| &spec.name == *name))
        .min()
    {
        return Err(ParseError::UnknownFlag {
            name: unknown.clone(),
        });
    }

    let mut values = ParsedValues::new();
    for spec in specs {
        match raw.get(&spec.name) {
            Some(value) => values.insert(spec.name.clone(), coerce_raw(&spec.name, spec.ty, value, now)?),
            None if spec.required => {
                return Err(ParseError::MissingFlag {
                    name: spec.name.clone(),
                })
            }
            None => insert_default(&mut values, spec, now)?,
        }
    }

    debug!(supplied = raw.len(), values = values.len(), "gathered flags");
    Ok(values)
}
