// value.rs - Typed parameter values and the coercion table

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::date::{parse_date, Timestamp};
use super::types::ParameterType;
use crate::error::{ParseError, ValueError};

/// A value converted to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Bool(bool),
    Date(Timestamp),
    StringList(Vec<String>),
    IntegerList(Vec<i64>),
}

impl ParamValue {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParamValue::String(_) => ParameterType::String,
            ParamValue::Integer(_) => ParameterType::Integer,
            ParamValue::Bool(_) => ParameterType::Bool,
            ParamValue::Date(_) => ParameterType::Date,
            ParamValue::StringList(_) => ParameterType::StringList,
            ParamValue::IntegerList(_) => ParameterType::IntegerList,
        }
    }

    /// Value an optional parameter takes when it declares no default.
    /// Dates have none and are left out of the result.
    pub fn zero(ty: ParameterType) -> Option<Self> {
        match ty {
            ParameterType::String => Some(ParamValue::String(String::new())),
            ParameterType::Integer => Some(ParamValue::Integer(0)),
            ParameterType::Bool => Some(ParamValue::Bool(false)),
            ParameterType::Date => None,
            ParameterType::StringList => Some(ParamValue::StringList(Vec::new())),
            ParameterType::IntegerList => Some(ParamValue::IntegerList(Vec::new())),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Timestamp> for ParamValue {
    fn from(value: Timestamp) -> Self {
        ParamValue::Date(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::StringList(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::StringList(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        ParamValue::IntegerList(value)
    }
}

/// Parameter name to typed value, produced fresh by every gather call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedValues {
    values: BTreeMap<String, ParamValue>,
}

macro_rules! typed_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(&self, name: &str) -> Result<Option<&$ty>, ValueError> {
            match self.values.get(name) {
                None => Ok(None),
                Some(ParamValue::$variant(value)) => Ok(Some(value)),
                Some(other) => Err(ValueError {
                    name: name.to_string(),
                    expected: ParameterType::$variant,
                    actual: other.parameter_type(),
                }),
            }
        }
    };
}

impl ParsedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Combine two value sets; entries of `other` win on conflicting names.
    pub fn merge(mut self, other: ParsedValues) -> Self {
        self.values.extend(other.values);
        self
    }

    typed_accessor!(string, String, String);
    typed_accessor!(integer, Integer, i64);
    typed_accessor!(bool, Bool, bool);
    typed_accessor!(date, Date, Timestamp);
    typed_accessor!(string_list, StringList, Vec<String>);
    typed_accessor!(integer_list, IntegerList, Vec<i64>);
}

impl FromIterator<(String, ParamValue)> for ParsedValues {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A flag value as handed over by the flag-parsing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Bool(bool),
    Integer(i64),
    List(Vec<String>),
}

impl RawValue {
    fn kind(&self) -> &'static str {
        match self {
            RawValue::String(_) => "a string",
            RawValue::Bool(_) => "a boolean",
            RawValue::Integer(_) => "an integer",
            RawValue::List(_) => "a list",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::String(s) => write!(f, "{}", s),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Integer(i) => write!(f, "{}", i),
            RawValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        RawValue::List(value)
    }
}

fn invalid(name: &str, ty: ParameterType, value: impl fmt::Display, reason: impl Into<String>) -> ParseError {
    ParseError::InvalidValue {
        name: name.to_string(),
        ty,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Plain decimal numeral with an optional leading `-`; no padding, no `+`.
fn parse_integer(name: &str, ty: ParameterType, token: &str) -> Result<i64, ParseError> {
    if token.starts_with('+') {
        return Err(invalid(name, ty, token, "not a decimal integer"));
    }
    token
        .parse::<i64>()
        .map_err(|e| invalid(name, ty, token, format!("not an integer ({})", e)))
}

fn parse_bool(name: &str, token: &str) -> Result<bool, ParseError> {
    token
        .trim()
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|_| invalid(name, ParameterType::Bool, token, "expected true or false"))
}

fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(String::from).collect()
}

/// Convert one positional token for a scalar parameter.
pub fn coerce_token(
    name: &str,
    ty: ParameterType,
    token: &str,
    now: DateTime<Utc>,
) -> Result<ParamValue, ParseError> {
    match ty {
        ParameterType::String => Ok(ParamValue::String(token.to_string())),
        ParameterType::Integer => parse_integer(name, ty, token).map(ParamValue::Integer),
        ParameterType::Bool => parse_bool(name, token).map(ParamValue::Bool),
        ParameterType::Date => parse_date(token, now)
            .map(ParamValue::Date)
            .map_err(|e| invalid(name, ty, token, e.to_string())),
        ParameterType::StringList | ParameterType::IntegerList => {
            coerce_tokens(name, ty, &[token.to_string()])
        }
    }
}

/// Convert the tokens absorbed by a list parameter. A single bad element
/// fails the whole list.
pub fn coerce_tokens(name: &str, ty: ParameterType, tokens: &[String]) -> Result<ParamValue, ParseError> {
    match ty {
        ParameterType::StringList => Ok(ParamValue::StringList(tokens.to_vec())),
        ParameterType::IntegerList => tokens
            .iter()
            .map(|token| parse_integer(name, ty, token))
            .collect::<Result<Vec<_>, _>>()
            .map(ParamValue::IntegerList),
        _ => Err(invalid(name, ty, tokens.join(" "), "expected a single value")),
    }
}

/// Convert a raw flag value.
///
/// A string handed to a list parameter is split on `,` the same way the
/// command line splits list flags. Elements are kept as written, so
/// `a,,b` yields an empty middle element and fails for integer lists.
pub fn coerce_raw(
    name: &str,
    ty: ParameterType,
    raw: &RawValue,
    now: DateTime<Utc>,
) -> Result<ParamValue, ParseError> {
    match (ty, raw) {
        (ParameterType::String, RawValue::String(s)) => Ok(ParamValue::String(s.clone())),
        (ParameterType::Integer, RawValue::Integer(i)) => Ok(ParamValue::Integer(*i)),
        (ParameterType::Integer, RawValue::String(s)) => coerce_token(name, ty, s, now),
        (ParameterType::Bool, RawValue::Bool(b)) => Ok(ParamValue::Bool(*b)),
        (ParameterType::Bool, RawValue::String(s)) => coerce_token(name, ty, s, now),
        (ParameterType::Date, RawValue::String(s)) => coerce_token(name, ty, s, now),
        (ParameterType::StringList | ParameterType::IntegerList, RawValue::List(items)) => {
            coerce_tokens(name, ty, items)
        }
        (ParameterType::StringList | ParameterType::IntegerList, RawValue::String(s)) => {
            coerce_tokens(name, ty, &split_list(s))
        }
        (_, other) => Err(invalid(
            name,
            ty,
            other,
            format!("expected {} value, got {}", ty, other.kind()),
        )),
    }
}

fn describe_json(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a float",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

/// Convert an untyped default to the declared type. Native values of the
/// matching shape are taken as they are; anything else is rejected.
pub fn coerce_default(ty: ParameterType, default: &Value, now: DateTime<Utc>) -> Result<ParamValue, String> {
    let mismatch = || format!("expected {} default, got {}", ty, describe_json(default));
    match (ty, default) {
        (ParameterType::String, Value::String(s)) => Ok(ParamValue::String(s.clone())),
        (ParameterType::Integer, Value::Number(n)) => n.as_i64().map(ParamValue::Integer).ok_or_else(mismatch),
        (ParameterType::Bool, Value::Bool(b)) => Ok(ParamValue::Bool(*b)),
        (ParameterType::Date, Value::String(s)) => parse_date(s, now)
            .map(ParamValue::Date)
            .map_err(|e| e.to_string()),
        (ParameterType::StringList, Value::Array(items)) => {
            if items.is_empty() {
                return Err("list defaults cannot be empty".to_string());
            }
            items
                .iter()
                .map(|item| item.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::StringList)
                .ok_or_else(|| "expected a list of strings".to_string())
        }
        (ParameterType::IntegerList, Value::Array(items)) => {
            if items.is_empty() {
                return Err("list defaults cannot be empty".to_string());
            }
            items
                .iter()
                .map(Value::as_i64)
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::IntegerList)
                .ok_or_else(|| "expected a list of integers".to_string())
        }
        _ => Err(mismatch()),
    }
}
