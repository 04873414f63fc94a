// types.rs - Closed set of parameter types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared type of an argument or flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParameterType {
    #[default]
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int", alias = "integer")]
    Integer,
    #[serde(rename = "bool", alias = "boolean")]
    Bool,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "stringList", alias = "string-list")]
    StringList,
    #[serde(rename = "intList", alias = "integer-list")]
    IntegerList,
}

impl ParameterType {
    /// List types absorb every remaining positional token.
    pub fn is_list(&self) -> bool {
        matches!(self, ParameterType::StringList | ParameterType::IntegerList)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "int",
            ParameterType::Bool => "bool",
            ParameterType::Date => "date",
            ParameterType::StringList => "stringList",
            ParameterType::IntegerList => "intList",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(ParameterType::String),
            "int" | "integer" => Ok(ParameterType::Integer),
            "bool" | "boolean" => Ok(ParameterType::Bool),
            "date" => Ok(ParameterType::Date),
            "stringlist" | "string-list" => Ok(ParameterType::StringList),
            "intlist" | "integer-list" => Ok(ParameterType::IntegerList),
            _ => Err(format!(
                "Unknown parameter type '{}'. Available: string, int, bool, date, stringList, intList",
                s
            )),
        }
    }
}
