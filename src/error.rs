// error.rs - Error types for binding and parsing parameters

use thiserror::Error;

use crate::params::{ArityContract, ParameterType};

/// Errors raised while validating a parameter description (bind time).
///
/// These are permanent: a command whose description fails to bind must not
/// be offered for execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("required argument '{name}' cannot follow optional argument '{previous}'")]
    RequiredAfterOptional { name: String, previous: String },

    #[error("only one list argument is allowed, found '{first}' and '{second}'")]
    MultipleListArguments { first: String, second: String },

    #[error("list argument '{name}' must be the last argument")]
    ListNotLast { name: String },

    #[error("invalid default for '{name}' of type {ty}: {reason}")]
    InvalidDefault {
        name: String,
        ty: ParameterType,
        reason: String,
    },

    #[error("required parameter '{name}' cannot have a default value")]
    RequiredWithDefault { name: String },

    #[error("parameter '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("parameter names cannot be empty")]
    EmptyName,

    #[error("short alias '-{short}' is used by both '{first}' and '{second}'")]
    DuplicateShort {
        short: char,
        first: String,
        second: String,
    },
}

/// Errors raised while turning raw tokens and flag values into typed values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, got {got}")]
    Arity { expected: ArityContract, got: usize },

    #[error("missing required argument '{name}'")]
    MissingArgument { name: String },

    #[error("missing required flag '--{name}'")]
    MissingFlag { name: String },

    #[error("unknown flag '--{name}'")]
    UnknownFlag { name: String },

    #[error("invalid value '{value}' for '{name}' ({ty}): {reason}")]
    InvalidValue {
        name: String,
        ty: ParameterType,
        value: String,
        reason: String,
    },
}

/// Unparseable date text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse date '{text}'")]
pub struct DateError {
    pub text: String,
}

impl DateError {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Reading a value out of `ParsedValues` as the wrong type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("parameter '{name}' holds {actual}, not {expected}")]
pub struct ValueError {
    pub name: String,
    pub expected: ParameterType,
    pub actual: ParameterType,
}

/// Errors loading a command description file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read command description '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse command description: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors resolving the connection target from a `DatabaseConfig`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("dbt profile '{profile}' cannot be resolved: dbt profiles are not supported")]
    DbtProfilesUnsupported { profile: String },
}

/// Crate-level error wrapping every stage.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("command line error: {0}")]
    CommandLine(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<clap::Error> for Error {
    fn from(err: clap::Error) -> Self {
        Error::CommandLine(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
