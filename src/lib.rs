// lib.rs - parambind library root

//! # parambind - Declarative parameter binding for command-line interfaces
//!
//! A command declares its positional arguments and flags as a list of
//! [`ParameterSpec`]s. This crate validates such a description, derives how
//! many positional tokens it accepts, and turns raw tokens and flag values
//! into typed values.
//!
//! ## Features
//!
//! - **Fail-fast validation**: ordering, list placement and default types are checked once, at bind time
//! - **Arity contracts**: the minimum and maximum positional token count of a command line
//! - **Typed values**: strings, integers, booleans, dates and string/integer lists
//! - **Date expressions**: `2018-01-01`, `January 1st 2018`, `last week`, `10 days ago`, ...
//! - **TOML descriptions**: command descriptions loaded from files and turned into clap commands
//!
//! ## Basic Usage
//!
//! ```rust
//! use parambind::prelude::*;
//!
//! let arguments = vec![
//!     ParameterSpec::new("table", ParameterType::String).required(),
//!     ParameterSpec::new("columns", ParameterType::StringList),
//! ];
//!
//! let contract = bind(&arguments)?;
//! assert!(contract.accepts(3));
//!
//! let tokens = vec!["orders".to_string(), "id".to_string(), "total".to_string()];
//! let values = gather_arguments(&tokens, &arguments)?;
//! assert_eq!(values.get("table"), Some(&ParamValue::from("orders")));
//! # Ok::<(), parambind::Error>(())
//! ```

pub mod cli;
pub mod connection;
pub mod error;
pub mod params;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{parse_command_line, CommandDescription, GatheredCommand};
    pub use crate::connection::{connection_flags, DatabaseConfig};
    pub use crate::error::{BindError, ConnectionError, DateError, Error, ParseError};
    pub use crate::params::{bind, bind_flags, gather_arguments, gather_flags, parse_date};
    pub use crate::params::{ArityContract, BoundCommand, ParamValue, ParameterSpec, ParameterType};
    pub use crate::params::{ParsedValues, RawValue, Timestamp};
}

// Re-export main types at the root level for convenience
pub use error::{Error, Result};
pub use params::{bind, gather_arguments, gather_flags, parse_date};
pub use params::{ArityContract, BoundCommand, ParamValue, ParameterSpec, ParameterType, ParsedValues};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
