// config.rs - Command description files

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::connection::connection_flags;
use crate::error::{BindError, ConfigError};
use crate::params::{BoundCommand, ParameterSpec};

/// Declarative description of one command: its positional arguments and
/// its flags, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandDescription {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    /// Append the database connection flags to `flags`
    #[serde(default)]
    pub connection: bool,

    #[serde(default)]
    pub arguments: Vec<ParameterSpec>,

    #[serde(default)]
    pub flags: Vec<ParameterSpec>,
}

impl CommandDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            connection: false,
            arguments: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Load a description from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let description: Self = content.parse()?;
        debug!(path = %path.display(), command = %description.name, "loaded command description");
        Ok(description)
    }

    /// Flags including the connection layer when enabled.
    pub fn all_flags(&self) -> Vec<ParameterSpec> {
        let mut flags = self.flags.clone();
        if self.connection {
            flags.extend(connection_flags());
        }
        flags
    }

    /// Validate the description. A command that fails here must not be run.
    pub fn bind(&self) -> Result<BoundCommand, BindError> {
        BoundCommand::new(self.arguments.clone(), self.all_flags())
    }

    /// Generate a sample description file with comments
    pub fn generate_sample() -> String {
        r#"# orders.toml - Command description for parambind
# Arguments are positional and bound in order; flags are bound by name.

name = "orders"
short = "List orders placed since a given date"

# Append the database connection flags (--host, --port, --db-type, ...)
connection = true

# =============================================================================
# ARGUMENTS
# =============================================================================
# Types: string, int, bool, date, stringList, intList
# Required arguments must come before optional ones.
# A list argument absorbs the remaining tokens and must come last.

[[arguments]]
name = "since"
type = "date"
required = true
help = "Only orders placed after this date (2018-01-01, last month, 10 days ago)"

[[arguments]]
name = "status"
type = "stringList"
default = ["open"]
help = "Order statuses to include"

# =============================================================================
# FLAGS
# =============================================================================

[[flags]]
name = "limit"
type = "int"
short = "l"
default = 100
help = "Maximum number of rows"

[[flags]]
name = "customer-ids"
type = "intList"
help = "Restrict to these customers (comma separated)"

[[flags]]
name = "explain"
type = "bool"
help = "Print the query plan instead of running the query"
"#
        .to_string()
    }
}

impl FromStr for CommandDescription {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}
