// layer.rs - Flag specs shared by every command that opens a database

use serde_json::Value;

use crate::params::{ParameterSpec, ParameterType};

pub const DEFAULT_PORT: i64 = 3306;
pub const DEFAULT_DB_TYPE: &str = "mysql";
pub const DEFAULT_DBT_PROFILE: &str = "default";

fn text(name: &str, default: &str, help: &str) -> ParameterSpec {
    ParameterSpec::new(name, ParameterType::String)
        .with_default(Value::from(default))
        .with_help(help)
}

/// Connection flags appended to a command's own flags.
pub fn connection_flags() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("use-dbt-profiles", ParameterType::Bool)
            .with_default(false)
            .with_help("Use dbt profiles.yml to connect to databases"),
        text(
            "dbt-profiles-path",
            "",
            "Path to dbt profiles.yml (default: ~/.dbt/profiles.yml)",
        ),
        text("dbt-profile", DEFAULT_DBT_PROFILE, "Name of dbt profile to use"),
        text("host", "", "Database host").with_short('H'),
        text("database", "", "Database name").with_short('D'),
        text("user", "", "Database user").with_short('u'),
        text("password", "", "Database password").with_short('p'),
        ParameterSpec::new("port", ParameterType::Integer)
            .with_default(DEFAULT_PORT)
            .with_help("Database port")
            .with_short('P'),
        text("schema", "", "Database schema (when applicable)").with_short('s'),
        text("db-type", DEFAULT_DB_TYPE, "Database type (mysql, postgres, etc.)").with_short('t'),
        text("dsn", "", "Database DSN"),
        text("driver", "", "Database driver"),
    ]
}
