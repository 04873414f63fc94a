// config.rs - Database connection settings populated from parsed flags

use std::fmt;
use tracing::debug;

use super::layer::{DEFAULT_DBT_PROFILE, DEFAULT_DB_TYPE, DEFAULT_PORT};
use crate::error::{ConnectionError, ValueError};
use crate::params::ParsedValues;

/// Connection settings read from the connection flag layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: i64,
    pub schema: String,
    pub db_type: String,
    pub dsn: String,
    pub driver: String,
    pub dbt_profiles_path: String,
    pub dbt_profile: String,
    pub use_dbt_profiles: bool,
}

/// Resolved connection target.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub db_type: String,
    pub hostname: String,
    pub port: i64,
    pub username: String,
    pub password: String,
    pub database: String,
    pub schema: String,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}@{}:{}/{}",
            self.db_type, self.username, self.hostname, self.port, self.database
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            database: String::new(),
            user: String::new(),
            password: String::new(),
            port: DEFAULT_PORT,
            schema: String::new(),
            db_type: DEFAULT_DB_TYPE.to_string(),
            dsn: String::new(),
            driver: String::new(),
            dbt_profiles_path: String::new(),
            dbt_profile: DEFAULT_DBT_PROFILE.to_string(),
            use_dbt_profiles: false,
        }
    }
}

impl DatabaseConfig {
    /// Populate the config from parsed values. Each field names the parameter
    /// it is read from; absent parameters keep the field's default.
    pub fn from_parsed_values(values: &ParsedValues) -> Result<Self, ValueError> {
        let defaults = Self::default();
        let text = |name: &str, fallback: String| -> Result<String, ValueError> {
            Ok(values.string(name)?.cloned().unwrap_or(fallback))
        };

        Ok(Self {
            host: text("host", defaults.host)?,
            database: text("database", defaults.database)?,
            user: text("user", defaults.user)?,
            password: text("password", defaults.password)?,
            port: values.integer("port")?.copied().unwrap_or(defaults.port),
            schema: text("schema", defaults.schema)?,
            db_type: text("db-type", defaults.db_type)?,
            dsn: text("dsn", defaults.dsn)?,
            driver: text("driver", defaults.driver)?,
            dbt_profiles_path: text("dbt-profiles-path", defaults.dbt_profiles_path)?,
            dbt_profile: text("dbt-profile", defaults.dbt_profile)?,
            use_dbt_profiles: values
                .bool("use-dbt-profiles")?
                .copied()
                .unwrap_or(defaults.use_dbt_profiles),
        })
    }

    /// Log the effective connection settings at debug level.
    pub fn log_verbose(&self) {
        if self.use_dbt_profiles {
            debug!(
                dbt_profiles_path = %self.dbt_profiles_path,
                dbt_profile = %self.dbt_profile,
                "Using dbt profiles"
            );
            self.log_connection_string();
        } else if !self.dsn.is_empty() {
            debug!(dsn = %self.dsn, driver = %self.driver, "Using DSN");
        } else {
            self.log_connection_string();
        }
    }

    fn log_connection_string(&self) {
        debug!(
            host = %self.host,
            database = %self.database,
            user = %self.user,
            port = self.port,
            schema = %self.schema,
            db_type = %self.db_type,
            "Using connection string"
        );
    }

    /// Resolve the connection target. dbt profiles need a profiles.yml
    /// reader and are reported as unsupported.
    pub fn source(&self) -> Result<Source, ConnectionError> {
        if self.use_dbt_profiles {
            return Err(ConnectionError::DbtProfilesUnsupported {
                profile: self.dbt_profile.clone(),
            });
        }

        Ok(Source {
            db_type: self.db_type.clone(),
            hostname: self.host.clone(),
            port: self.port,
            username: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
        })
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_dbt_profiles {
            if !self.dbt_profiles_path.is_empty() {
                write!(f, "dbt-profiles-path: {}, ", self.dbt_profiles_path)?;
            }
            write!(f, "dbt-profile: {}", self.dbt_profile)
        } else if !self.dsn.is_empty() {
            write!(f, "dsn: {}, driver: {}", self.dsn, self.driver)
        } else {
            write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.database)
        }
    }
}
