use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "postgres";
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_PASSWORD: &str = "";
pub const DEFAULT_PORT: &str = "5432";

/// Parameters for opening a session. Every key is optional; missing keys
/// take the libpq-style defaults.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Kept as text; it is only parsed when the connection is attempted.
    pub port: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            port: DEFAULT_PORT.to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Build from a string map. Unknown keys are ignored.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str, default: &str| {
            map.get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            host: get("host", DEFAULT_HOST),
            database: get("database", DEFAULT_DATABASE),
            user: get("user", DEFAULT_USER),
            password: get("password", DEFAULT_PASSWORD),
            port: get("port", DEFAULT_PORT),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn port_number(&self) -> Result<u16> {
        self.port
            .trim()
            .parse()
            .map_err(|_| Error::InvalidPort(self.port.clone()))
    }

    pub(crate) fn connect_options(&self) -> Result<PgConnectOptions> {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port_number()?)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            Ok(options)
        } else {
            Ok(options.password(&self.password))
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}
