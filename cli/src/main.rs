use anyhow::{Context, Result};
use clap::Parser;
use roster::{ConnectionConfig, Outcome};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(about = "Create, seed, and print the students table", long_about = None)]
struct Cli {
    /// JSON file with any of: host, database, user, password, port
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database server host
    #[arg(long, env = "PGHOST")]
    host: Option<String>,

    /// Database name
    #[arg(long, env = "PGDATABASE")]
    database: Option<String>,

    /// User to authenticate as
    #[arg(long, env = "PGUSER")]
    user: Option<String>,

    /// Password for the user
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database server port
    #[arg(long, env = "PGPORT")]
    port: Option<String>,
}

/// Parameters used when neither a config file nor flags are given.
fn local_config() -> ConnectionConfig {
    ConnectionConfig {
        host: "localhost".into(),
        database: "mydatabase".into(),
        user: "myuser".into(),
        password: "mypassword".into(),
        port: "15432".into(),
    }
}

impl Cli {
    fn connection_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                ConnectionConfig::from_json(&json)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => local_config(),
        };

        let overrides = [
            (&self.host, &mut config.host),
            (&self.database, &mut config.database),
            (&self.user, &mut config.user),
            (&self.password, &mut config.password),
            (&self.port, &mut config.port),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the table dump
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.connection_config()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = %config.port,
        database = %config.database,
        "Starting roster"
    );

    let mut stdout = std::io::stdout().lock();
    match roster::run(&config, &mut stdout).await? {
        Outcome::Completed(rows) => info!(rows = rows.len(), "Done"),
        Outcome::Unavailable => warn!("Database unavailable, nothing done"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_args() -> Cli {
        Cli {
            config: None,
            host: None,
            database: None,
            user: None,
            password: None,
            port: None,
        }
    }

    #[test]
    fn no_args_uses_local_config() {
        let config = no_args().connection_config().unwrap();
        assert_eq!(config, local_config());
    }

    #[test]
    fn flags_override_builtin() {
        let cli = Cli {
            host: Some("db.internal".into()),
            port: Some("6543".into()),
            ..no_args()
        };
        let config = cli.connection_config().unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, "6543");
        assert_eq!(config.database, "mydatabase");
        assert_eq!(config.user, "myuser");
    }

    #[test]
    fn file_then_flags() {
        let path = std::env::temp_dir().join(format!("roster-cli-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"database": "from_file", "user": "file_user"}}"#).unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            user: Some("flag_user".into()),
            ..no_args()
        };
        let config = cli.connection_config().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.database, "from_file");
        assert_eq!(config.user, "flag_user");
        // Missing keys in the file take the library defaults
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, "5432");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/roster.json")),
            ..no_args()
        };
        assert!(cli.connection_config().is_err());
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from(["roster-cli", "--database", "school", "--port", "15432"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("school"));
        assert_eq!(cli.port.as_deref(), Some("15432"));
    }
}
