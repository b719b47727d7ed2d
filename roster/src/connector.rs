use sqlx::{ConnectOptions, PgConnection};
use tracing::{error, info};

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::session::Session;

/// Open a session, returning the cause when it cannot be established.
///
/// Nothing has been sent on behalf of the caller yet, so every error here
/// (bad parameters, unreachable host, rejected or unsupported authentication,
/// missing database) is an establishment failure.
pub async fn establish(config: &ConnectionConfig) -> Result<Session> {
    match open(config).await {
        Ok(session) => {
            info!(session = %session.label(), "Connection successful.");
            Ok(session)
        }
        Err(e) => {
            error!(
                host = %config.host,
                port = %config.port,
                database = %config.database,
                error = %e,
                "Error connecting to the database"
            );
            Err(e)
        }
    }
}

/// Open a session, or `None` when it cannot be established. The cause is
/// logged.
pub async fn connect(config: &ConnectionConfig) -> Option<Session> {
    establish(config).await.ok()
}

async fn open(config: &ConnectionConfig) -> Result<Session> {
    let options = config.connect_options()?;
    let conn: PgConnection = options.connect().await?;

    let label = format!(
        "{}@{}:{}/{}",
        config.user, config.host, config.port, config.database
    );
    Ok(Session::new(conn, label))
}
