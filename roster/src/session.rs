use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Single-owner handle to an open database connection.
///
/// Release it with [`Session::close`]. Once closed, every further call fails
/// with [`Error::InvalidSession`]. A session dropped without `close` still
/// shuts its socket.
pub struct Session {
    conn: Option<PgConnection>,
    label: String,
}

impl Session {
    pub(crate) fn new(conn: PgConnection, label: String) -> Self {
        Self {
            conn: Some(conn),
            label,
        }
    }

    /// `user@host:port/database` of the session, without the password.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Borrow the underlying connection for a statement.
    pub fn connection(&mut self) -> Result<&mut PgConnection> {
        self.conn.as_mut().ok_or(Error::InvalidSession)
    }

    /// Round-trip to the server to verify the session is still usable.
    pub async fn ping(&mut self) -> Result<()> {
        self.connection()?.ping().await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(Error::InvalidSession)?;
        conn.close().await?;
        debug!(session = %self.label, "Session closed");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.conn.is_some() {
            warn!(session = %self.label, "Session dropped without close");
        }
    }
}
