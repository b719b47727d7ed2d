use std::io::Write;
use tracing::warn;

use crate::config::ConnectionConfig;
use crate::connector::establish;
use crate::error::Result;
use crate::session::Session;
use crate::students::{ensure_schema, read_all, seed_data, StudentRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every step ran; holds the rows read back.
    Completed(Vec<StudentRecord>),
    /// The session could not be established; nothing else ran.
    Unavailable,
}

/// Connect, create the table, seed it, and print its contents to `out`.
///
/// The session is closed on every path once it has been opened.
pub async fn run<W: Write>(config: &ConnectionConfig, out: &mut W) -> Result<Outcome> {
    let mut session = match establish(config).await {
        Ok(session) => session,
        Err(e) => {
            writeln!(out, "Error connecting to the database: {}", e)?;
            return Ok(Outcome::Unavailable);
        }
    };

    writeln!(out, "Connection successful.")?;

    let result = populate(&mut session, out).await;
    let closed = session.close().await;

    match (result, closed) {
        (Ok(rows), Ok(())) => Ok(Outcome::Completed(rows)),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), close_result) => {
            if let Err(close_err) = close_result {
                warn!(error = %close_err, "Failed to close session after error");
            }
            Err(e)
        }
    }
}

async fn populate<W: Write>(session: &mut Session, out: &mut W) -> Result<Vec<StudentRecord>> {
    ensure_schema(session).await?;
    writeln!(out, "Table 'students' created.")?;

    seed_data(session).await?;
    writeln!(out, "Sample data inserted.")?;

    let rows = read_all(session).await?;
    writeln!(out, "Data from students table:")?;
    for row in &rows {
        writeln!(out, "{}", row)?;
    }

    Ok(rows)
}
