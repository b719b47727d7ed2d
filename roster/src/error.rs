use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid port \"{0}\": expected an integer between 0 and 65535")]
    InvalidPort(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid session: connection already closed")]
    InvalidSession,

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_session_message() {
        assert_eq!(
            Error::InvalidSession.to_string(),
            "invalid session: connection already closed"
        );
    }

    #[test]
    fn database_message_carries_cause() {
        let err = Error::from(sqlx::Error::Protocol("unknown authentication method: 7".into()));
        assert!(err.to_string().contains("unknown authentication method: 7"));
    }

    #[test]
    fn invalid_port_message() {
        assert!(Error::InvalidPort("abc".into()).to_string().contains("\"abc\""));
    }
}
