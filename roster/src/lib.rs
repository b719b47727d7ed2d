//! Connect to PostgreSQL, make sure the `students` table exists, seed it with
//! sample rows, and read it back.

mod config;
mod connector;
mod error;
mod session;
mod students;
mod workflow;

pub use config::{
    ConnectionConfig, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USER,
};
pub use connector::{connect, establish};
pub use error::{Error, Result};
pub use session::Session;
pub use students::{ensure_schema, read_all, seed_data, SeedStudent, StudentRecord, SEED_STUDENTS};
pub use workflow::{run, Outcome};
