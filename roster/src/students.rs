use serde::{Deserialize, Serialize};
use sqlx::{Connection, Postgres, QueryBuilder};
use std::fmt;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::Session;

const CREATE_STUDENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100),
        age INTEGER,
        grade VARCHAR(10),
        CONSTRAINT students_name_age_grade_key UNIQUE (name, age, grade)
    )
"#;

const SELECT_STUDENTS: &str = "SELECT id, name, age, grade FROM students";

/// One row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentRecord {
    pub id: i32,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub grade: Option<String>,
}

impl fmt::Display for StudentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn text(value: &Option<String>) -> String {
            match value {
                Some(s) => format!("'{}'", s),
                None => "None".to_string(),
            }
        }

        let age = match self.age {
            Some(age) => age.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "({}, {}, {}, {})",
            self.id,
            text(&self.name),
            age,
            text(&self.grade)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStudent {
    pub name: &'static str,
    pub age: i32,
    pub grade: &'static str,
}

pub const SEED_STUDENTS: &[SeedStudent] = &[
    SeedStudent { name: "Alice", age: 20, grade: "A" },
    SeedStudent { name: "Bob", age: 22, grade: "B" },
    SeedStudent { name: "Charlie", age: 19, grade: "A" },
];

fn seed_query() -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("INSERT INTO students (name, age, grade) ");
    builder.push_values(SEED_STUDENTS.iter(), |mut row, student| {
        row.push_bind(student.name)
            .push_bind(student.age)
            .push_bind(student.grade);
    });
    builder.push(" ON CONFLICT DO NOTHING");
    builder
}

/// Create the `students` table if it does not exist yet.
pub async fn ensure_schema(session: &mut Session) -> Result<()> {
    let mut tx = session.connection()?.begin().await?;
    sqlx::query(CREATE_STUDENTS_TABLE).execute(&mut *tx).await?;
    tx.commit().await?;

    info!("Table 'students' created.");
    Ok(())
}

/// Insert the sample rows, skipping any that already exist.
///
/// Returns the number of rows actually inserted.
pub async fn seed_data(session: &mut Session) -> Result<u64> {
    let mut tx = session.connection()?.begin().await?;
    let result = seed_query().build().execute(&mut *tx).await?;
    tx.commit().await?;

    let inserted = result.rows_affected();
    info!(
        rows = inserted,
        skipped = (SEED_STUDENTS.len() as u64).saturating_sub(inserted),
        "Sample data inserted."
    );
    Ok(inserted)
}

/// Full scan of `students`, in whatever order the server returns.
pub async fn read_all(session: &mut Session) -> Result<Vec<StudentRecord>> {
    let rows = sqlx::query_as::<_, StudentRecord>(SELECT_STUDENTS)
        .fetch_all(session.connection()?)
        .await?;

    debug!(rows = rows.len(), "Read students table");
    Ok(rows)
}
