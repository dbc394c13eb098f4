use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel::prelude::*;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        student_number TEXT NOT NULL,
        gender TEXT,
        interested_in TEXT,
        whatsapp TEXT NOT NULL,
        looking_for TEXT,
        about_me TEXT
    );
    CREATE TABLE IF NOT EXISTS matches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        candidate_id INTEGER NOT NULL,
        score REAL NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// Opens a pool on the SQLite file at `database_url` and creates the tables
/// if they are missing.
pub fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(4)
        .test_on_check_out(true)
        .build(manager)?;

    let mut conn = pool.get()?;
    ensure_schema(&mut conn)?;

    tracing::info!(database_url, "database connection pool created");
    Ok(pool)
}

pub fn ensure_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA)
}

/// Cheap round trip used by the health endpoints.
pub fn ping(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    diesel::sql_query("SELECT 1").execute(&mut conn)?;
    Ok(())
}
