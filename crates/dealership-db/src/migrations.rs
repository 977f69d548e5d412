use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, car catalog)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                first_name  TEXT NOT NULL DEFAULT '',
                last_name   TEXT NOT NULL DEFAULT '',
                email       TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE car_makes (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL
            );

            CREATE TABLE car_models (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                make_id     INTEGER NOT NULL REFERENCES car_makes(id) ON DELETE CASCADE,
                name        TEXT NOT NULL,
                type        TEXT NOT NULL DEFAULT 'SUV'
                            CHECK (type IN ('Sedan', 'SUV', 'Wagon')),
                year        INTEGER NOT NULL DEFAULT 2023
                            CHECK (year BETWEEN 2015 AND 2023),
                UNIQUE(make_id, name, year)
            );

            CREATE INDEX idx_car_models_make ON car_models(make_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
