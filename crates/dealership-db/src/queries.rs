use crate::Database;
use crate::models::{CarListingRow, CreateUser, NewUser, UserRow};
use crate::seed;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode};
use tracing::info;

impl Database {
    // -- Users --

    /// Insert a user. A username collision, whether seen up front or raised by
    /// the UNIQUE constraint under a concurrent insert, comes back as
    /// `CreateUser::UsernameTaken`.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<CreateUser> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, email)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    user.username,
                    user.password_hash,
                    user.first_name,
                    user.last_name,
                    user.email,
                ),
            );

            match inserted {
                Ok(_) => Ok(CreateUser::Created(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(CreateUser::UsernameTaken)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Catalog --

    pub fn count_car_makes(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM car_makes", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Seed the catalog if it holds no makes. Returns true when this call did
    /// the seeding. The count and the inserts share one transaction under the
    /// connection lock, so concurrent first callers seed exactly once.
    pub fn ensure_catalog_seeded(&self) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let makes: i64 = tx.query_row("SELECT COUNT(*) FROM car_makes", [], |row| row.get(0))?;
            if makes > 0 {
                return Ok(false);
            }

            seed::populate(&tx)?;
            tx.commit()?;

            info!("Car catalog seeded");
            Ok(true)
        })
    }

    pub fn list_car_models(&self) -> Result<Vec<CarListingRow>> {
        self.with_conn(query_car_listing)
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password, first_name, last_name, email, created_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                email: row.get(5)?,
                created_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_car_listing(conn: &Connection) -> Result<Vec<CarListingRow>> {
    // Single JOIN instead of a make lookup per model
    let mut stmt = conn.prepare(
        "SELECT m.name, k.name
         FROM car_models m
         JOIN car_makes k ON m.make_id = k.id
         ORDER BY m.id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CarListingRow {
                model_name: row.get(0)?,
                make_name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
