//! Database row types: these map directly to SQLite rows.
//! Distinct from dealership-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

/// Insert payload for a user. `password_hash` must already be a PHC string.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateUser {
    Created(i64),
    UsernameTaken,
}

/// One row of the model/make join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarListingRow {
    pub model_name: String,
    pub make_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarType {
    Sedan,
    Suv,
    Wagon,
}

impl CarType {
    pub fn as_str(self) -> &'static str {
        match self {
            CarType::Sedan => "Sedan",
            CarType::Suv => "SUV",
            CarType::Wagon => "Wagon",
        }
    }
}
