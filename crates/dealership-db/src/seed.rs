use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::debug;

use crate::models::CarType;

pub struct SeedMake {
    pub name: &'static str,
    pub description: &'static str,
    pub models: &'static [(&'static str, CarType, u16)],
}

pub const SEED_MAKES: &[SeedMake] = &[
    SeedMake {
        name: "NISSAN",
        description: "Great cars. Japanese technology",
        models: &[
            ("Pathfinder", CarType::Suv, 2023),
            ("Qashqai", CarType::Suv, 2023),
            ("XTRAIL", CarType::Suv, 2023),
        ],
    },
    SeedMake {
        name: "Mercedes",
        description: "Great cars. German technology",
        models: &[
            ("A-Class", CarType::Suv, 2023),
            ("C-Class", CarType::Suv, 2023),
            ("E-Class", CarType::Suv, 2023),
        ],
    },
    SeedMake {
        name: "Audi",
        description: "Great cars. German technology",
        models: &[
            ("A4", CarType::Suv, 2023),
            ("A5", CarType::Suv, 2023),
            ("A6", CarType::Suv, 2023),
        ],
    },
    SeedMake {
        name: "Kia",
        description: "Great cars. Korean technology",
        models: &[
            ("Sorrento", CarType::Suv, 2023),
            ("Carnival", CarType::Suv, 2023),
            ("Cerato", CarType::Sedan, 2023),
        ],
    },
    SeedMake {
        name: "Toyota",
        description: "Great cars. Japanese technology",
        models: &[
            ("Corolla", CarType::Sedan, 2023),
            ("Camry", CarType::Sedan, 2023),
            ("Kluger", CarType::Suv, 2023),
        ],
    },
];

/// Insert the fixed catalog. Every insert is `OR IGNORE` against the unique
/// keys, so running this over a partially seeded catalog fills the gaps.
pub fn populate(conn: &Connection) -> Result<()> {
    for make in SEED_MAKES {
        conn.execute(
            "INSERT OR IGNORE INTO car_makes (name, description) VALUES (?1, ?2)",
            (make.name, make.description),
        )?;

        let make_id: i64 = conn
            .query_row("SELECT id FROM car_makes WHERE name = ?1", [make.name], |row| {
                row.get(0)
            })
            .map_err(|e| anyhow!("Seeded make {} not found: {}", make.name, e))?;

        for &(name, car_type, year) in make.models {
            conn.execute(
                "INSERT OR IGNORE INTO car_models (make_id, name, type, year) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![make_id, name, car_type.as_str(), year],
            )?;
        }

        debug!("Seeded make {} with {} models", make.name, make.models.len());
    }

    Ok(())
}
