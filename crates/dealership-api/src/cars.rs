use axum::{Json, extract::State};

use dealership_types::api::{CarEntry, CarsResponse};

use crate::AppState;
use crate::error::{ApiError, blocking};

/// GET /cars: every model paired with its make, seeding the catalog on the
/// first call against an empty store.
pub async fn list_cars(State(state): State<AppState>) -> Result<Json<CarsResponse>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || {
        if db.db.count_car_makes()? == 0 {
            db.db.ensure_catalog_seeded()?;
        }
        db.db.list_car_models()
    })
    .await?;

    let car_models = rows
        .into_iter()
        .map(|row| CarEntry {
            car_model: row.model_name,
            car_make: row.make_name,
        })
        .collect();

    Ok(Json(CarsResponse { car_models }))
}
