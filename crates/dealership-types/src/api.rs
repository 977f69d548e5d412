use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Dealer, Review};

pub const STATUS_AUTHENTICATED: &str = "Authenticated";
pub const STATUS_LOGGED_OUT: &str = "logged out";
pub const ERROR_ALREADY_REGISTERED: &str = "Already Registered";

// -- Session token claims --

/// Claims carried by the signed session token. `sid` names the live session
/// in the session registry; a token whose `sid` was revoked is anonymous even
/// when its signature and expiry still check out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub sid: Uuid,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Body shared by login and registration. A login without `status` means the
/// credentials did not match.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl AuthResponse {
    pub fn authenticated(user_name: String) -> Self {
        Self {
            user_name,
            status: Some(STATUS_AUTHENTICATED),
            error: None,
        }
    }

    pub fn unmatched(user_name: String) -> Self {
        Self {
            user_name,
            status: None,
            error: None,
        }
    }

    pub fn already_registered(user_name: String) -> Self {
        Self {
            user_name,
            status: None,
            error: Some(ERROR_ALREADY_REGISTERED),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
}

// -- Catalog --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarEntry {
    #[serde(rename = "CarModel")]
    pub car_model: String,
    #[serde(rename = "CarMake")]
    pub car_make: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarsResponse {
    #[serde(rename = "CarModels")]
    pub car_models: Vec<CarEntry>,
}

// -- Dealers and reviews --

#[derive(Debug, Serialize)]
pub struct DealersResponse {
    pub status: u16,
    pub dealers: Vec<Dealer>,
}

#[derive(Debug, Serialize)]
pub struct DealerResponse {
    pub status: u16,
    pub dealer: Dealer,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub status: u16,
    pub reviews: Vec<Review>,
}

/// Envelope for outcomes that carry only an internal status code and an
/// optional message, e.g. `{status: 400, message: "Bad Request"}`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            message: None,
        }
    }

    pub fn with_message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
