use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use dealership_types::api::{DealerResponse, DealersResponse, StatusResponse};

use crate::AppState;
use crate::error::{ApiError, BAD_REQUEST_MESSAGE};

/// State filter value that selects every dealer.
pub const ALL_STATES: &str = "All";

pub async fn list_dealers(State(state): State<AppState>) -> Result<Json<DealersResponse>, ApiError> {
    fetch_dealer_list(&state, ALL_STATES).await
}

pub async fn list_dealers_in_state(
    State(state): State<AppState>,
    Path(filter): Path<String>,
) -> Result<Json<DealersResponse>, ApiError> {
    fetch_dealer_list(&state, &filter).await
}

async fn fetch_dealer_list(state: &AppState, filter: &str) -> Result<Json<DealersResponse>, ApiError> {
    let dealers = if filter == ALL_STATES {
        state.dealers.fetch_dealers().await?
    } else {
        state.dealers.fetch_dealers_by_state(filter).await?
    };

    Ok(Json(DealersResponse {
        status: 200,
        dealers,
    }))
}

pub async fn get_dealer(
    State(state): State<AppState>,
    Path(dealer_id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(dealer_id) = parse_dealer_id(&dealer_id) else {
        return Ok(bad_request());
    };

    let dealer = state.dealers.fetch_dealer(dealer_id).await?;
    Ok(Json(DealerResponse {
        status: 200,
        dealer,
    })
    .into_response())
}

/// Dealer ids must be positive integers. Zero counts as absent.
pub(crate) fn parse_dealer_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

pub(crate) fn bad_request() -> Response {
    Json(StatusResponse::with_message(400, BAD_REQUEST_MESSAGE)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeDealers, TestApp, get};
    use serde_json::json;

    #[test]
    fn dealer_id_must_be_a_positive_integer() {
        assert_eq!(parse_dealer_id("15"), Some(15));
        assert_eq!(parse_dealer_id("0"), None);
        assert_eq!(parse_dealer_id("-3"), None);
        assert_eq!(parse_dealer_id("abc"), None);
        assert_eq!(parse_dealer_id(""), None);
    }

    #[tokio::test]
    async fn lists_all_dealers_without_filter() {
        let app = TestApp::new();
        let resp = app.send(get("/dealers", None)).await;

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["status"], 200);
        assert_eq!(resp.body["dealers"].as_array().unwrap().len(), 2);
        assert_eq!(app.dealers.state_filters(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn all_sentinel_matches_unfiltered_listing() {
        let app = TestApp::new();
        let resp = app.send(get("/dealers/All", None)).await;

        assert_eq!(resp.body["dealers"].as_array().unwrap().len(), 2);
        assert!(app.dealers.state_filters().is_empty());
    }

    #[tokio::test]
    async fn state_filter_is_passed_through() {
        let app = TestApp::new();
        let resp = app.send(get("/dealers/Kansas", None)).await;

        let dealers = resp.body["dealers"].as_array().unwrap();
        assert_eq!(dealers.len(), 1);
        assert_eq!(dealers[0]["state"], "Kansas");
        assert_eq!(app.dealers.state_filters(), vec!["Kansas".to_string()]);
    }

    #[tokio::test]
    async fn dealer_detail_wraps_the_dealer() {
        let app = TestApp::new();
        let resp = app.send(get("/dealer/2", None)).await;

        assert_eq!(resp.body["status"], 200);
        assert_eq!(resp.body["dealer"]["id"], 2);
        assert_eq!(resp.body["dealer"]["city"], "Topeka");
    }

    #[tokio::test]
    async fn falsy_dealer_id_is_rejected_without_remote_call() {
        let app = TestApp::new();
        for uri in ["/dealer/0", "/dealer/-3", "/dealer/abc"] {
            let resp = app.send(get(uri, None)).await;
            assert_eq!(resp.status, 200);
            assert_eq!(resp.body, json!({ "status": 400, "message": "Bad Request" }));
        }
        assert_eq!(app.dealers.calls(), 0);
    }

    #[tokio::test]
    async fn dealer_service_failure_is_a_bad_gateway() {
        let app = TestApp::with_dealers(FakeDealers {
            unavailable: true,
            ..FakeDealers::default()
        });
        let resp = app.send(get("/dealers", None)).await;

        assert_eq!(resp.status, 502);
        assert_eq!(resp.body["status"], 502);
    }
}
