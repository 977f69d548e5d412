use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::session::{Identity, SESSION_COOKIE};

/// Per-request authentication context. Anonymous requests carry `None`.
#[derive(Debug, Clone, Default)]
pub struct RequestSession {
    pub identity: Option<Identity>,
}

/// Resolve the session token, from the Authorization header or the session
/// cookie, and attach the outcome to the request. A bearer token that does
/// not resolve falls back to the cookie. Never rejects: handlers decide what
/// an anonymous caller may do.
pub async fn attach_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut identity = match bearer_token(req.headers()) {
        Some(token) => state.sessions.resolve(&token).await,
        None => None,
    };
    if identity.is_none() {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            identity = state.sessions.resolve(cookie.value()).await;
        }
    }

    req.extensions_mut().insert(RequestSession { identity });
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use axum::http::header;
    use serde_json::json;

    use crate::test_support::{TestApp, post_json};

    #[tokio::test]
    async fn stale_bearer_token_falls_back_to_cookie() {
        let app = TestApp::new();
        let cookie = app.signed_in_cookie("ada").await;

        let mut req = post_json("/review", json!({ "review": "Great" }), Some(&cookie));
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer garbage".parse().unwrap());
        let resp = app.send(req).await;

        assert_eq!(resp.body, json!({ "status": 200 }));
        assert_eq!(app.dealers.submitted().len(), 1);
    }

    #[tokio::test]
    async fn stale_bearer_token_alone_is_anonymous() {
        let app = TestApp::new();

        let mut req = post_json("/review", json!({ "review": "Great" }), None);
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer garbage".parse().unwrap());
        let resp = app.send(req).await;

        assert_eq!(resp.body, json!({ "status": 403, "message": "Unauthorized" }));
    }
}
