use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, body::Bytes, extract::State};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use tracing::{debug, info};

use dealership_db::models::{CreateUser, NewUser, UserRow};
use dealership_types::api::{
    AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, STATUS_LOGGED_OUT,
};

use crate::AppState;
use crate::error::{ApiError, blocking, json_body};
use crate::middleware::RequestSession;
use crate::session::SESSION_COOKIE;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let LoginRequest { user_name, password } = json_body(&body)?;

    let db = state.clone();
    let username = user_name.clone();
    let user = blocking(move || verify_credentials(&db, &username, &password)).await?;

    let Some(user) = user else {
        info!("Login rejected for {}", user_name);
        return Ok((jar, Json(AuthResponse::unmatched(user_name))));
    };

    let (_, token) = state.sessions.establish(user.id, &user.username).await?;
    Ok((
        jar.add(session_cookie(token)),
        Json(AuthResponse::authenticated(user_name)),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(identity) = session.identity {
        state.sessions.revoke(identity.session_id).await;
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(LogoutResponse {
            status: STATUS_LOGGED_OUT,
        }),
    )
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let RegisterRequest {
        user_name,
        password,
        first_name,
        last_name,
        email,
    } = json_body(&body)?;
    if user_name.trim().is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("blank username or password".into()));
    }

    // Check if username is taken
    let db = state.clone();
    let username = user_name.clone();
    let existing = blocking(move || db.db.get_user_by_username(&username)).await?;
    if existing.is_some() {
        return Ok((jar, Json(AuthResponse::already_registered(user_name))));
    }
    debug!("{} is a new user", user_name);

    let db = state.clone();
    let username = user_name.clone();
    let created = blocking(move || {
        let password_hash = hash_password(&password)?;
        db.db.create_user(&NewUser {
            username: &username,
            password_hash: &password_hash,
            first_name: &first_name,
            last_name: &last_name,
            email: &email,
        })
    })
    .await?;

    // A concurrent registration can win between the check and the insert;
    // the UNIQUE constraint reports it here.
    let user_id = match created {
        CreateUser::Created(id) => id,
        CreateUser::UsernameTaken => {
            return Ok((jar, Json(AuthResponse::already_registered(user_name))));
        }
    };

    let (_, token) = state.sessions.establish(user_id, &user_name).await?;
    Ok((
        jar.add(session_cookie(token)),
        Json(AuthResponse::authenticated(user_name)),
    ))
}

/// Username + password to user, or `None` when either does not match.
fn verify_credentials(
    state: &AppState,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<UserRow>> {
    let Some(user) = state.db.get_user_by_username(username)? else {
        return Ok(None);
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("Corrupt password hash for {}: {}", user.username, e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(Some(user)),
        Err(_) => Ok(None),
    }
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    // Argon2id with a fresh salt
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
