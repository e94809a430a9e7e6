use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        dto::{LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest},
        extractors::AuthUser,
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::NewUser,
        session::SessionKeys,
    },
    error::{ApiError, ApiJson, ApiResult},
    state::AppState,
    store::StoreError,
};

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.name = payload.name.trim().to_string();

    if payload.name.is_empty() {
        return Err(ApiError::BadRequest("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".into()));
    }

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::BadRequest(USER_EXISTS.into()));
    }

    let password_hash = hash_password_blocking(payload.password).await?;

    // A concurrent registration can still win the race past the lookup above.
    let user = match state
        .users
        .insert(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::Conflict(_)) => return Err(ApiError::BadRequest(USER_EXISTS.into())),
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    payload.email = payload.email.trim().to_lowercase();

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let keys = SessionKeys::new(&state.config.jwt);
    let token = keys.sign(user.id)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token, keys.ttl, state.config.production)?,
    );

    info!(user_id = %user.id, "user logged in");
    Ok((
        headers,
        Json(LoginResponse {
            message: "Login successful".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = state.users.find_by_id(claims.sub).await?;
    if user.is_none() {
        warn!(user_id = %claims.sub, "token refers to unknown user");
    }
    Ok(Json(MeResponse { user }))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        clear_session_cookie(state.config.production),
    );
    (headers, Json(MessageResponse::new("Logged out successfully")))
}
