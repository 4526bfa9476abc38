//! Account routes
//!
//! Registration and authentication answer with `{success, message, jwt}`.
//! Collection routes require a bearer token issued by those two.
//!
//! Paths keep the trailing slash the web client uses.

use crate::auth::AuthUser;
use crate::error::{AccountError, ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use movie_accounts_shared::{
    AccountDetails, AuthRequest, AuthResponse, CollectionRequest, CollectionResponse, Identity,
    Movie, RegisterRequest,
};
use secrecy::ExposeSecret;
use tracing::info;

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/account/", get(account_details))
        .route("/api/account/register/", post(register))
        .route("/api/account/authenticate/", post(authenticate))
        .route("/api/account/favorites/", get(favorites))
        .route("/api/account/watchlist/", get(watchlist))
        .route("/api/account/save-to-collection/", post(save_to_collection))
        .route("/api/account/remove-from-collection/", post(remove_from_collection))
}

fn classify(context: &'static str) -> impl Fn(AccountError) -> ApiError {
    move |err| ApiError::from_account(err, context)
}

/// Register a new user
///
/// POST /api/account/register/
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;

    let user = state
        .accounts()
        .register(&req.name, &req.email, req.password.expose_secret())
        .await
        .map_err(classify("Failed to register user"))?;

    let jwt = state
        .jwt()
        .issue(&Identity::from(&user))
        .map_err(classify("Failed to issue token for registered user"))?;

    info!(user_id = user.id, "Successfully registered user");
    Ok(Json(AuthResponse::success("User registered successfully", jwt)))
}

/// Authenticate with email and password
///
/// POST /api/account/authenticate/
async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;

    let user = state
        .accounts()
        .authenticate(&req.email, req.password.expose_secret())
        .await
        .map_err(classify("Failed to authenticate user"))?;

    let jwt = state
        .jwt()
        .issue(&Identity::from(&user))
        .map_err(classify("Failed to issue token for authenticated user"))?;

    info!(user_id = user.id, "Successfully authenticated user");
    Ok(Json(AuthResponse::success("User authenticated successfully", jwt)))
}

/// Current user's profile with both collections
///
/// GET /api/account/
async fn account_details(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<AccountDetails>> {
    let details = state
        .accounts()
        .account_details(&auth_user.identity.email)
        .await
        .map_err(classify("Failed to fetch account details"))?;
    Ok(Json(details))
}

/// GET /api/account/favorites/
async fn favorites(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<Vec<Movie>>> {
    let details = state
        .accounts()
        .account_details(&auth_user.identity.email)
        .await
        .map_err(classify("Failed to fetch favorites"))?;
    Ok(Json(details.favorites))
}

/// GET /api/account/watchlist/
async fn watchlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<Vec<Movie>>> {
    let details = state
        .accounts()
        .account_details(&auth_user.identity.email)
        .await
        .map_err(classify("Failed to fetch watchlist"))?;
    Ok(Json(details.watchlist))
}

/// Add a movie to the favorites or the watchlist
///
/// POST /api/account/save-to-collection/
async fn save_to_collection(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<CollectionRequest>, JsonRejection>,
) -> ApiResult<Json<CollectionResponse>> {
    let Json(req) = payload?;

    state
        .accounts()
        .save_collection(auth_user.identity, req.movie_id, &req.collection)
        .await
        .map_err(classify("Failed to save to collection"))?;

    Ok(Json(CollectionResponse {
        success: true,
        message: format!("Movie saved to {}", req.collection),
    }))
}

/// Remove a movie from the favorites or the watchlist
///
/// POST /api/account/remove-from-collection/
async fn remove_from_collection(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<CollectionRequest>, JsonRejection>,
) -> ApiResult<Json<CollectionResponse>> {
    let Json(req) = payload?;

    state
        .accounts()
        .remove_from_collection(auth_user.identity, req.movie_id, &req.collection)
        .await
        .map_err(classify("Failed to remove from collection"))?;

    Ok(Json(CollectionResponse {
        success: true,
        message: format!("Movie removed from {}", req.collection),
    }))
}
