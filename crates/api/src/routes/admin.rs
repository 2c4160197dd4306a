//! Administrative credit override routes.
//!
//! Operator tooling corrects or tops up accounts here; these operations
//! bypass the quota caps by design and are gated on the administrative role.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, error_response, middleware::AuthUser};
use hireflow_db::{CreditsError, CreditsRepository};
use hireflow_shared::AppError;

/// Creates the admin routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/credits/ranking", get(get_ranking))
        .route("/admin/credits/{user_id}/grant", post(grant_credits))
        .route("/admin/credits/{user_id}/balance", put(set_balance))
}

/// Request body carrying a credit amount.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Credits to grant, or the balance to set.
    pub amount: i64,
}

/// Rejects callers without the administrative role.
fn require_admin(auth: &AuthUser) -> Result<(), Response> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(error_response(&AppError::Forbidden(
            "administrative role required".into(),
        )))
    }
}

/// Maps a repository failure on an admin write to a response.
fn admin_write_error(error: &CreditsError, action: &str) -> Response {
    match error {
        CreditsError::Validation(e) => error_response(&AppError::Validation(e.to_string())),
        CreditsError::Database(e) => {
            error!(error = %e, "Failed to {action} credits");
            error_response(&AppError::Database(format!("failed to {action} credits")))
        }
        CreditsError::AccountUnavailable(_) => {
            error!(error = %error, "Failed to {action} credits");
            error_response(&AppError::Internal(format!("failed to {action} credits")))
        }
    }
}

/// POST `/admin/credits/{user_id}/grant` - Add credits to an account.
async fn grant_credits(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = CreditsRepository::new((*state.db).clone());

    match repo.grant(user_id, request.amount).await {
        Ok(account) => {
            info!(
                admin = %auth.user_id(),
                user_id = %user_id,
                amount = request.amount,
                "Admin granted credits"
            );
            (
                StatusCode::OK,
                Json(json!({ "user_id": user_id, "balance": account.balance })),
            )
                .into_response()
        }
        Err(e) => admin_write_error(&e, "grant"),
    }
}

/// PUT `/admin/credits/{user_id}/balance` - Overwrite an account's balance.
async fn set_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AmountRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = CreditsRepository::new((*state.db).clone());

    match repo.set_balance(user_id, request.amount).await {
        Ok(account) => {
            info!(
                admin = %auth.user_id(),
                user_id = %user_id,
                amount = request.amount,
                "Admin set credit balance"
            );
            (
                StatusCode::OK,
                Json(json!({ "user_id": user_id, "balance": account.balance })),
            )
                .into_response()
        }
        Err(e) => admin_write_error(&e, "set"),
    }
}

/// GET `/admin/credits/ranking` - All accounts by descending balance.
async fn get_ranking(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = CreditsRepository::new((*state.db).clone());

    match repo.ranking().await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read credit ranking");
            error_response(&AppError::Database("failed to read credit ranking".into()))
        }
    }
}
