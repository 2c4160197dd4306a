//! Credits ledger routes for metered-operation callers.
//!
//! The metered features (interview analysis, transcription, parsers) call
//! `check` before doing expensive work and `spend` once the work has been
//! performed; account screens poll `status`.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, error_response, middleware::AuthUser};
use hireflow_core::credits::{DenialReason, OperationKind};
use hireflow_db::{CreditsError, CreditsRepository};
use hireflow_shared::AppError;

/// Creates the credits routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credits/status", get(get_status))
        .route("/credits/check", post(check_operation))
        .route("/credits/spend", post(spend_operation))
}

/// Request body naming a metered operation.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    /// The metered operation to check or spend for.
    pub operation: OperationKind,
}

/// GET `/credits/status` - Own-account balance and window usage.
async fn get_status(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = CreditsRepository::new((*state.db).clone());

    match repo.status(auth.user_id()).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read credit status");
            error_response(&AppError::Database("failed to read credit status".into()))
        }
    }
}

/// POST `/credits/check` - Advisory decision for a metered operation.
///
/// Denials are data, not errors: the response is `200` with `allowed=false`
/// and a reason code.
async fn check_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<OperationRequest>,
) -> impl IntoResponse {
    let repo = CreditsRepository::new((*state.db).clone());

    match repo.check(auth.user_id(), request.operation).await {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to check credits");
            error_response(&AppError::Database("failed to check credits".into()))
        }
    }
}

/// POST `/credits/spend` - Deduct the cost of a metered operation.
///
/// A denied spend answers `402` with the same reason codes as `check`; the
/// caller must not treat the metered operation as performed.
async fn spend_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<OperationRequest>,
) -> impl IntoResponse {
    let repo = CreditsRepository::new((*state.db).clone());

    match repo.spend(auth.user_id(), request.operation).await {
        Ok(outcome) if outcome.success => {
            (StatusCode::OK, Json(json!({ "success": true }))).into_response()
        }
        Ok(outcome) => {
            let reason = outcome.reason.map_or("denied", DenialReason::code);
            (
                StatusCode::PAYMENT_REQUIRED,
                Json(json!({ "success": false, "reason": reason })),
            )
                .into_response()
        }
        Err(CreditsError::Database(e)) => {
            error!(error = %e, "Failed to spend credits");
            error_response(&AppError::Database("failed to spend credits".into()))
        }
        Err(e) => {
            error!(error = %e, "Credit deduction failed");
            error_response(&AppError::Internal("credit deduction failed".into()))
        }
    }
}
