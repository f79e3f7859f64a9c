// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP transport for the authorization service.
//!
//! ## Endpoints
//!
//! - `POST /reset` - Reset an account to the default balance
//! - `POST /charge` - Charge an account
//!
//! ## Example Usage
//!
//! ```bash
//! # Reset the default account
//! curl -X POST http://localhost:3000/reset
//!
//! # Charge 25 to alice
//! curl -X POST http://localhost:3000/charge \
//!   -H "Content-Type: application/json" \
//!   -d '{"account": "alice", "charges": 25}'
//! ```
//!
//! Insufficient funds is answered with `200` and `isAuthorized: false`.
//! Only store failures produce a `500`.

use crate::base::AccountId;
use crate::charge::ChargeResult;
use crate::error::ServiceError;
use crate::service::AuthorizationService;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Amount charged when a request does not say.
pub const DEFAULT_CHARGE: i64 = 10;

// === Request/Response DTOs ===

/// Request body for `POST /reset`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub account: Option<String>,
}

impl ResetRequest {
    fn account(&self) -> AccountId {
        self.account.as_deref().map(AccountId::from).unwrap_or_default()
    }
}

/// Request body for `POST /charge`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChargeRequest {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub charges: Option<i64>,
}

impl ChargeRequest {
    fn account(&self) -> AccountId {
        self.account.as_deref().map(AccountId::from).unwrap_or_default()
    }

    fn charges(&self) -> i64 {
        self.charges.unwrap_or(DEFAULT_CHARGE)
    }
}

/// Response body for errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// === Application State ===

/// Shared application state containing the authorization service.
#[derive(Clone)]
pub struct AppState {
    pub service: AuthorizationService,
}

// === Error Handling ===

/// Errors converted into HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The service failed; answered with `500`.
    Service(ServiceError),
    /// The body was not valid JSON for the endpoint; answered with `400`.
    BadRequest(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Service(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Parses a JSON body, treating an empty body or `null` as all defaults.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|err| AppError::BadRequest(format!("invalid request body: {err}")))
}

// === Handlers ===

/// POST /reset - Reset an account to the default balance.
async fn reset(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, AppError> {
    let account = parse_body::<ResetRequest>(&body)?.account();

    state.service.reset(&account).await.inspect_err(|err| {
        tracing::error!(%account, error = %err, "error while resetting account");
    })?;

    tracing::info!(%account, "successfully reset account");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /charge - Charge an account.
async fn charge(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChargeResult>, AppError> {
    let request = parse_body::<ChargeRequest>(&body)?;
    let account = request.account();
    let amount = request.charges();

    let result = state
        .service
        .charge(&account, amount)
        .await
        .inspect_err(|err| {
            tracing::error!(%account, amount, error = %err, "error while charging account");
        })?;

    if result.is_authorized {
        tracing::info!(
            %account,
            amount,
            remaining = result.remaining_balance,
            "authorized and charged account"
        );
    } else {
        tracing::info!(%account, amount, "charge not authorized");
    }
    Ok(Json(result))
}

// === Router ===

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reset", post(reset))
        .route("/charge", post(charge))
        .with_state(state)
}
