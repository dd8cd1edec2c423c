// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the REST API.
//!
//! Handles FAQ management, CRM lookup, the popular-search ranking, and the
//! health endpoint. Validation failures map to 400, missing lookups on the
//! CRM route to 404; FAQ update/delete of an unknown id also maps to 400.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crewdesk_core::types::{FaqPatch, NewFaq};
use crewdesk_core::CrewdeskError;

use crate::server::AppState;

/// Number of popular-search entries returned when no limit is given.
const DEFAULT_POPULAR_LIMIT: usize = 5;

/// Request body for POST /api/faqs. Fields validated by hand so a missing
/// question or answer yields a clean 400 rather than a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqBody {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Query parameters for GET /api/popular-searches.
#[derive(Debug, Deserialize)]
pub struct PopularSearchQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn internal_error(e: CrewdeskError) -> Response {
    tracing::error!(error = %e, "request handling failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// GET /api/faqs
///
/// Lists every FAQ, enabled or not, in creation order. An optional
/// `language` query narrows to entries for that language (entries with no
/// language always match).
pub async fn get_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqListQuery>,
) -> Response {
    match state.store.get_faqs(query.language.as_deref()).await {
        Ok(faqs) => (StatusCode::OK, Json(faqs)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Query parameters for GET /api/faqs.
#[derive(Debug, Deserialize)]
pub struct FaqListQuery {
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /api/faqs
///
/// Creates a FAQ. `question` and `answer` are required and must be
/// non-empty; new entries are always enabled.
pub async fn post_faq(State(state): State<AppState>, Json(body): Json<CreateFaqBody>) -> Response {
    let question = body.question.unwrap_or_default();
    let answer = body.answer.unwrap_or_default();
    if question.trim().is_empty() || answer.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "question and answer are required",
        );
    }

    let new_faq = NewFaq {
        question,
        answer,
        language: body.language,
        category: body.category,
    };
    match state.store.create_faq(new_faq).await {
        Ok(faq) => (StatusCode::CREATED, Json(faq)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// PATCH /api/faqs/{id}
///
/// Applies a partial update. An unknown id is a client error (400), not a
/// 404, matching what the browser client expects.
pub async fn patch_faq(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<FaqPatch>,
) -> Response {
    match state.store.update_faq(id, patch).await {
        Ok(faq) => (StatusCode::OK, Json(faq)).into_response(),
        Err(e @ CrewdeskError::NotFound { .. }) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/faqs/{id}
///
/// Idempotent: deleting an unknown id still returns 204.
pub async fn delete_faq(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.store.delete_faq(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/crm/{customerId}
pub async fn get_crm_record(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Response {
    match state.store.get_crm_record(&customer_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("no CRM record for customer {customer_id}"),
        ),
        Err(e) => internal_error(e),
    }
}

/// GET /api/popular-searches
///
/// Returns the ranking ordered by count descending, default limit 5.
pub async fn get_popular_searches(
    State(state): State<AppState>,
    Query(query): Query<PopularSearchQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    match state.store.get_popular_searches(limit).await {
        Ok(searches) => (StatusCode::OK, Json(searches)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
