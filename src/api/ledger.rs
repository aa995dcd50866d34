//! Ledger route handlers.

use crate::{
    api::{AppState, actor::Actor},
    core::{
        ledger,
        summary::{self, LedgerQuery},
        validation::NewPaymentRequest,
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Optional body of a soft delete request.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePaymentRequest {
    /// Why the entry is being removed
    pub reason: Option<String>,
}

fn path_id(path: std::result::Result<Path<i64>, PathRejection>, field: &str) -> Result<i64> {
    path.map(|Path(id)| id)
        .map_err(|rejection| Error::invalid_field(field, rejection.body_text()))
}

/// The body is optional, but one that is present must be a valid [`DeletePaymentRequest`].
fn delete_reason(body: &[u8]) -> Result<Option<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<DeletePaymentRequest>(body)
        .map(|request| request.reason)
        .map_err(|e| Error::invalid_field("body", format!("Invalid delete request: {e}")))
}

/// `POST /booking-ledger`
pub async fn create_payment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    payload: std::result::Result<Json<NewPaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(request) =
        payload.map_err(|rejection| Error::invalid_field("body", rejection.body_text()))?;

    let entry = ledger::create_payment(&state.database, &request, &actor, &state.ledger).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Payment recorded successfully",
            "data": entry,
        })),
    ))
}

/// `GET /booking-ledger/client/:clientId`
pub async fn list_payments(
    State(state): State<AppState>,
    _actor: Actor,
    path: std::result::Result<Path<i64>, PathRejection>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Value>> {
    let booking_id = path_id(path, "clientId")?;
    let (filter, page) = query.into_filter(booking_id, &state.ledger)?;

    let listing = summary::list_payments(&state.database, &filter, page).await?;

    Ok(Json(json!({
        "success": true,
        "data": listing.entries,
        "pagination": {
            "total": listing.total,
            "totalPages": listing.total_pages,
            "currentPage": listing.page,
            "limit": listing.limit,
        },
        "summary": listing.summary,
    })))
}

/// `GET /booking-ledger/:id`
pub async fn get_payment(
    State(state): State<AppState>,
    _actor: Actor,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let id = path_id(path, "id")?;
    let entry = ledger::get_payment_by_id(&state.database, id)
        .await?
        .ok_or(Error::PaymentNotFound { id })?;

    Ok(Json(json!({ "success": true, "data": entry })))
}

/// `DELETE /booking-ledger/:id`
pub async fn delete_payment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    path: std::result::Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>> {
    let id = path_id(path, "id")?;
    let reason = delete_reason(&body)?;

    let entry = ledger::soft_delete_payment(&state.database, id, &actor, reason).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment deleted successfully",
        "data": entry,
    })))
}

/// `PATCH /booking-ledger/:id/restore`
pub async fn restore_payment(
    State(state): State<AppState>,
    _actor: Actor,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let id = path_id(path, "id")?;
    let entry = ledger::restore_payment(&state.database, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment restored successfully",
        "data": entry,
    })))
}
