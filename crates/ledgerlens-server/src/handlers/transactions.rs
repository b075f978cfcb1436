//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::{AppError, AppState, Owner};
use ledgerlens_core::models::Transaction;
use ledgerlens_core::{ListQuery, TransactionInput, TransactionPatchInput};

/// CRUD response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    fn with_data(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
            count: None,
        }
    }
}

impl Envelope<()> {
    fn message_only(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            data: None,
            count: None,
        }
    }
}

/// Turn a body rejection into the standard 400 envelope
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(&rejection.body_text()))
}

/// Same as [`json_body`] for query strings (e.g. a repeated parameter)
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(query)| query)
        .map_err(|rejection| AppError::bad_request(&rejection.body_text()))
}

/// POST /api/transactions - Create a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Transaction>>), AppError> {
    let input = json_body(payload)?;
    let created = state.service.create(&owner.0, &input)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data("Transaction created successfully", created)),
    ))
}

/// GET /api/transactions - List transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Transaction>>>, AppError> {
    let filter = query_params(params)?.parse()?;
    let transactions = state.service.list(&owner.0, &filter)?;
    let count = transactions.len();

    Ok(Json(Envelope {
        count: Some(count),
        ..Envelope::with_data("Transactions retrieved successfully", transactions)
    }))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Transaction>>, AppError> {
    let transaction = state.service.get(&owner.0, &id)?;
    Ok(Json(Envelope::with_data(
        "Transaction retrieved successfully",
        transaction,
    )))
}

/// PUT /api/transactions/:id - Update the fields present in the body
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionPatchInput>, JsonRejection>,
) -> Result<Json<Envelope<Transaction>>, AppError> {
    let patch = json_body(payload)?;
    let updated = state.service.update(&owner.0, &id, &patch)?;
    Ok(Json(Envelope::with_data(
        "Transaction updated successfully",
        updated,
    )))
}

/// DELETE /api/transactions/:id - Permanently delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, AppError> {
    state.service.delete(&owner.0, &id)?;
    Ok(Json(Envelope::message_only("Transaction deleted successfully")))
}
