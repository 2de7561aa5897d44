//! Invoice handlers. Items are read and written as part of their invoice.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use castdb_domain::{Invoice, InvoiceId};
use uuid::Uuid;

use super::{created, ApiError};
use crate::app::App;
use crate::use_cases::management::InvoiceInput;

pub(super) async fn list(State(app): State<Arc<App>>) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(app.use_cases.management.invoice.list().await?))
}

pub(super) async fn get(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app
        .use_cases
        .management
        .invoice
        .get(InvoiceId::from_uuid(id))
        .await?;
    Ok(Json(invoice))
}

pub(super) async fn create(
    State(app): State<Arc<App>>,
    Json(input): Json<InvoiceInput>,
) -> Result<Response, ApiError> {
    let invoice = app.use_cases.management.invoice.create(input).await?;
    Ok(created(format!("/invoices/{}", invoice.id), Json(invoice)))
}

pub(super) async fn update(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(input): Json<InvoiceInput>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .invoice
        .update(InvoiceId::from_uuid(id), input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .invoice
        .delete(InvoiceId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
