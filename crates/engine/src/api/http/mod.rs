//! HTTP routes.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::app::App;
use crate::use_cases::management::ManagementError;

mod actors;
mod invoices;
mod movies;

#[cfg(test)]
mod tests;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/actors", get(actors::list).post(actors::create))
        .route(
            "/actors/{id}",
            get(actors::get).put(actors::update).delete(actors::delete),
        )
        .route("/actors/{id}/movies", get(actors::list_movies))
        .route(
            "/actors/{id}/movies/{movie_id}",
            post(actors::add_movie).delete(actors::remove_movie),
        )
        .route("/movies", get(movies::list).post(movies::create))
        .route(
            "/movies/{id}",
            get(movies::get).put(movies::update).delete(movies::delete),
        )
        .route("/movies/{id}/actors", get(movies::list_actors))
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route(
            "/invoices/{id}",
            get(invoices::get)
                .put(invoices::update)
                .delete(invoices::delete),
        )
}

async fn health() -> &'static str {
    "OK"
}

/// `?expand=false` omits the related set from actor and movie reads.
#[derive(Debug, Default, Deserialize)]
pub struct ExpandQuery {
    pub expand: Option<bool>,
}

impl ExpandQuery {
    pub fn enabled(&self) -> bool {
        self.expand.unwrap_or(true)
    }
}

/// `201 Created` with a `Location` header pointing at the new resource.
fn created<T: IntoResponse>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(axum::http::header::LOCATION, location)],
        body,
    )
        .into_response()
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unprocessable(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::NotFound(msg) => ApiError::NotFound(msg),
            err @ ManagementError::IdMismatch { .. } => ApiError::BadRequest(err.to_string()),
            ManagementError::InvalidInput(msg) => ApiError::Unprocessable(msg),
            ManagementError::Conflict(msg) => ApiError::Conflict(msg),
            ManagementError::Repo(err) => ApiError::Internal(err.to_string()),
        }
    }
}
