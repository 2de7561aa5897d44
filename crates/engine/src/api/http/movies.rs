//! Movie handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use castdb_domain::{Actor, MovieId, MovieWithActors};
use uuid::Uuid;

use super::{created, ApiError, ExpandQuery};
use crate::app::App;
use crate::use_cases::management::MovieInput;

pub(super) async fn list(
    State(app): State<Arc<App>>,
    Query(query): Query<ExpandQuery>,
) -> Result<Json<Vec<MovieWithActors>>, ApiError> {
    let movies = app.use_cases.management.movie.list(query.enabled()).await?;
    Ok(Json(movies))
}

pub(super) async fn get(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExpandQuery>,
) -> Result<Json<MovieWithActors>, ApiError> {
    let movie = app
        .use_cases
        .management
        .movie
        .get(MovieId::from_uuid(id), query.enabled())
        .await?;
    Ok(Json(movie))
}

pub(super) async fn create(
    State(app): State<Arc<App>>,
    Json(input): Json<MovieInput>,
) -> Result<Response, ApiError> {
    let movie = app.use_cases.management.movie.create(input).await?;
    Ok(created(format!("/movies/{}", movie.movie.id), Json(movie)))
}

pub(super) async fn update(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(input): Json<MovieInput>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .movie
        .update(MovieId::from_uuid(id), input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .movie
        .delete(MovieId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_actors(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Actor>>, ApiError> {
    let actors = app
        .use_cases
        .management
        .casting
        .list_actors_for_movie(MovieId::from_uuid(id))
        .await?;
    Ok(Json(actors))
}
