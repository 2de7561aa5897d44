//! Actor handlers, including the actor's movie associations.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use castdb_domain::{ActorId, ActorWithMovies, Movie, MovieId};
use uuid::Uuid;

use super::{created, ApiError, ExpandQuery};
use crate::app::App;
use crate::use_cases::management::ActorInput;

pub(super) async fn list(
    State(app): State<Arc<App>>,
    Query(query): Query<ExpandQuery>,
) -> Result<Json<Vec<ActorWithMovies>>, ApiError> {
    let actors = app.use_cases.management.actor.list(query.enabled()).await?;
    Ok(Json(actors))
}

pub(super) async fn get(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExpandQuery>,
) -> Result<Json<ActorWithMovies>, ApiError> {
    let actor = app
        .use_cases
        .management
        .actor
        .get(ActorId::from_uuid(id), query.enabled())
        .await?;
    Ok(Json(actor))
}

pub(super) async fn create(
    State(app): State<Arc<App>>,
    Json(input): Json<ActorInput>,
) -> Result<Response, ApiError> {
    let actor = app.use_cases.management.actor.create(input).await?;
    Ok(created(format!("/actors/{}", actor.actor.id), Json(actor)))
}

pub(super) async fn update(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(input): Json<ActorInput>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .actor
        .update(ActorId::from_uuid(id), input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .actor
        .delete(ActorId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Movie associations
// =============================================================================

pub(super) async fn list_movies(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = app
        .use_cases
        .management
        .casting
        .list_movies_for_actor(ActorId::from_uuid(id))
        .await?;
    Ok(Json(movies))
}

pub(super) async fn add_movie(
    State(app): State<Arc<App>>,
    Path((id, movie_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let actor = app
        .use_cases
        .management
        .casting
        .add_movie_to_actor(ActorId::from_uuid(id), MovieId::from_uuid(movie_id))
        .await?;
    Ok(created(format!("/actors/{}", actor.actor.id), Json(actor)))
}

pub(super) async fn remove_movie(
    State(app): State<Arc<App>>,
    Path((id, movie_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .management
        .casting
        .remove_movie_from_actor(ActorId::from_uuid(id), MovieId::from_uuid(movie_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
