//! Movie CRUD operations.

use std::sync::Arc;

use castdb_domain::{Description, Movie, MovieId, MovieTitle, MovieWithActors};
use serde::Deserialize;

use crate::infrastructure::ports::{CastingRepo, MovieRepo};

use super::{settle_update, ManagementError};

/// Client-supplied movie record for create and replace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(default)]
    pub id: Option<MovieId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub release_year: i32,
    #[serde(default)]
    pub version: Option<i64>,
}

impl MovieInput {
    fn into_movie(self, id: MovieId) -> Result<Movie, ManagementError> {
        let mut movie = Movie::with_id(id, MovieTitle::new(self.title)?, self.release_year);
        if let Some(description) = self.description {
            movie = movie.with_description(Description::new(description)?);
        }
        Ok(movie)
    }
}

pub struct MovieCrud {
    movies: Arc<dyn MovieRepo>,
    casting: Arc<dyn CastingRepo>,
}

impl MovieCrud {
    pub fn new(movies: Arc<dyn MovieRepo>, casting: Arc<dyn CastingRepo>) -> Self {
        Self { movies, casting }
    }

    pub async fn list(&self, expand: bool) -> Result<Vec<MovieWithActors>, ManagementError> {
        let movies = self.movies.list().await?;
        let mut result = Vec::with_capacity(movies.len());
        for movie in movies {
            result.push(self.with_actors(movie, expand).await?);
        }
        Ok(result)
    }

    pub async fn get(
        &self,
        movie_id: MovieId,
        expand: bool,
    ) -> Result<MovieWithActors, ManagementError> {
        let movie = self
            .movies
            .get(movie_id)
            .await?
            .ok_or_else(|| ManagementError::not_found("Movie", movie_id))?;
        self.with_actors(movie, expand).await
    }

    pub async fn create(&self, input: MovieInput) -> Result<MovieWithActors, ManagementError> {
        let id = input.id.unwrap_or_default();
        let movie = input.into_movie(id)?;

        self.movies.create(&movie).await?;

        tracing::info!(movie_id = %movie.id, title = %movie.title, "Created movie");
        Ok(MovieWithActors::expanded(movie, Vec::new()))
    }

    pub async fn update(&self, movie_id: MovieId, input: MovieInput) -> Result<(), ManagementError> {
        let body_id = input.id.ok_or_else(|| ManagementError::id_mismatch(movie_id, "none"))?;
        if body_id != movie_id {
            return Err(ManagementError::id_mismatch(movie_id, body_id));
        }

        let version = input.version;
        let movie = input.into_movie(movie_id)?;

        let outcome = self.movies.update(&movie, version).await;
        settle_update("Movie", movie_id, outcome, self.movies.exists(movie_id)).await?;

        tracing::info!(movie_id = %movie_id, "Updated movie");
        Ok(())
    }

    pub async fn delete(&self, movie_id: MovieId) -> Result<(), ManagementError> {
        if self.movies.get(movie_id).await?.is_none() {
            return Err(ManagementError::not_found("Movie", movie_id));
        }

        self.movies.delete(movie_id).await?;
        tracing::info!(movie_id = %movie_id, "Deleted movie and its actor links");
        Ok(())
    }

    async fn with_actors(
        &self,
        movie: Movie,
        expand: bool,
    ) -> Result<MovieWithActors, ManagementError> {
        if !expand {
            return Ok(MovieWithActors::bare(movie));
        }
        let actors = self.casting.actors_for_movie(movie.id).await?;
        Ok(MovieWithActors::expanded(movie, actors))
    }
}
