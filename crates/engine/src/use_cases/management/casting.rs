//! Movie/actor casting operations.
//!
//! Adding a link is strict: a link that already exists is a `Conflict`.
//! Removing a link is lenient: a missing link is a successful no-op as long
//! as both the actor and the movie exist.

use std::sync::Arc;

use castdb_domain::{Actor, ActorId, ActorWithMovies, Movie, MovieActor, MovieId};

use crate::infrastructure::ports::{ActorRepo, CastingRepo, ClockPort, MovieRepo};

use super::ManagementError;

pub struct CastingOps {
    actors: Arc<dyn ActorRepo>,
    movies: Arc<dyn MovieRepo>,
    casting: Arc<dyn CastingRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CastingOps {
    pub fn new(
        actors: Arc<dyn ActorRepo>,
        movies: Arc<dyn MovieRepo>,
        casting: Arc<dyn CastingRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            actors,
            movies,
            casting,
            clock,
        }
    }

    pub async fn add_movie_to_actor(
        &self,
        actor_id: ActorId,
        movie_id: MovieId,
    ) -> Result<ActorWithMovies, ManagementError> {
        let actor = self.require_actor(actor_id).await?;
        self.require_movie(movie_id).await?;

        if self.casting.get_link(actor_id, movie_id).await?.is_some() {
            tracing::warn!(
                actor_id = %actor_id,
                movie_id = %movie_id,
                "Movie already linked to actor"
            );
            return Err(duplicate_link(actor_id, movie_id));
        }

        let link = MovieActor::new(movie_id, actor_id, self.clock.now());
        if let Err(err) = self.casting.link(&link).await {
            // A concurrent add for the same pair loses at the store's unique key.
            tracing::warn!(
                actor_id = %actor_id,
                movie_id = %movie_id,
                error = %err,
                "Linking movie to actor rejected by store"
            );
            return Err(err.into());
        }

        tracing::info!(actor_id = %actor_id, movie_id = %movie_id, "Linked movie to actor");
        let movies = self.casting.movies_for_actor(actor_id).await?;
        Ok(ActorWithMovies::expanded(actor, movies))
    }

    pub async fn list_movies_for_actor(
        &self,
        actor_id: ActorId,
    ) -> Result<Vec<Movie>, ManagementError> {
        self.require_actor(actor_id).await?;
        Ok(self.casting.movies_for_actor(actor_id).await?)
    }

    pub async fn list_actors_for_movie(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<Actor>, ManagementError> {
        self.require_movie(movie_id).await?;
        Ok(self.casting.actors_for_movie(movie_id).await?)
    }

    pub async fn remove_movie_from_actor(
        &self,
        actor_id: ActorId,
        movie_id: MovieId,
    ) -> Result<(), ManagementError> {
        self.require_actor(actor_id).await?;
        self.require_movie(movie_id).await?;

        if self.casting.unlink(actor_id, movie_id).await? {
            tracing::info!(actor_id = %actor_id, movie_id = %movie_id, "Unlinked movie from actor");
        } else {
            tracing::debug!(
                actor_id = %actor_id,
                movie_id = %movie_id,
                "No link to remove, treating as success"
            );
        }
        Ok(())
    }

    async fn require_actor(&self, actor_id: ActorId) -> Result<Actor, ManagementError> {
        self.actors
            .get(actor_id)
            .await?
            .ok_or_else(|| ManagementError::not_found("Actor", actor_id))
    }

    async fn require_movie(&self, movie_id: MovieId) -> Result<Movie, ManagementError> {
        self.movies
            .get(movie_id)
            .await?
            .ok_or_else(|| ManagementError::not_found("Movie", movie_id))
    }
}

fn duplicate_link(actor_id: ActorId, movie_id: MovieId) -> ManagementError {
    ManagementError::Conflict(format!(
        "Movie with id {} already exists for Actor {}.",
        movie_id, actor_id
    ))
}
