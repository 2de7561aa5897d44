//! Actor CRUD operations.

use std::sync::Arc;

use castdb_domain::{Actor, ActorId, ActorName, ActorWithMovies};
use serde::Deserialize;

use crate::infrastructure::ports::{ActorRepo, CastingRepo};

use super::{settle_update, ManagementError};

/// Client-supplied actor record for create and replace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorInput {
    #[serde(default)]
    pub id: Option<ActorId>,
    pub name: String,
    /// Concurrency token read earlier; `None` replaces unconditionally.
    #[serde(default)]
    pub version: Option<i64>,
}

pub struct ActorCrud {
    actors: Arc<dyn ActorRepo>,
    casting: Arc<dyn CastingRepo>,
}

impl ActorCrud {
    pub fn new(actors: Arc<dyn ActorRepo>, casting: Arc<dyn CastingRepo>) -> Self {
        Self { actors, casting }
    }

    pub async fn list(&self, expand: bool) -> Result<Vec<ActorWithMovies>, ManagementError> {
        let actors = self.actors.list().await?;
        let mut result = Vec::with_capacity(actors.len());
        for actor in actors {
            result.push(self.with_movies(actor, expand).await?);
        }
        Ok(result)
    }

    pub async fn get(
        &self,
        actor_id: ActorId,
        expand: bool,
    ) -> Result<ActorWithMovies, ManagementError> {
        let actor = self
            .actors
            .get(actor_id)
            .await?
            .ok_or_else(|| ManagementError::not_found("Actor", actor_id))?;
        self.with_movies(actor, expand).await
    }

    pub async fn create(&self, input: ActorInput) -> Result<ActorWithMovies, ManagementError> {
        let name = ActorName::new(input.name)?;
        let actor = Actor::with_id(input.id.unwrap_or_default(), name);

        if let Err(err) = self.actors.create(&actor).await {
            tracing::warn!(actor_id = %actor.id, error = %err, "Actor create rejected");
            return Err(err.into());
        }

        tracing::info!(actor_id = %actor.id, name = %actor.name, "Created actor");
        Ok(ActorWithMovies::expanded(actor, Vec::new()))
    }

    /// Replace the stored actor wholesale.
    pub async fn update(&self, actor_id: ActorId, input: ActorInput) -> Result<(), ManagementError> {
        let body_id = input.id.ok_or_else(|| ManagementError::id_mismatch(actor_id, "none"))?;
        if body_id != actor_id {
            return Err(ManagementError::id_mismatch(actor_id, body_id));
        }

        let name = ActorName::new(input.name)?;
        let actor = Actor::with_id(actor_id, name);

        let outcome = self.actors.update(&actor, input.version).await;
        settle_update("Actor", actor_id, outcome, self.actors.exists(actor_id)).await?;

        tracing::info!(actor_id = %actor_id, "Updated actor");
        Ok(())
    }

    pub async fn delete(&self, actor_id: ActorId) -> Result<(), ManagementError> {
        if self.actors.get(actor_id).await?.is_none() {
            return Err(ManagementError::not_found("Actor", actor_id));
        }

        self.actors.delete(actor_id).await?;
        tracing::info!(actor_id = %actor_id, "Deleted actor and its movie links");
        Ok(())
    }

    async fn with_movies(
        &self,
        actor: Actor,
        expand: bool,
    ) -> Result<ActorWithMovies, ManagementError> {
        if !expand {
            return Ok(ActorWithMovies::bare(actor));
        }
        let movies = self.casting.movies_for_actor(actor.id).await?;
        Ok(ActorWithMovies::expanded(actor, movies))
    }
}
