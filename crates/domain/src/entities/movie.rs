//! Movie entity and the movie/actor casting link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Actor;
use crate::value_objects::{Description, MovieTitle};
use crate::{ActorId, MovieId};

/// A stored movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: MovieTitle,
    #[serde(default)]
    pub description: Option<Description>,
    pub release_year: i32,
    pub version: i64,
}

impl Movie {
    pub fn new(title: MovieTitle, release_year: i32) -> Self {
        Self::with_id(MovieId::new(), title, release_year)
    }

    pub fn with_id(id: MovieId, title: MovieTitle, release_year: i32) -> Self {
        Self {
            id,
            title,
            description: None,
            release_year,
            version: 1,
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}

/// A movie together with its cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieWithActors {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<Actor>>,
}

impl MovieWithActors {
    pub fn expanded(movie: Movie, actors: Vec<Actor>) -> Self {
        Self {
            movie,
            actors: Some(actors),
        }
    }

    pub fn bare(movie: Movie) -> Self {
        Self {
            movie,
            actors: None,
        }
    }
}

/// Join row linking one movie to one actor.
///
/// Identity is the `(movie_id, actor_id)` pair; at most one link exists per
/// pair. Neither side owns the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieActor {
    pub movie_id: MovieId,
    pub actor_id: ActorId,
    /// When the association was last changed
    pub update_time: DateTime<Utc>,
}

impl MovieActor {
    pub fn new(movie_id: MovieId, actor_id: ActorId, update_time: DateTime<Utc>) -> Self {
        Self {
            movie_id,
            actor_id,
            update_time,
        }
    }
}
