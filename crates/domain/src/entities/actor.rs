//! Actor entity - a performer who can be cast in any number of movies.

use serde::{Deserialize, Serialize};

use crate::entities::Movie;
use crate::value_objects::ActorName;
use crate::ActorId;

/// A stored actor record.
///
/// `version` is the optimistic-concurrency token: 1 on create, bumped by the
/// store on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    pub name: ActorName,
    pub version: i64,
}

impl Actor {
    pub fn new(name: ActorName) -> Self {
        Self::with_id(ActorId::new(), name)
    }

    pub fn with_id(id: ActorId, name: ActorName) -> Self {
        Self {
            id,
            name,
            version: 1,
        }
    }
}

/// An actor together with the movies it is cast in.
///
/// `movies` is `None` when the caller asked not to expand the relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorWithMovies {
    #[serde(flatten)]
    pub actor: Actor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<Movie>>,
}

impl ActorWithMovies {
    pub fn expanded(actor: Actor, movies: Vec<Movie>) -> Self {
        Self {
            actor,
            movies: Some(movies),
        }
    }

    pub fn bare(actor: Actor) -> Self {
        Self {
            actor,
            movies: None,
        }
    }
}
