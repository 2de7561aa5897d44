//! SQLite movie/actor link repository (the `movie_actors` join table).

use async_trait::async_trait;
use castdb_domain::{Actor, ActorId, Movie, MovieActor, MovieId};
use sqlx::SqlitePool;

use super::actor_repo::row_to_actor;
use super::helpers::{is_foreign_key_violation, map_write_error, RowExt};
use super::movie_repo::row_to_movie;
use crate::infrastructure::ports::{CastingRepo, RepoError};

pub struct SqliteCastingRepo {
    pool: SqlitePool,
}

impl SqliteCastingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CastingRepo for SqliteCastingRepo {
    async fn movies_for_actor(&self, actor_id: ActorId) -> Result<Vec<Movie>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.title, m.description, m.release_year, m.version
            FROM movies m
            JOIN movie_actors ma ON ma.movie_id = m.id
            WHERE ma.actor_id = ?
            ORDER BY m.release_year, m.title
            "#,
        )
        .bind(actor_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("movies_for_actor", e))?;

        rows.iter().map(row_to_movie).collect()
    }

    async fn actors_for_movie(&self, movie_id: MovieId) -> Result<Vec<Actor>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.version
            FROM actors a
            JOIN movie_actors ma ON ma.actor_id = a.id
            WHERE ma.movie_id = ?
            ORDER BY a.name
            "#,
        )
        .bind(movie_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("actors_for_movie", e))?;

        rows.iter().map(row_to_actor).collect()
    }

    async fn get_link(
        &self,
        actor_id: ActorId,
        movie_id: MovieId,
    ) -> Result<Option<MovieActor>, RepoError> {
        let row = sqlx::query(
            "SELECT movie_id, actor_id, update_time FROM movie_actors \
             WHERE movie_id = ? AND actor_id = ?",
        )
        .bind(movie_id.to_string())
        .bind(actor_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_link", e))?;

        row.map(|row| -> Result<MovieActor, RepoError> {
            Ok(MovieActor {
                movie_id: MovieId::from_uuid(row.uuid("movie_id")?),
                actor_id: ActorId::from_uuid(row.uuid("actor_id")?),
                update_time: row.utc_datetime("update_time")?,
            })
        })
        .transpose()
    }

    async fn link(&self, link: &MovieActor) -> Result<(), RepoError> {
        let result = sqlx::query(
            "INSERT INTO movie_actors (movie_id, actor_id, update_time) VALUES (?, ?, ?)",
        )
        .bind(link.movie_id.to_string())
        .bind(link.actor_id.to_string())
        .bind(link.update_time.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(RepoError::not_found(
                "Actor or Movie",
                format!("{}/{}", link.actor_id, link.movie_id),
            )),
            Err(e) => Err(map_write_error("link_movie_actor", e, |_| {
                format!(
                    "Movie with id {} already exists for Actor {}",
                    link.movie_id, link.actor_id
                )
            })),
        }
    }

    async fn unlink(&self, actor_id: ActorId, movie_id: MovieId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM movie_actors WHERE movie_id = ? AND actor_id = ?")
            .bind(movie_id.to_string())
            .bind(actor_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("unlink_movie_actor", e))?;
        Ok(result.rows_affected() > 0)
    }
}
