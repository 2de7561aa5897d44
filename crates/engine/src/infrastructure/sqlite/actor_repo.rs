//! SQLite actor repository.

use async_trait::async_trait;
use castdb_domain::{Actor, ActorId, ActorName};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{map_write_error, RowExt};
use crate::infrastructure::ports::{ActorRepo, RepoError};

pub struct SqliteActorRepo {
    pool: SqlitePool,
}

impl SqliteActorRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) fn row_to_actor(row: &SqliteRow) -> Result<Actor, RepoError> {
    Ok(Actor {
        id: ActorId::from_uuid(row.uuid("id")?),
        name: ActorName::new(row.text("name")?)
            .map_err(|e| RepoError::serialization(e.to_string()))?,
        version: row.int("version")?,
    })
}

fn duplicate_actor_message(actor: &Actor, db_message: &str) -> String {
    if db_message.contains("actors.name") {
        format!("Actor with name '{}' already exists", actor.name)
    } else {
        format!("Actor with id {} already exists", actor.id)
    }
}

#[async_trait]
impl ActorRepo for SqliteActorRepo {
    async fn list(&self) -> Result<Vec<Actor>, RepoError> {
        let rows = sqlx::query("SELECT id, name, version FROM actors ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_actors", e))?;

        rows.iter().map(row_to_actor).collect()
    }

    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        let row = sqlx::query("SELECT id, name, version FROM actors WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_actor", e))?;

        row.as_ref().map(row_to_actor).transpose()
    }

    async fn exists(&self, id: ActorId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM actors WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("actor_exists", e))?;
        Ok(row.is_some())
    }

    async fn create(&self, actor: &Actor) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO actors (id, name, version) VALUES (?, ?, ?)")
            .bind(actor.id.to_string())
            .bind(actor.name.as_str())
            .bind(actor.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_write_error("create_actor", e, |msg| duplicate_actor_message(actor, msg))
            })?;
        Ok(())
    }

    async fn update(
        &self,
        actor: &Actor,
        expected_version: Option<i64>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE actors SET name = ?1, version = version + 1
            WHERE id = ?2 AND (?3 IS NULL OR version = ?3)
            "#,
        )
        .bind(actor.name.as_str())
        .bind(actor.id.to_string())
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("update_actor", e, |msg| duplicate_actor_message(actor, msg)))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::concurrency("Actor", actor.id));
        }
        Ok(())
    }

    async fn delete(&self, id: ActorId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_actor", e))?;

        sqlx::query("DELETE FROM movie_actors WHERE actor_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_actor", e))?;

        let result = sqlx::query("DELETE FROM actors WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_actor", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Actor", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_actor", e))?;
        Ok(())
    }
}
