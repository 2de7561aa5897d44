//! SQLite movie repository.

use async_trait::async_trait;
use castdb_domain::{Description, Movie, MovieId, MovieTitle};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{map_write_error, RowExt};
use crate::infrastructure::ports::{MovieRepo, RepoError};

pub struct SqliteMovieRepo {
    pool: SqlitePool,
}

impl SqliteMovieRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) fn row_to_movie(row: &SqliteRow) -> Result<Movie, RepoError> {
    let invalid = |e: castdb_domain::DomainError| RepoError::serialization(e.to_string());

    let description = row
        .optional_text("description")?
        .map(Description::new)
        .transpose()
        .map_err(invalid)?
        .filter(|d| !d.is_empty());

    let release_year = i32::try_from(row.int("release_year")?)
        .map_err(|e| RepoError::serialization(format!("release_year: {}", e)))?;

    Ok(Movie {
        id: MovieId::from_uuid(row.uuid("id")?),
        title: MovieTitle::new(row.text("title")?).map_err(invalid)?,
        description,
        release_year,
        version: row.int("version")?,
    })
}

#[async_trait]
impl MovieRepo for SqliteMovieRepo {
    async fn list(&self) -> Result<Vec<Movie>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, title, description, release_year, version FROM movies \
             ORDER BY release_year, title",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_movies", e))?;

        rows.iter().map(row_to_movie).collect()
    }

    async fn get(&self, id: MovieId) -> Result<Option<Movie>, RepoError> {
        let row = sqlx::query(
            "SELECT id, title, description, release_year, version FROM movies WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_movie", e))?;

        row.as_ref().map(row_to_movie).transpose()
    }

    async fn exists(&self, id: MovieId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM movies WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("movie_exists", e))?;
        Ok(row.is_some())
    }

    async fn create(&self, movie: &Movie) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO movies (id, title, description, release_year, version) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(movie.id.to_string())
        .bind(movie.title.as_str())
        .bind(movie.description.as_ref().map(|d| d.as_str()))
        .bind(movie.release_year)
        .bind(movie.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error("create_movie", e, |_| {
                format!("Movie with id {} already exists", movie.id)
            })
        })?;
        Ok(())
    }

    async fn update(
        &self,
        movie: &Movie,
        expected_version: Option<i64>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET title = ?1, description = ?2, release_year = ?3, version = version + 1
            WHERE id = ?4 AND (?5 IS NULL OR version = ?5)
            "#,
        )
        .bind(movie.title.as_str())
        .bind(movie.description.as_ref().map(|d| d.as_str()))
        .bind(movie.release_year)
        .bind(movie.id.to_string())
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("update_movie", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::concurrency("Movie", movie.id));
        }
        Ok(())
    }

    async fn delete(&self, id: MovieId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_movie", e))?;

        sqlx::query("DELETE FROM movie_actors WHERE movie_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_movie", e))?;

        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_movie", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Movie", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_movie", e))?;
        Ok(())
    }
}
