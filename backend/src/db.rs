use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::forms::NoteDraft;
use crate::models::{Note, User};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the pool described by `settings` and bring the schema up to date.
pub async fn connect(settings: &Settings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(url = %settings.database_url, "database ready");

    Ok(pool)
}

// Notes ///////////////////////////////////////////////////////////////////////////////////////////

pub async fn list_notes(pool: &SqlitePool, author_id: i64) -> Result<Vec<Note>> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, author_id, title, text, slug
        FROM notes
        WHERE author_id = ?1
        ORDER BY id
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

/// Resolve a note by slug on behalf of `author_id`. Someone else's note is
/// indistinguishable from a missing one.
pub async fn find_note(pool: &SqlitePool, author_id: i64, slug: &str) -> Result<Note> {
    sqlx::query_as::<_, Note>(
        r#"
        SELECT id, author_id, title, text, slug
        FROM notes
        WHERE slug = ?1 AND author_id = ?2
        "#,
    )
    .bind(slug)
    .bind(author_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Whether any note other than `exclude_id` already uses `slug`.
pub async fn slug_exists(pool: &SqlitePool, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM notes
        WHERE slug = ?1 AND (?2 IS NULL OR id != ?2)
        "#,
    )
    .bind(slug)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn create_note(pool: &SqlitePool, author_id: i64, draft: &NoteDraft) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO notes ( author_id, title, text, slug )
        VALUES ( ?1, ?2, ?3, ?4 )
        "#,
    )
    .bind(author_id)
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(&draft.slug)
    .execute(pool)
    .await
    .map_err(|e| on_unique_violation(e, || AppError::SlugTaken(draft.slug.clone())))?
    .last_insert_rowid();

    Ok(id)
}

pub async fn update_note(
    pool: &SqlitePool,
    author_id: i64,
    id: i64,
    draft: &NoteDraft,
) -> Result<bool> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE notes
        SET title = ?1, text = ?2, slug = ?3
        WHERE id = ?4 AND author_id = ?5
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(&draft.slug)
    .bind(id)
    .bind(author_id)
    .execute(pool)
    .await
    .map_err(|e| on_unique_violation(e, || AppError::SlugTaken(draft.slug.clone())))?
    .rows_affected();

    Ok(rows_affected > 0)
}

pub async fn delete_note(pool: &SqlitePool, author_id: i64, id: i64) -> Result<bool> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM notes
        WHERE id = ?1 AND author_id = ?2
        "#,
    )
    .bind(id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

// Users ///////////////////////////////////////////////////////////////////////////////////////////

pub async fn create_user(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO users ( username, password_hash )
        VALUES ( ?1, ?2 )
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(|e| on_unique_violation(e, || AppError::UsernameTaken(username.to_string())))?
    .last_insert_rowid();

    Ok(id)
}

pub async fn find_user(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

fn on_unique_violation(err: sqlx::Error, conflict: impl FnOnce() -> AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => conflict(),
        _ => AppError::Database(err),
    }
}
