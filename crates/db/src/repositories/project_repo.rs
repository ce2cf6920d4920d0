//! Repository for the `projects` table.

use opencircle_core::project::{ProjectDraft, STATUS_OFFLINE, STATUS_ONLINE};
use opencircle_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, uri, home, doc, download, src, logo, description, \
     repo, author, licence, lang, os, tags, user_id, username, viewnum, cmtnum, likenum, \
     lastreplyuid, lastreplytime, status, created_at, updated_at";

/// Provides reads and writes for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new, immediately listed project owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        draft: &ProjectDraft,
        user_id: DbId,
        username: &str,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, category, uri, home, doc, download, src, logo,
                description, repo, author, licence, lang, os, tags, user_id, username, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(&draft.uri)
            .bind(&draft.home)
            .bind(&draft.doc)
            .bind(&draft.download)
            .bind(&draft.src)
            .bind(&draft.logo)
            .bind(&draft.description)
            .bind(&draft.repo)
            .bind(&draft.author)
            .bind(&draft.licence)
            .bind(&draft.lang)
            .bind(&draft.os)
            .bind(&draft.tags)
            .bind(user_id)
            .bind(username)
            .bind(STATUS_ONLINE)
            .fetch_one(pool)
            .await
    }

    /// Replace the editable fields of a project. Ownership and counters are untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = $2, category = $3, uri = $4, home = $5, doc = $6, download = $7,
                src = $8, logo = $9, description = $10, repo = $11, author = $12,
                licence = $13, lang = $14, os = $15, tags = $16, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(&draft.uri)
            .bind(&draft.home)
            .bind(&draft.doc)
            .bind(&draft.download)
            .bind(&draft.src)
            .bind(&draft.logo)
            .bind(&draft.description)
            .bind(&draft.repo)
            .bind(&draft.author)
            .bind(&draft.licence)
            .bind(&draft.lang)
            .bind(&draft.os)
            .bind(&draft.tags)
            .fetch_optional(pool)
            .await
    }

    /// Listed projects in descending id order, starting below `last_id`
    /// (or from the newest when `last_id` is 0).
    pub async fn list_before(
        pool: &PgPool,
        last_id: DbId,
        limit: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE status <> $1 AND ($2 = 0 OR id < $2)
             ORDER BY id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(STATUS_OFFLINE)
            .bind(last_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find a project by its internal ID, regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a listed project by its (already normalized) uri slug.
    pub async fn find_by_uri(pool: &PgPool, uri: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE uri = $1 AND status <> $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(uri)
            .bind(STATUS_OFFLINE)
            .fetch_optional(pool)
            .await
    }

    /// Whether any project, listed or not, already owns `uri`.
    pub async fn uri_exists(pool: &PgPool, uri: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE uri = $1)")
            .bind(uri)
            .fetch_one(pool)
            .await
    }

    /// Add flushed page views to `viewnum`.
    pub async fn incr_viewnum(pool: &PgPool, id: DbId, delta: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET viewnum = viewnum + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Adjust `likenum` by `delta`, never going below zero.
    pub async fn incr_likenum(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        delta: i64,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET likenum = GREATEST(likenum + $2, 0) WHERE id = $1")
                .bind(id)
                .bind(delta)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a new comment and remember who replied last.
    pub async fn record_reply(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        uid: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET cmtnum = cmtnum + 1, lastreplyuid = $2, lastreplytime = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(uid)
        .bind(at)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
