//! Project entity model.

use opencircle_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub category: String,
    /// Lower-case slug used in `/p/{uri}`.
    pub uri: String,
    pub home: String,
    pub doc: String,
    pub download: String,
    pub src: String,
    pub logo: String,
    pub description: String,
    pub repo: String,
    pub author: String,
    pub licence: String,
    pub lang: String,
    pub os: String,
    pub tags: String,
    /// Owner of the project.
    pub user_id: DbId,
    pub username: String,
    pub viewnum: i64,
    pub cmtnum: i64,
    pub likenum: i64,
    pub lastreplyuid: Option<DbId>,
    pub lastreplytime: Option<Timestamp>,
    pub status: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
