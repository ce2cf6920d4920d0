//! Business-logic layer behind the HTTP handlers.
//!
//! Handlers only talk to the traits defined here, bundled in [`Logic`].
//! The Postgres implementations live in the submodules; tests swap in
//! in-memory fakes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::project::ProjectForm;
use opencircle_core::types::DbId;
use opencircle_core::view_source::SourceCounts;
use opencircle_db::models::comment::Comment;
use opencircle_db::models::project::Project;
use opencircle_db::models::view_source::ViewSource;
use opencircle_db::DbPool;

use crate::middleware::auth::AuthUser;

pub mod comment;
pub mod favorite;
pub mod like;
pub mod project;
pub mod registry;
pub mod view;

pub use registry::{CommentObject, LikeObject, ObjectRegistry};

/// Errors surfaced by the logic layer.
#[derive(Debug, thiserror::Error)]
pub enum LogicError {
    /// The actor tried to modify a record it neither owns nor administers.
    #[error("No permission to modify {entity} {id}")]
    NotModifyAuthority { entity: &'static str, id: DbId },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type LogicResult<T> = Result<T, LogicError>;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ProjectLogic: Send + Sync {
    /// Up to `limit` listed projects, id-descending, with `id < last_id`
    /// when `last_id > 0`.
    async fn find_by(&self, limit: usize, last_id: DbId) -> LogicResult<Vec<Project>>;

    async fn find_by_id(&self, id: DbId) -> LogicResult<Option<Project>>;

    /// Case-insensitive lookup by uri slug.
    async fn find_by_uri(&self, uri: &str) -> LogicResult<Option<Project>>;

    async fn uri_exists(&self, uri: &str) -> LogicResult<bool>;

    /// Create (no id in the form) or modify (positive id) a project.
    async fn publish(&self, actor: &AuthUser, form: ProjectForm) -> LogicResult<Project>;

    /// Whether the backing store is reachable.
    async fn healthy(&self) -> bool;
}

#[async_trait]
pub trait LikeLogic: Send + Sync {
    /// Liked object ids of `objtype` between `start_id` and `end_id`
    /// (inclusive, in either order), mapped to `true`.
    async fn find_user_like_objects(
        &self,
        uid: DbId,
        objtype: ObjectType,
        start_id: DbId,
        end_id: DbId,
    ) -> LogicResult<HashMap<DbId, bool>>;

    async fn had_like(&self, uid: DbId, objid: DbId, objtype: ObjectType) -> LogicResult<bool>;

    /// Like (`liked == true`) or unlike an object.
    async fn like_object(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        liked: bool,
    ) -> LogicResult<()>;
}

#[async_trait]
pub trait FavoriteLogic: Send + Sync {
    async fn had_favorite(&self, uid: DbId, objid: DbId, objtype: ObjectType)
        -> LogicResult<bool>;
}

#[async_trait]
pub trait CommentLogic: Send + Sync {
    async fn publish(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        content: &str,
    ) -> LogicResult<Comment>;

    async fn find_object_comments(
        &self,
        objid: DbId,
        objtype: ObjectType,
    ) -> LogicResult<Vec<Comment>>;
}

#[async_trait]
pub trait ViewLogic: Send + Sync {
    /// Remember a signed-in viewer. Idempotent per (object, user).
    async fn record_viewer(&self, objid: DbId, objtype: ObjectType, uid: DbId) -> LogicResult<()>;

    /// Distinct signed-in viewers of an object.
    async fn viewer_count(&self, objid: DbId, objtype: ObjectType) -> LogicResult<i64>;

    async fn view_source(&self, objid: DbId, objtype: ObjectType)
        -> LogicResult<Option<ViewSource>>;

    /// Persist buffered page views and referer tallies.
    async fn persist_views(
        &self,
        objtype: ObjectType,
        objid: DbId,
        views: i64,
        sources: &SourceCounts,
    ) -> LogicResult<()>;
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// All logic services, cheaply cloneable.
#[derive(Clone)]
pub struct Logic {
    pub projects: Arc<dyn ProjectLogic>,
    pub likes: Arc<dyn LikeLogic>,
    pub favorites: Arc<dyn FavoriteLogic>,
    pub comments: Arc<dyn CommentLogic>,
    pub views: Arc<dyn ViewLogic>,
}

impl Logic {
    /// Postgres-backed services. `registry` must already hold the handlers
    /// for every object type that can be liked or commented on.
    pub fn postgres(pool: DbPool, registry: Arc<ObjectRegistry>) -> Self {
        Self {
            projects: Arc::new(project::PgProjectLogic::new(pool.clone())),
            likes: Arc::new(like::PgLikeLogic::new(pool.clone(), Arc::clone(&registry))),
            favorites: Arc::new(favorite::PgFavoriteLogic::new(pool.clone())),
            comments: Arc::new(comment::PgCommentLogic::new(pool.clone(), registry)),
            views: Arc::new(view::PgViewLogic::new(pool)),
        }
    }
}
