//! Postgres-backed project logic and the project's comment/like callbacks.

use std::sync::Arc;

use async_trait::async_trait;
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::project::{can_edit, normalize_uri, ProjectForm};
use opencircle_core::types::DbId;
use opencircle_db::models::comment::Comment;
use opencircle_db::models::project::Project;
use opencircle_db::repositories::ProjectRepo;
use opencircle_db::DbPool;
use sqlx::{Postgres, Transaction};

use super::registry::{CommentObject, LikeObject, ObjectRegistry};
use super::{LogicError, LogicResult, ProjectLogic};
use crate::middleware::auth::AuthUser;

pub struct PgProjectLogic {
    pool: DbPool,
}

impl PgProjectLogic {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectLogic for PgProjectLogic {
    async fn find_by(&self, limit: usize, last_id: DbId) -> LogicResult<Vec<Project>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(ProjectRepo::list_before(&self.pool, last_id.max(0), limit).await?)
    }

    async fn find_by_id(&self, id: DbId) -> LogicResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_uri(&self, uri: &str) -> LogicResult<Option<Project>> {
        Ok(ProjectRepo::find_by_uri(&self.pool, &normalize_uri(uri)).await?)
    }

    async fn uri_exists(&self, uri: &str) -> LogicResult<bool> {
        Ok(ProjectRepo::uri_exists(&self.pool, &normalize_uri(uri)).await?)
    }

    async fn publish(&self, actor: &AuthUser, form: ProjectForm) -> LogicResult<Project> {
        let id = form.target_id();
        let draft = form.into_draft()?;

        if id == 0 {
            if ProjectRepo::uri_exists(&self.pool, &draft.uri).await? {
                return Err(CoreError::Conflict(format!("uri \"{}\" is already taken", draft.uri)).into());
            }
            let project =
                ProjectRepo::create(&self.pool, &draft, actor.user_id, &actor.username).await?;
            tracing::info!(
                project_id = project.id,
                uri = %project.uri,
                user_id = actor.user_id,
                "Project published"
            );
            return Ok(project);
        }

        let existing = ProjectRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;

        if !can_edit(actor.user_id, actor.is_admin(), existing.user_id) {
            tracing::warn!(
                project_id = id,
                user_id = actor.user_id,
                owner_id = existing.user_id,
                "Project modify denied"
            );
            return Err(LogicError::NotModifyAuthority {
                entity: "project",
                id,
            });
        }

        if draft.uri != existing.uri && ProjectRepo::uri_exists(&self.pool, &draft.uri).await? {
            return Err(CoreError::Conflict(format!("uri \"{}\" is already taken", draft.uri)).into());
        }

        let project = ProjectRepo::update(&self.pool, id, &draft)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;
        tracing::info!(project_id = id, user_id = actor.user_id, "Project modified");
        Ok(project)
    }

    async fn healthy(&self) -> bool {
        opencircle_db::health_check(&self.pool).await.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Registry callbacks
// ---------------------------------------------------------------------------

/// Keeps `cmtnum` and the last-reply fields of a project current.
pub struct ProjectComment;

#[async_trait]
impl CommentObject for ProjectComment {
    async fn on_comment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        objid: DbId,
        comment: &Comment,
    ) -> LogicResult<()> {
        if !ProjectRepo::record_reply(tx, objid, comment.uid, comment.created_at).await? {
            tracing::warn!(project_id = objid, "Comment on missing project");
            return Err(missing_project(objid));
        }
        Ok(())
    }
}

/// Keeps `likenum` of a project current.
pub struct ProjectLike;

#[async_trait]
impl LikeObject for ProjectLike {
    async fn on_like(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        objid: DbId,
        uid: DbId,
        liked: bool,
    ) -> LogicResult<()> {
        let delta = if liked { 1 } else { -1 };
        if !ProjectRepo::incr_likenum(tx, objid, delta).await? {
            tracing::warn!(project_id = objid, uid, "Like on missing project");
            return Err(missing_project(objid));
        }
        Ok(())
    }
}

fn missing_project(id: DbId) -> LogicError {
    CoreError::NotFound {
        entity: "Project",
        id,
    }
    .into()
}

/// Register the project type's comment and like callbacks.
///
/// Called once during start-up, before the registry is shared.
pub fn register_objects(registry: &mut ObjectRegistry) {
    registry.register_comment_object(ObjectType::Project, Arc::new(ProjectComment));
    registry.register_like_object(ObjectType::Project, Arc::new(ProjectLike));
}
