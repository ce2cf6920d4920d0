//! Postgres-backed comments.

use std::sync::Arc;

use async_trait::async_trait;
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_db::models::comment::Comment;
use opencircle_db::repositories::CommentRepo;
use opencircle_db::DbPool;

use super::registry::ObjectRegistry;
use super::{CommentLogic, LogicResult};

/// Maximum length of a comment body (in characters).
const MAX_CONTENT_LEN: usize = 10_000;

pub struct PgCommentLogic {
    pool: DbPool,
    registry: Arc<ObjectRegistry>,
}

impl PgCommentLogic {
    pub fn new(pool: DbPool, registry: Arc<ObjectRegistry>) -> Self {
        Self { pool, registry }
    }
}

#[async_trait]
impl CommentLogic for PgCommentLogic {
    async fn publish(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        content: &str,
    ) -> LogicResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CoreError::validation("Comment must not be empty").into());
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(CoreError::Validation(format!(
                "Comment must not exceed {MAX_CONTENT_LEN} characters"
            ))
            .into());
        }

        let handler = self.registry.comment_object(objtype).ok_or_else(|| {
            CoreError::Validation(format!("Objects of type {objtype} cannot be commented on"))
        })?;

        let mut tx = self.pool.begin().await?;
        let comment = CommentRepo::create(&mut tx, uid, objid, objtype, content).await?;
        handler.on_comment(&mut tx, objid, &comment).await?;
        tx.commit().await?;

        tracing::info!(comment_id = comment.id, objid, %objtype, uid, "Comment published");
        Ok(comment)
    }

    async fn find_object_comments(
        &self,
        objid: DbId,
        objtype: ObjectType,
    ) -> LogicResult<Vec<Comment>> {
        Ok(CommentRepo::list_for_object(&self.pool, objid, objtype).await?)
    }
}
