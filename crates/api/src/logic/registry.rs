//! Per-object-type callbacks for comments and likes.
//!
//! Comments and likes are stored generically by `(objid, objtype)`, but each
//! object type keeps its own denormalized counters. Object types register a
//! [`CommentObject`] and/or [`LikeObject`] once at start-up; the registry is
//! then frozen behind an `Arc` and consulted on every comment or like.
//!
//! Callbacks run inside the transaction that stored the comment or like. An
//! error from a callback rolls the whole interaction back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_db::models::comment::Comment;
use sqlx::{Postgres, Transaction};

use super::LogicResult;

/// Reacts to a new comment on an object of its type.
#[async_trait]
pub trait CommentObject: Send + Sync {
    async fn on_comment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        objid: DbId,
        comment: &Comment,
    ) -> LogicResult<()>;
}

/// Reacts to a like being added (`liked == true`) or removed.
#[async_trait]
pub trait LikeObject: Send + Sync {
    async fn on_like(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        objid: DbId,
        uid: DbId,
        liked: bool,
    ) -> LogicResult<()>;
}

#[derive(Default)]
pub struct ObjectRegistry {
    comments: HashMap<ObjectType, Arc<dyn CommentObject>>,
    likes: HashMap<ObjectType, Arc<dyn LikeObject>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the comment handler for `objtype`, replacing any previous one.
    pub fn register_comment_object(
        &mut self,
        objtype: ObjectType,
        handler: Arc<dyn CommentObject>,
    ) {
        if self.comments.insert(objtype, handler).is_some() {
            tracing::warn!(%objtype, "Comment object handler replaced");
        }
    }

    /// Register the like handler for `objtype`, replacing any previous one.
    pub fn register_like_object(&mut self, objtype: ObjectType, handler: Arc<dyn LikeObject>) {
        if self.likes.insert(objtype, handler).is_some() {
            tracing::warn!(%objtype, "Like object handler replaced");
        }
    }

    pub fn comment_object(&self, objtype: ObjectType) -> Option<Arc<dyn CommentObject>> {
        self.comments.get(&objtype).cloned()
    }

    pub fn like_object(&self, objtype: ObjectType) -> Option<Arc<dyn LikeObject>> {
        self.likes.get(&objtype).cloned()
    }
}
