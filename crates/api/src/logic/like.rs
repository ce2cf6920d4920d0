//! Postgres-backed likes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_db::repositories::LikeRepo;
use opencircle_db::DbPool;

use super::registry::ObjectRegistry;
use super::{LikeLogic, LogicResult};

pub struct PgLikeLogic {
    pool: DbPool,
    registry: Arc<ObjectRegistry>,
}

impl PgLikeLogic {
    pub fn new(pool: DbPool, registry: Arc<ObjectRegistry>) -> Self {
        Self { pool, registry }
    }
}

#[async_trait]
impl LikeLogic for PgLikeLogic {
    async fn find_user_like_objects(
        &self,
        uid: DbId,
        objtype: ObjectType,
        start_id: DbId,
        end_id: DbId,
    ) -> LogicResult<HashMap<DbId, bool>> {
        let (min_id, max_id) = if start_id <= end_id {
            (start_id, end_id)
        } else {
            (end_id, start_id)
        };
        let ids = LikeRepo::liked_ids_between(&self.pool, uid, objtype, min_id, max_id).await?;
        Ok(ids.into_iter().map(|id| (id, true)).collect())
    }

    async fn had_like(&self, uid: DbId, objid: DbId, objtype: ObjectType) -> LogicResult<bool> {
        Ok(LikeRepo::exists(&self.pool, uid, objid, objtype).await?)
    }

    async fn like_object(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        liked: bool,
    ) -> LogicResult<()> {
        let handler = self.registry.like_object(objtype).ok_or_else(|| {
            CoreError::Validation(format!("Objects of type {objtype} cannot be liked"))
        })?;

        let mut tx = self.pool.begin().await?;
        let changed = if liked {
            LikeRepo::insert(&mut tx, uid, objid, objtype).await?
        } else {
            LikeRepo::delete(&mut tx, uid, objid, objtype).await?
        };

        if changed {
            handler.on_like(&mut tx, objid, uid, liked).await?;
        }
        tx.commit().await?;

        if changed {
            tracing::debug!(uid, objid, %objtype, liked, "Like state changed");
        }
        Ok(())
    }
}
