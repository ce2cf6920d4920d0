//! Postgres-backed view tracking.

use async_trait::async_trait;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_core::view_source::SourceCounts;
use opencircle_db::models::view_source::ViewSource;
use opencircle_db::repositories::{ProjectRepo, ViewRecordRepo, ViewSourceRepo};
use opencircle_db::DbPool;

use super::{LogicResult, ViewLogic};

pub struct PgViewLogic {
    pool: DbPool,
}

impl PgViewLogic {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewLogic for PgViewLogic {
    async fn record_viewer(&self, objid: DbId, objtype: ObjectType, uid: DbId) -> LogicResult<()> {
        Ok(ViewRecordRepo::upsert(&self.pool, objid, objtype, uid).await?)
    }

    async fn viewer_count(&self, objid: DbId, objtype: ObjectType) -> LogicResult<i64> {
        Ok(ViewRecordRepo::count_users(&self.pool, objid, objtype).await?)
    }

    async fn view_source(
        &self,
        objid: DbId,
        objtype: ObjectType,
    ) -> LogicResult<Option<ViewSource>> {
        Ok(ViewSourceRepo::find(&self.pool, objid, objtype).await?)
    }

    async fn persist_views(
        &self,
        objtype: ObjectType,
        objid: DbId,
        views: i64,
        sources: &SourceCounts,
    ) -> LogicResult<()> {
        match objtype {
            ObjectType::Project => {
                if views > 0 {
                    ProjectRepo::incr_viewnum(&self.pool, objid, views).await?;
                }
            }
            // Only projects are stored in this service.
            other => {
                tracing::debug!(objtype = %other, objid, views, "No view counter for object type");
                return Ok(());
            }
        }

        if !sources.is_empty() {
            ViewSourceRepo::add(&self.pool, objid, objtype, sources).await?;
        }
        Ok(())
    }
}
