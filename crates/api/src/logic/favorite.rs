use async_trait::async_trait;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_db::repositories::FavoriteRepo;
use opencircle_db::DbPool;

use super::{FavoriteLogic, LogicResult};

pub struct PgFavoriteLogic {
    pool: DbPool,
}

impl PgFavoriteLogic {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteLogic for PgFavoriteLogic {
    async fn had_favorite(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
    ) -> LogicResult<bool> {
        Ok(FavoriteRepo::exists(&self.pool, uid, objid, objtype).await?)
    }
}
