//! Repository for the `favorites` table.

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use sqlx::PgPool;

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Whether `uid` has collected the object.
    pub async fn exists(
        pool: &PgPool,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE uid = $1 AND objtype = $2 AND objid = $3)",
        )
        .bind(uid)
        .bind(objtype.as_i16())
        .bind(objid)
        .fetch_one(pool)
        .await
    }
}
