//! Repository for the `view_records` table (one row per distinct viewer).

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use sqlx::PgPool;

pub struct ViewRecordRepo;

impl ViewRecordRepo {
    /// Remember that `uid` viewed the object. Repeated views are no-ops.
    pub async fn upsert(
        pool: &PgPool,
        objid: DbId,
        objtype: ObjectType,
        uid: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO view_records (objid, objtype, uid) VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(objid)
        .bind(objtype.as_i16())
        .bind(uid)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Number of distinct signed-in users that viewed the object.
    pub async fn count_users(
        pool: &PgPool,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM view_records WHERE objid = $1 AND objtype = $2",
        )
        .bind(objid)
        .bind(objtype.as_i16())
        .fetch_one(pool)
        .await
    }
}
