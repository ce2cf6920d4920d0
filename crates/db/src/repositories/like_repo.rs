//! Repository for the `likes` table.

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

pub struct LikeRepo;

impl LikeRepo {
    /// Record a like. Returns `false` if the user already liked the object.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO likes (uid, objtype, objid) VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING",
        )
        .bind(uid)
        .bind(objtype.as_i16())
        .bind(objid)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a like. Returns `false` if there was nothing to remove.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM likes WHERE uid = $1 AND objtype = $2 AND objid = $3")
                .bind(uid)
                .bind(objtype.as_i16())
                .bind(objid)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(
        pool: &PgPool,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE uid = $1 AND objtype = $2 AND objid = $3)",
        )
        .bind(uid)
        .bind(objtype.as_i16())
        .bind(objid)
        .fetch_one(pool)
        .await
    }

    /// Ids of objects of `objtype` liked by `uid` with `min_id <= objid <= max_id`.
    pub async fn liked_ids_between(
        pool: &PgPool,
        uid: DbId,
        objtype: ObjectType,
        min_id: DbId,
        max_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT objid FROM likes
             WHERE uid = $1 AND objtype = $2 AND objid BETWEEN $3 AND $4",
        )
        .bind(uid)
        .bind(objtype.as_i16())
        .bind(min_id)
        .bind(max_id)
        .fetch_all(pool)
        .await
    }
}
