//! Repository for the `view_sources` table.

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_core::view_source::SourceCounts;
use sqlx::PgPool;

use crate::models::view_source::ViewSource;

pub struct ViewSourceRepo;

impl ViewSourceRepo {
    pub async fn find(
        pool: &PgPool,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<Option<ViewSource>, sqlx::Error> {
        sqlx::query_as::<_, ViewSource>(
            "SELECT objid, objtype, google, baidu, bing, sogou, so, other
             FROM view_sources WHERE objid = $1 AND objtype = $2",
        )
        .bind(objid)
        .bind(objtype.as_i16())
        .fetch_optional(pool)
        .await
    }

    /// Add `counts` to the object's tallies, creating the row on first use.
    pub async fn add(
        pool: &PgPool,
        objid: DbId,
        objtype: ObjectType,
        counts: &SourceCounts,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO view_sources (objid, objtype, google, baidu, bing, sogou, so, other)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (objid, objtype) DO UPDATE SET
                google = view_sources.google + EXCLUDED.google,
                baidu = view_sources.baidu + EXCLUDED.baidu,
                bing = view_sources.bing + EXCLUDED.bing,
                sogou = view_sources.sogou + EXCLUDED.sogou,
                so = view_sources.so + EXCLUDED.so,
                other = view_sources.other + EXCLUDED.other",
        )
        .bind(objid)
        .bind(objtype.as_i16())
        .bind(counts.google)
        .bind(counts.baidu)
        .bind(counts.bing)
        .bind(counts.sogou)
        .bind(counts.so)
        .bind(counts.other)
        .execute(pool)
        .await?;
        Ok(())
    }
}
