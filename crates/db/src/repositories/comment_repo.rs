//! Repository for the `comments` table.

use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::comment::Comment;

const COLUMNS: &str = "id, objid, objtype, uid, floor, content, created_at";

pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment at the next floor of the object.
    ///
    /// Two concurrent inserts on the same object race for the same floor; the
    /// loser fails on `uq_comments_object_floor` and surfaces as a conflict.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (objid, objtype, uid, floor, content)
             VALUES ($1, $2, $3,
                (SELECT COALESCE(MAX(floor), 0) + 1 FROM comments WHERE objid = $1 AND objtype = $2),
                $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(objid)
            .bind(objtype.as_i16())
            .bind(uid)
            .bind(content)
            .fetch_one(&mut **tx)
            .await
    }

    /// All comments of an object, oldest floor first.
    pub async fn list_for_object(
        pool: &PgPool,
        objid: DbId,
        objtype: ObjectType,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE objid = $1 AND objtype = $2 ORDER BY floor ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(objid)
            .bind(objtype.as_i16())
            .fetch_all(pool)
            .await
    }
}
