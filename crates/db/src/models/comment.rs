//! Comment entity model.

use opencircle_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub objid: DbId,
    /// Raw object type tag; see [`opencircle_core::object_type::ObjectType`].
    pub objtype: i16,
    pub uid: DbId,
    /// 1-based position among the object's comments.
    pub floor: i32,
    pub content: String,
    pub created_at: Timestamp,
}
