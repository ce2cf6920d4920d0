use opencircle_core::types::DbId;
use opencircle_core::view_source::SourceCounts;
use serde::Serialize;
use sqlx::FromRow;

/// Referer tallies for one object, from the `view_sources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ViewSource {
    pub objid: DbId,
    pub objtype: i16,
    pub google: i64,
    pub baidu: i64,
    pub bing: i64,
    pub sogou: i64,
    pub so: i64,
    pub other: i64,
}

impl ViewSource {
    pub fn counts(&self) -> SourceCounts {
        SourceCounts {
            google: self.google,
            baidu: self.baidu,
            bing: self.bing,
            sogou: self.sogou,
            so: self.so,
            other: self.other,
        }
    }
}
