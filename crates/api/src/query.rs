//! Shared query parameter types for page handlers.
//!
//! Ids arrive as raw strings and go through
//! [`opencircle_core::types::parse_id`], so a malformed value reads as 0
//! instead of failing the request.

use serde::Deserialize;

/// Cursor for the project listing (`?lastid=`).
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub lastid: Option<String>,
}

/// Target record of the modify form (`?id=`).
#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

/// Slug to check for availability (`?uri=`).
#[derive(Debug, Default, Deserialize)]
pub struct UriParams {
    #[serde(default)]
    pub uri: String,
}

/// Object whose comments are listed (`?objid=&objtype=`).
#[derive(Debug, Default, Deserialize)]
pub struct CommentListParams {
    pub objid: Option<String>,
    pub objtype: Option<String>,
}
