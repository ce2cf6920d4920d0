//! JSON envelopes for form submissions and interaction endpoints.
//!
//! Every ajax-style endpoint answers with HTTP 200 and an envelope:
//! `{"errno": 0, "msg": "", "data": ...}` on success and
//! `{"errno": <code>, "msg": "..."}` on failure. The page JavaScript keys
//! off `errno`, not the HTTP status.

use axum::Json;
use serde::Serialize;

/// Generic user-facing message for failures whose detail must not leak.
pub const INTERNAL_ERROR_MSG: &str = "Internal server error!";

/// `errno` for a generic failure.
pub const ERRNO_FAILED: i32 = 1;

/// Standard `{ errno, msg, data }` response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub errno: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Success envelope, optionally carrying a payload.
pub fn success<T: Serialize>(data: Option<T>) -> Json<Envelope<T>> {
    Json(Envelope {
        errno: 0,
        msg: String::new(),
        data,
    })
}

/// Failure envelope with an error number and a user-facing message.
pub fn fail(errno: i32, msg: impl Into<String>) -> Json<Envelope<()>> {
    Json(Envelope {
        errno,
        msg: msg.into(),
        data: None,
    })
}
