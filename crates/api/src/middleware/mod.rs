//! Authentication extractors and request middleware.
//!
//! - [`auth::AuthUser`] -- Requires a signed-in user (JWT Bearer token).
//! - [`auth::MaybeUser`] -- Signed-in user if any, anonymous otherwise.
//! - [`sensitive::reject_sensitive`] -- Screens posted forms for sensitive words.

pub mod auth;
pub mod sensitive;
