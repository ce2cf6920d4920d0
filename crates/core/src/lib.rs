//! Domain types and pure rules for the open-source project pages.
//!
//! Nothing in this crate performs I/O; persistence lives in `opencircle-db`
//! and HTTP wiring in `opencircle-api`.

pub mod error;
pub mod object_type;
pub mod pagination;
pub mod project;
pub mod roles;
pub mod sensitive;
pub mod types;
pub mod view_source;
