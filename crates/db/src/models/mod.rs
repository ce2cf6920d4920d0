//! Row types returned by the repositories.

pub mod comment;
pub mod project;
pub mod view_source;
