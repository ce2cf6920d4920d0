//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument. Writes that must commit
//! together with a counter update take the open transaction instead.

pub mod comment_repo;
pub mod favorite_repo;
pub mod like_repo;
pub mod project_repo;
pub mod view_record_repo;
pub mod view_source_repo;

pub use comment_repo::CommentRepo;
pub use favorite_repo::FavoriteRepo;
pub use like_repo::LikeRepo;
pub use project_repo::ProjectRepo;
pub use view_record_repo::ViewRecordRepo;
pub use view_source_repo::ViewSourceRepo;
