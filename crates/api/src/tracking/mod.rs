//! Page view tracking for detail pages.
//!
//! - [`counter::ViewCounter`] -- In-memory view and referer tallies, flushed
//!   periodically by [`crate::background::view_flush`].
//! - [`recorder::ViewRecorder`] -- Bounded queue of per-user view records.

pub mod counter;
pub mod recorder;

pub use counter::{ViewCounter, ViewerKey};
pub use recorder::ViewRecorder;
