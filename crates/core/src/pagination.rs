//! Cursor pagination for id-descending listings.
//!
//! A page is requested with the id of the last record the client saw
//! (`lastid`, 0 for the first page). The caller fetches `limit + LOOKAHEAD`
//! rows with `id < lastid` so the presence of a next page is known without a
//! separate count query.

use serde::Serialize;

use crate::types::DbId;

/// Records shown per listing page.
pub const PAGE_SIZE: usize = 20;

/// Extra rows fetched beyond the page size to detect a next page.
pub const LOOKAHEAD: usize = 5;

/// How far the first returned id may trail the cursor and still count as a
/// contiguous previous page. Records taken offline leave gaps in the id
/// sequence, so exact adjacency cannot be required.
pub const PREV_DRIFT_TOLERANCE: DbId = 5;

/// Number of rows to request from the data source for one page.
pub const fn fetch_size(limit: usize) -> usize {
    limit + LOOKAHEAD
}

/// Navigation links for a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub has_prev: bool,
    pub prev_id: DbId,
    pub has_next: bool,
    pub next_id: DbId,
}

/// Outcome of paginating one fetch.
#[derive(Debug, PartialEq, Eq)]
pub enum CursorPage<T> {
    /// First page requested and nothing exists yet.
    Empty,
    /// A non-zero cursor matched nothing; the client should restart from the top.
    Stale,
    /// A page of at most `limit` items.
    Page { items: Vec<T>, info: PageInfo },
}

/// Slice a fetch of up to `limit + LOOKAHEAD` id-descending rows into a page.
pub fn paginate<T, F>(mut items: Vec<T>, last_id: DbId, limit: usize, id_of: F) -> CursorPage<T>
where
    F: Fn(&T) -> DbId,
{
    let Some(first) = items.first() else {
        return if last_id == 0 {
            CursorPage::Empty
        } else {
            CursorPage::Stale
        };
    };

    let mut has_prev = false;
    let mut prev_id = 0;
    if last_id > 0 {
        prev_id = last_id;
        if last_id - id_of(first) <= PREV_DRIFT_TOLERANCE {
            prev_id += limit as DbId;
            has_prev = true;
        }
    }

    let has_next = items.len() > limit;
    if has_next {
        items.truncate(limit);
    }
    let next_id = items.last().map(&id_of).unwrap_or(0);

    CursorPage::Page {
        items,
        info: PageInfo {
            has_prev,
            prev_id,
            has_next,
            next_id,
        },
    }
}
