//! In-memory page view counter, flushed to the database periodically.
//!
//! Counting in memory keeps detail pages free of write queries. Each viewer
//! counts once per object per flush window; the window resets on
//! [`ViewCounter::drain`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::http::HeaderMap;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::DbId;
use opencircle_core::view_source::{classify_referer, SourceCounts};

/// Who is viewing, for de-duplication within a flush window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerKey {
    User(DbId),
    Ip(String),
    /// No identifying information; always counted.
    Unknown,
}

impl ViewerKey {
    /// Key a signed-in viewer by id, an anonymous one by the client address
    /// reported by the fronting proxy.
    pub fn from_request(user_id: Option<DbId>, headers: &HeaderMap) -> Self {
        if let Some(uid) = user_id {
            return ViewerKey::User(uid);
        }
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        match forwarded.or(real_ip) {
            Some(ip) => ViewerKey::Ip(ip.to_string()),
            None => ViewerKey::Unknown,
        }
    }

    fn dedup_token(&self) -> Option<String> {
        match self {
            ViewerKey::User(uid) => Some(format!("uid:{uid}")),
            ViewerKey::Ip(ip) => Some(format!("ip:{ip}")),
            ViewerKey::Unknown => None,
        }
    }
}

/// Views accumulated for one object since the last drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingViews {
    pub objtype: ObjectType,
    pub objid: DbId,
    pub views: i64,
    pub sources: SourceCounts,
}

#[derive(Default)]
struct Window {
    pending: HashMap<(ObjectType, DbId), (i64, SourceCounts)>,
    seen: HashSet<(ObjectType, DbId, String)>,
}

pub struct ViewCounter {
    site_domain: String,
    window: Mutex<Window>,
}

impl ViewCounter {
    pub fn new(site_domain: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
            window: Mutex::new(Window::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Window> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a view. Returns `false` if this viewer was already counted for
    /// the object in the current window.
    pub fn incr(
        &self,
        objtype: ObjectType,
        objid: DbId,
        viewer: &ViewerKey,
        referer: Option<&str>,
    ) -> bool {
        let source = classify_referer(referer, &self.site_domain);
        let mut window = self.lock();

        if let Some(token) = viewer.dedup_token() {
            if !window.seen.insert((objtype, objid, token)) {
                return false;
            }
        }

        let entry = window.pending.entry((objtype, objid)).or_default();
        entry.0 += 1;
        if let Some(kind) = source {
            entry.1.add(kind);
        }
        true
    }

    /// Views counted for an object and not yet drained.
    pub fn pending(&self, objtype: ObjectType, objid: DbId) -> i64 {
        self.lock()
            .pending
            .get(&(objtype, objid))
            .map(|(views, _)| *views)
            .unwrap_or(0)
    }

    /// Take everything counted so far and start a new window.
    pub fn drain(&self) -> Vec<PendingViews> {
        let window = std::mem::take(&mut *self.lock());
        window
            .pending
            .into_iter()
            .map(|((objtype, objid), (views, sources))| PendingViews {
                objtype,
                objid,
                views,
                sources,
            })
            .collect()
    }
}
