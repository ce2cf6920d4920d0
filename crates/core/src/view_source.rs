//! Classification of page views by the site that referred them.

use serde::Serialize;

/// Where a visitor came from, judged by the `Referer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Google,
    Baidu,
    Bing,
    Sogou,
    So,
    Other,
}

/// Per-source view tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub google: i64,
    pub baidu: i64,
    pub bing: i64,
    pub sogou: i64,
    pub so: i64,
    pub other: i64,
}

impl SourceCounts {
    pub fn add(&mut self, kind: SourceKind) {
        match kind {
            SourceKind::Google => self.google += 1,
            SourceKind::Baidu => self.baidu += 1,
            SourceKind::Bing => self.bing += 1,
            SourceKind::Sogou => self.sogou += 1,
            SourceKind::So => self.so += 1,
            SourceKind::Other => self.other += 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Classify a referer URL.
///
/// Returns `None` for direct visits (no referer) and for internal navigation,
/// i.e. referers whose host ends with `site_domain`.
pub fn classify_referer(referer: Option<&str>, site_domain: &str) -> Option<SourceKind> {
    let referer = referer.map(str::trim).filter(|r| !r.is_empty())?;
    let host = match url::Url::parse(referer) {
        Ok(url) => url.host_str().unwrap_or_default().to_lowercase(),
        Err(_) => return Some(SourceKind::Other),
    };

    let site_domain = site_domain.trim().to_lowercase();
    if !site_domain.is_empty() && host.ends_with(&site_domain) {
        return None;
    }

    let kind = if host.contains("google.") {
        SourceKind::Google
    } else if host.contains("baidu.com") {
        SourceKind::Baidu
    } else if host.contains("bing.com") {
        SourceKind::Bing
    } else if host.contains("sogou.com") {
        SourceKind::Sogou
    } else if host.contains("so.com") {
        SourceKind::So
    } else {
        SourceKind::Other
    };
    Some(kind)
}
