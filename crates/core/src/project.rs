//! Project publish form, normalization, and edit permission rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{parse_id, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Newly submitted, not yet reviewed. Still listed.
pub const STATUS_NEW: i16 = 0;
/// Published and listed.
pub const STATUS_ONLINE: i16 = 1;
/// Taken down; hidden from listings and detail pages.
pub const STATUS_OFFLINE: i16 = 2;

/// Maximum length of a project name (in characters).
const MAX_NAME_LEN: usize = 100;

/// Maximum length of a text field other than the description.
const MAX_FIELD_LEN: usize = 255;

const GITHUB_PREFIX: &str = "https://github.com/";
const GO_DOC_PREFIX: &str = "https://pkg.go.dev/";

static URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]{0,63}$").expect("uri pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw project submission as posted by the new/modify form.
///
/// Every field is a plain string so that a partially filled form still
/// deserializes; [`ProjectForm::into_draft`] applies the rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    /// Empty when creating; the project id when modifying.
    pub id: String,
    pub name: String,
    pub category: String,
    pub uri: String,
    pub home: String,
    pub doc: String,
    pub download: String,
    pub src: String,
    pub logo: String,
    pub description: String,
    pub repo: String,
    pub author: String,
    pub licence: String,
    pub lang: String,
    pub os: String,
    pub tags: String,
}

/// A validated, normalized submission ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub category: String,
    pub uri: String,
    pub home: String,
    pub doc: String,
    pub download: String,
    pub src: String,
    pub logo: String,
    pub description: String,
    pub repo: String,
    pub author: String,
    pub licence: String,
    pub lang: String,
    pub os: String,
    pub tags: String,
}

impl ProjectForm {
    /// The id being modified, or `0` for a new project.
    pub fn target_id(&self) -> DbId {
        parse_id(Some(&self.id))
    }

    /// Trim, normalize, and validate the submission.
    pub fn into_draft(self) -> Result<ProjectDraft, CoreError> {
        let name = self.name.trim().to_string();
        validate_name(&name)?;

        let uri = normalize_uri(&self.uri);
        validate_uri(&uri)?;

        let src = self.src.trim().to_string();
        let mut doc = self.doc.trim().to_string();
        if doc.is_empty() {
            doc = default_doc(&src).unwrap_or_default();
        }

        let draft = ProjectDraft {
            name,
            category: self.category.trim().to_string(),
            uri,
            home: self.home.trim().to_string(),
            doc,
            download: self.download.trim().to_string(),
            src,
            logo: self.logo.trim().to_string(),
            description: self.description.trim().to_string(),
            repo: self.repo.trim().to_string(),
            author: self.author.trim().to_string(),
            licence: self.licence.trim().to_string(),
            lang: self.lang.trim().to_string(),
            os: self.os.trim().to_string(),
            tags: self.tags.trim().to_string(),
        };

        for (field, value) in [
            ("category", &draft.category),
            ("home", &draft.home),
            ("doc", &draft.doc),
            ("download", &draft.download),
            ("src", &draft.src),
            ("logo", &draft.logo),
            ("repo", &draft.repo),
            ("author", &draft.author),
            ("licence", &draft.licence),
            ("lang", &draft.lang),
            ("os", &draft.os),
            ("tags", &draft.tags),
        ] {
            if value.chars().count() > MAX_FIELD_LEN {
                return Err(CoreError::Validation(format!(
                    "Field {field} must not exceed {MAX_FIELD_LEN} characters"
                )));
            }
        }

        Ok(draft)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Lower-case and trim a uri slug. Lookups and uniqueness are case-insensitive.
pub fn normalize_uri(uri: &str) -> String {
    uri.trim().to_lowercase()
}

/// Validate a project name.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_NAME_LEN` characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("Project name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Project name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a normalized uri slug: lower-case alphanumerics plus `.`, `_`,
/// `-`, starting with an alphanumeric, at most 64 characters.
pub fn validate_uri(uri: &str) -> Result<(), CoreError> {
    if uri.is_empty() {
        return Err(CoreError::validation("Project uri must not be empty"));
    }
    if !URI_PATTERN.is_match(uri) {
        return Err(CoreError::Validation(format!(
            "Project uri \"{uri}\" may only contain a-z, 0-9, '.', '_' or '-' (max 64)"
        )));
    }
    Ok(())
}

/// Documentation link derived from a GitHub source URL.
pub fn default_doc(src: &str) -> Option<String> {
    let path = src.strip_prefix(GITHUB_PREFIX)?.trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("{GO_DOC_PREFIX}github.com/{path}"))
}

/// Whether `actor_id` may modify a project owned by `owner_id`.
pub fn can_edit(actor_id: DbId, actor_is_admin: bool, owner_id: DbId) -> bool {
    actor_is_admin || actor_id == owner_id
}
