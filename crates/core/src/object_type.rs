//! Object type tags shared by likes, favorites, comments, and view tracking.
//!
//! Every interactive entity on the site is addressed by `(objtype, objid)`.
//! The integer tags are stored in the database and sent in forms, so they
//! must never be renumbered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum ObjectType {
    Topic,
    Article,
    Resource,
    Wiki,
    Project,
    Book,
}

impl ObjectType {
    /// The tag stored in `objtype` columns.
    pub fn as_i16(self) -> i16 {
        match self {
            ObjectType::Topic => 0,
            ObjectType::Article => 1,
            ObjectType::Resource => 2,
            ObjectType::Wiki => 3,
            ObjectType::Project => 4,
            ObjectType::Book => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Topic => "topic",
            ObjectType::Article => "article",
            ObjectType::Resource => "resource",
            ObjectType::Wiki => "wiki",
            ObjectType::Project => "project",
            ObjectType::Book => "book",
        }
    }
}

impl TryFrom<i16> for ObjectType {
    type Error = CoreError;

    fn try_from(tag: i16) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ObjectType::Topic),
            1 => Ok(ObjectType::Article),
            2 => Ok(ObjectType::Resource),
            3 => Ok(ObjectType::Wiki),
            4 => Ok(ObjectType::Project),
            5 => Ok(ObjectType::Book),
            other => Err(CoreError::Validation(format!(
                "Unknown object type: {other}"
            ))),
        }
    }
}

impl From<ObjectType> for i16 {
    fn from(value: ObjectType) -> Self {
        value.as_i16()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
