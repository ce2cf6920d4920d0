//! Likes and comments on any registered object type.
//!
//! These endpoints answer with the `{errno, msg, data}` envelope. Validation
//! problems and missing targets are reported with their message; anything
//! else is logged and reported as a generic failure.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::types::{parse_id, DbId};
use serde::Deserialize;

use crate::logic::LogicError;
use crate::middleware::auth::AuthUser;
use crate::query::CommentListParams;
use crate::response::{fail, success, Envelope, ERRNO_FAILED, INTERNAL_ERROR_MSG};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LikeForm {
    pub objtype: String,
    /// `1` to like, anything else to unlike.
    pub flag: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub objtype: String,
    pub content: String,
}

/// POST /like/{objid}
pub async fn like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(objid): Path<String>,
    Form(form): Form<LikeForm>,
) -> Response {
    let (objid, objtype) = match target(Some(&objid), Some(&form.objtype)) {
        Ok(target) => target,
        Err(resp) => return resp.into_response(),
    };
    let liked = form.flag.trim() == "1";

    match state
        .logic
        .likes
        .like_object(user.user_id, objid, objtype, liked)
        .await
    {
        Ok(()) => success::<()>(None).into_response(),
        Err(e) => logic_failure(e, "Like failed").into_response(),
    }
}

/// POST /comment/{objid}
pub async fn comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(objid): Path<String>,
    Form(form): Form<CommentForm>,
) -> Response {
    let (objid, objtype) = match target(Some(&objid), Some(&form.objtype)) {
        Ok(target) => target,
        Err(resp) => return resp.into_response(),
    };

    match state
        .logic
        .comments
        .publish(user.user_id, objid, objtype, &form.content)
        .await
    {
        Ok(comment) => success(Some(comment)).into_response(),
        Err(e) => logic_failure(e, "Comment failed").into_response(),
    }
}

/// GET /object/comments?objid=&objtype=
pub async fn list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> Response {
    let (objid, objtype) = match target(params.objid.as_deref(), params.objtype.as_deref()) {
        Ok(target) => target,
        Err(resp) => return resp.into_response(),
    };

    match state
        .logic
        .comments
        .find_object_comments(objid, objtype)
        .await
    {
        Ok(comments) => success(Some(comments)).into_response(),
        Err(e) => logic_failure(e, "Loading comments failed").into_response(),
    }
}

/// Parse the `(objid, objtype)` pair an interaction targets.
fn target(
    objid: Option<&str>,
    objtype: Option<&str>,
) -> Result<(DbId, ObjectType), Json<Envelope<()>>> {
    let objid = parse_id(objid);
    if objid == 0 {
        return Err(fail(ERRNO_FAILED, "Invalid object id"));
    }
    let objtype = objtype
        .unwrap_or_default()
        .trim()
        .parse::<i16>()
        .map_err(|_| CoreError::validation("Invalid object type"))
        .and_then(ObjectType::try_from)
        .map_err(|e| fail(ERRNO_FAILED, e.to_string()))?;
    Ok((objid, objtype))
}

fn logic_failure(err: LogicError, context: &'static str) -> Json<Envelope<()>> {
    match err {
        LogicError::Core(CoreError::Validation(msg)) => fail(ERRNO_FAILED, msg),
        LogicError::Core(CoreError::NotFound { entity, .. }) => {
            fail(ERRNO_FAILED, format!("{entity} does not exist"))
        }
        other => {
            tracing::error!(error = %other, "{context}");
            fail(ERRNO_FAILED, INTERNAL_ERROR_MSG)
        }
    }
}
