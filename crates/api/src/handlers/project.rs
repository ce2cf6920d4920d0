//! Handlers for the project pages: listing, publishing, detail, and the
//! uri availability check.

use std::collections::HashMap;

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::REFERER;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use opencircle_core::object_type::ObjectType;
use opencircle_core::pagination::{fetch_size, paginate, CursorPage, PAGE_SIZE};
use opencircle_core::project::ProjectForm;
use opencircle_core::types::{parse_id, DbId};
use opencircle_core::view_source::SourceCounts;
use opencircle_db::models::project::Project;

use crate::error::AppResult;
use crate::logic::LogicError;
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::query::{IdParams, ListParams, UriParams};
use crate::render::{View, DETAIL, FORM, LIST};
use crate::response::{fail, success, ERRNO_FAILED, INTERNAL_ERROR_MSG};
use crate::state::AppState;
use crate::tracking::ViewerKey;

/// Where invalid or stale requests are sent back to.
pub const LIST_PATH: &str = "/projects";

/// Body of the 403 answer to a modify attempt by someone other than the owner.
pub const NO_MODIFY_PERMISSION_MSG: &str = "No permission to modify this project";

const ACTIVE_NAV: &str = "projects";

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let last_id = parse_id(params.lastid.as_deref());
    let limit = PAGE_SIZE;

    let fetched = state
        .logic
        .projects
        .find_by(fetch_size(limit), last_id)
        .await?;

    let view = View::new(LIST).with("active_nav", ACTIVE_NAV)?;
    let view = match paginate(fetched, last_id, limit, |p: &Project| p.id) {
        CursorPage::Stale => return Ok(Redirect::to(LIST_PATH).into_response()),
        CursorPage::Empty => view.with("projects", Vec::<Project>::new())?,
        CursorPage::Page { items, info } => {
            let mut view = view.with("page", info)?;
            if let (Some(me), Some(first), Some(last)) = (&user, items.first(), items.last()) {
                let likeflags = state
                    .logic
                    .likes
                    .find_user_like_objects(me.user_id, ObjectType::Project, first.id, last.id)
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(error = %e, user_id = me.user_id, "Failed to load like flags");
                        HashMap::new()
                    });
                view = view.with("likeflags", likeflags)?;
            }
            view.with("projects", items)?
        }
    };

    Ok(state.renderer.render(&view)?)
}

/// GET /project/new
pub async fn new_form(State(state): State<AppState>, _user: AuthUser) -> AppResult<Response> {
    let view = View::new(FORM).with("active_nav", ACTIVE_NAV)?;
    Ok(state.renderer.render(&view)?)
}

/// POST /project/new
///
/// A submission without a name shows the form again. Publish failures are
/// reported with the generic failure envelope.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Form(mut form): Form<ProjectForm>,
) -> AppResult<Response> {
    if form.name.trim().is_empty() {
        return new_form(State(state), user).await;
    }

    // Creation never targets an existing record.
    form.id.clear();

    match state.logic.projects.publish(&user, form).await {
        Ok(_) => Ok(success::<()>(None).into_response()),
        Err(e) => {
            tracing::error!(error = %e, user_id = user.user_id, "Project publish failed");
            Ok(fail(ERRNO_FAILED, INTERNAL_ERROR_MSG).into_response())
        }
    }
}

/// GET /project/modify?id=
pub async fn modify_form(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<IdParams>,
) -> AppResult<Response> {
    let id = modify_target(None, params.id.as_deref());
    if id == 0 {
        return Ok(Redirect::to(LIST_PATH).into_response());
    }

    let Some(project) = state.logic.projects.find_by_id(id).await? else {
        return Ok(Redirect::to(LIST_PATH).into_response());
    };

    let view = View::new(FORM)
        .with("active_nav", ACTIVE_NAV)?
        .with("project", project)?;
    Ok(state.renderer.render(&view)?)
}

/// POST /project/modify
///
/// The target id comes from the form body, or from the query string when the
/// body carries none. Without a target the request is sent back to the list
/// before the body is looked at.
pub async fn modify(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<IdParams>,
    body: Result<Form<ProjectForm>, FormRejection>,
) -> Response {
    let form_id = body.as_ref().ok().map(|Form(form)| form.id.as_str());
    let id = modify_target(form_id, params.id.as_deref());
    if id == 0 {
        return Redirect::to(LIST_PATH).into_response();
    }
    let mut form = match body {
        Ok(Form(form)) => form,
        Err(rejection) => return rejection.into_response(),
    };
    form.id = id.to_string();

    match state.logic.projects.publish(&user, form).await {
        Ok(_) => success::<()>(None).into_response(),
        Err(LogicError::NotModifyAuthority { .. }) => {
            (StatusCode::FORBIDDEN, NO_MODIFY_PERMISSION_MSG).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, project_id = id, user_id = user.user_id, "Project modify failed");
            fail(ERRNO_FAILED, INTERNAL_ERROR_MSG).into_response()
        }
    }
}

/// A positive `id` in the form wins over the query string.
fn modify_target(form_id: Option<&str>, query_id: Option<&str>) -> DbId {
    match parse_id(form_id) {
        0 => parse_id(query_id),
        id => id,
    }
}

/// GET /p/{uri}
///
/// Counts the view, queues a viewer record for signed-in non-owners, and
/// shows analytics to the owner and administrators.
pub async fn detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: HeaderMap,
    Path(uri): Path<String>,
) -> AppResult<Response> {
    let mut project = match state.logic.projects.find_by_uri(&uri).await {
        Ok(Some(project)) if project.id != 0 => project,
        Ok(_) => return Ok(Redirect::to(LIST_PATH).into_response()),
        Err(e) => {
            tracing::error!(error = %e, %uri, "Failed to load project");
            return Ok(Redirect::to(LIST_PATH).into_response());
        }
    };

    let referer = headers.get(REFERER).and_then(|v| v.to_str().ok());
    let mut view = View::new(DETAIL).with("active_nav", ACTIVE_NAV)?;

    match &user {
        Some(me) => {
            let likeflag = flag_or_false(
                state
                    .logic
                    .likes
                    .had_like(me.user_id, project.id, ObjectType::Project)
                    .await,
                "like",
            );
            let hadcollect = flag_or_false(
                state
                    .logic
                    .favorites
                    .had_favorite(me.user_id, project.id, ObjectType::Project)
                    .await,
                "favorite",
            );
            view = view.with("likeflag", likeflag)?.with("hadcollect", hadcollect)?;

            state.view_counter.incr(
                ObjectType::Project,
                project.id,
                &ViewerKey::User(me.user_id),
                referer,
            );

            let is_owner = me.user_id == project.user_id;
            if !is_owner {
                state
                    .view_recorder
                    .record(project.id, ObjectType::Project, me.user_id);
            }
            if is_owner || me.is_admin() {
                view = with_analytics(&state, view, project.id).await?;
            }
        }
        None => {
            state.view_counter.incr(
                ObjectType::Project,
                project.id,
                &ViewerKey::from_request(None, &headers),
                referer,
            );
        }
    }

    project.viewnum += 1;
    let view = view.with("project", project)?;
    Ok(state.renderer.render(&view)?)
}

async fn with_analytics(state: &AppState, view: View, project_id: DbId) -> AppResult<View> {
    let views = &state.logic.views;
    let viewer_count = views
        .viewer_count(project_id, ObjectType::Project)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, project_id, "Failed to count viewers");
            0
        });
    let sources = match views.view_source(project_id, ObjectType::Project).await {
        Ok(source) => source.map(|s| s.counts()).unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, project_id, "Failed to load view sources");
            SourceCounts::default()
        }
    };
    Ok(view
        .with("view_user_num", viewer_count)?
        .with("view_source", sources)?)
}

fn flag_or_false(result: Result<bool, LogicError>, what: &'static str) -> bool {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, flag = what, "Failed to load viewer flag");
        false
    })
}

/// GET /project/uri?uri=
///
/// The answer is inverted: `"true"` means the uri is still free, `"false"`
/// means a project already uses it.
pub async fn check_uri(
    State(state): State<AppState>,
    Query(params): Query<UriParams>,
) -> Json<&'static str> {
    let uri = params.uri.trim();
    if uri.is_empty() {
        return Json("true");
    }

    match state.logic.projects.uri_exists(uri).await {
        Ok(true) => Json("false"),
        Ok(false) => Json("true"),
        Err(e) => {
            tracing::error!(error = %e, %uri, "Failed to check uri");
            Json("true")
        }
    }
}
