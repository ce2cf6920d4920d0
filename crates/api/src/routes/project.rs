//! Route definitions for the project pages.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::middleware::sensitive::reject_sensitive;
use crate::state::AppState;

/// ```text
/// GET        /projects          -> list
/// GET, POST  /project/new       -> new_form, create
/// GET, POST  /project/modify    -> modify_form, modify
/// GET        /project/uri       -> check_uri
/// GET        /p/{uri}           -> detail
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    let publish = Router::new()
        .route("/project/new", get(project::new_form).post(project::create))
        .route(
            "/project/modify",
            get(project::modify_form).post(project::modify),
        )
        .route_layer(from_fn_with_state(state.clone(), reject_sensitive));

    Router::new()
        .route("/projects", get(project::list))
        .route("/project/uri", get(project::check_uri))
        .route("/p/{uri}", get(project::detail))
        .merge(publish)
}
