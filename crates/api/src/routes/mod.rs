pub mod health;
pub mod interaction;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the page and interaction route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                  project list (cursor: ?lastid=)
/// /project/new               submission form, publish (login, screened)
/// /project/modify            edit form, publish (login, screened, ?id=)
/// /project/uri               uri availability (?uri=)
/// /p/{uri}                   project detail
///
/// /like/{objid}              like / unlike (login)
/// /comment/{objid}           post a comment (login, screened)
/// /object/comments           list an object's comments
/// ```
///
/// `state` is needed up front to attach the sensitive-word screen.
pub fn app_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(project::router(state))
        .merge(interaction::router(state))
}
