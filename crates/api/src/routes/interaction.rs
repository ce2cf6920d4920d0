//! Route definitions for likes and comments.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::interaction;
use crate::middleware::sensitive::reject_sensitive;
use crate::state::AppState;

/// ```text
/// POST  /like/{objid}        -> like
/// POST  /comment/{objid}     -> comment
/// GET   /object/comments     -> list_comments
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    let comment = Router::new()
        .route("/comment/{objid}", post(interaction::comment))
        .route_layer(from_fn_with_state(state.clone(), reject_sensitive));

    Router::new()
        .route("/like/{objid}", post(interaction::like))
        .route("/object/comments", get(interaction::list_comments))
        .merge(comment)
}
