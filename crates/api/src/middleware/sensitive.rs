//! Rejects form submissions containing configured sensitive words.
//!
//! Applied as a route layer to the publish and comment routes. Only `POST`
//! bodies are inspected; the body is buffered, screened, and handed on
//! unchanged.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::response::{fail, ERRNO_FAILED};
use crate::state::AppState;

/// Largest form body the screen will buffer.
const MAX_FORM_BYTES: usize = 1024 * 1024;

pub const SENSITIVE_CONTENT_MSG: &str = "Your submission contains sensitive words";

pub async fn reject_sensitive(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST || state.sensitive.is_empty() {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, path = %parts.uri.path(), "Unreadable form body");
            return fail(ERRNO_FAILED, "Request body too large or unreadable").into_response();
        }
    };

    let hit = url::form_urlencoded::parse(&bytes).find_map(|(field, value)| {
        state
            .sensitive
            .find(&value)
            .map(|word| (field.into_owned(), word.to_string()))
    });

    if let Some((field, word)) = hit {
        tracing::warn!(path = %parts.uri.path(), %field, %word, "Submission rejected: sensitive word");
        return fail(ERRNO_FAILED, SENSITIVE_CONTENT_MSG).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
