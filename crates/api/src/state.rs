use std::sync::Arc;

use opencircle_core::sensitive::SensitiveFilter;

use crate::config::ServerConfig;
use crate::logic::Logic;
use crate::render::PageRenderer;
use crate::tracking::{ViewCounter, ViewRecorder};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT secret, render mode, tracking settings).
    pub config: Arc<ServerConfig>,
    /// Business-logic services.
    pub logic: Logic,
    /// Turns handler views into HTML or JSON responses.
    pub renderer: Arc<dyn PageRenderer>,
    /// Buffered page views, flushed by `background::view_flush`.
    pub view_counter: Arc<ViewCounter>,
    /// Queue of per-user view records.
    pub view_recorder: ViewRecorder,
    /// Words rejected in submitted forms.
    pub sensitive: Arc<SensitiveFilter>,
}
