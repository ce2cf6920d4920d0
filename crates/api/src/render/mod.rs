//! Page rendering.
//!
//! Handlers describe a page as a [`View`]: a template name plus a JSON
//! context. A [`PageRenderer`] turns the view into a response, either as
//! server-rendered HTML ([`html::HtmlRenderer`]) or as the raw context
//! ([`JsonRenderer`]).

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::RenderMode;

pub mod html;

/// Project list page.
pub const LIST: &str = "projects/list.html";
/// Project submission and edit form.
pub const FORM: &str = "projects/new.html";
/// Project detail page.
pub const DETAIL: &str = "projects/detail.html";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Failed to serialize view data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A template name and the context it is rendered with.
#[derive(Debug, Clone)]
pub struct View {
    pub template: &'static str,
    pub data: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            data: Map::new(),
        }
    }

    /// Add a context entry, replacing any previous value under `key`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Result<Self, RenderError> {
        self.data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

pub trait PageRenderer: Send + Sync {
    fn render(&self, view: &View) -> Result<Response, RenderError>;
}

/// Answers with `{"template": ..., "data": ...}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl PageRenderer for JsonRenderer {
    fn render(&self, view: &View) -> Result<Response, RenderError> {
        let body = json!({
            "template": view.template,
            "data": view.data,
        });
        Ok(Json(body).into_response())
    }
}

pub fn renderer_for(mode: RenderMode) -> Arc<dyn PageRenderer> {
    match mode {
        RenderMode::Html => Arc::new(html::HtmlRenderer),
        RenderMode::Json => Arc::new(JsonRenderer),
    }
}
