//! Shared helpers for HTTP integration tests.
//!
//! The router is built with the production middleware stack but over
//! in-memory fakes of every logic trait, so no database is needed.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use opencircle_api::auth::jwt::{generate_access_token, JwtConfig};
use opencircle_api::config::{RenderMode, ServerConfig};
use opencircle_api::logic::{
    CommentLogic, FavoriteLogic, LikeLogic, Logic, LogicError, LogicResult, ProjectLogic,
    ViewLogic,
};
use opencircle_api::middleware::auth::AuthUser;
use opencircle_api::render::JsonRenderer;
use opencircle_api::router::build_app_router;
use opencircle_api::state::AppState;
use opencircle_api::tracking::{ViewCounter, ViewRecorder};
use opencircle_core::error::CoreError;
use opencircle_core::object_type::ObjectType;
use opencircle_core::project::{can_edit, ProjectForm, STATUS_ONLINE};
use opencircle_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use opencircle_core::sensitive::SensitiveFilter;
use opencircle_core::types::DbId;
use opencircle_core::view_source::SourceCounts;
use opencircle_db::models::comment::Comment;
use opencircle_db::models::project::Project;
use opencircle_db::models::view_source::ViewSource;

pub const SITE_DOMAIN: &str = "opencircle.test";
pub const SENSITIVE_WORD: &str = "forbidden";

// ---------------------------------------------------------------------------
// Configuration and tokens
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults and JSON rendering.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        render_mode: RenderMode::Json,
        site_domain: SITE_DOMAIN.to_string(),
        sensitive_words: vec![SENSITIVE_WORD.to_string()],
        view_flush_interval_secs: 60,
        view_record_queue: 16,
        view_record_workers: 1,
        jwt: test_jwt_config(),
    }
}

pub fn member_token(user_id: DbId) -> String {
    generate_access_token(user_id, &format!("user{user_id}"), ROLE_MEMBER, &test_jwt_config())
        .unwrap()
}

pub fn admin_token(user_id: DbId) -> String {
    generate_access_token(user_id, "admin", ROLE_ADMIN, &test_jwt_config()).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An online project owned by `owner`.
pub fn project(id: DbId, uri: &str, owner: DbId) -> Project {
    let now = Utc::now();
    Project {
        id,
        name: format!("Project {id}"),
        category: "web".to_string(),
        uri: uri.to_string(),
        home: String::new(),
        doc: String::new(),
        download: String::new(),
        src: String::new(),
        logo: String::new(),
        description: String::new(),
        repo: String::new(),
        author: String::new(),
        licence: "MIT".to_string(),
        lang: "Go".to_string(),
        os: String::new(),
        tags: String::new(),
        user_id: owner,
        username: format!("user{owner}"),
        viewnum: 10,
        cmtnum: 0,
        likenum: 0,
        lastreplyuid: None,
        lastreplytime: None,
        status: STATUS_ONLINE,
        created_at: now,
        updated_at: now,
    }
}

/// Projects with ids `1..=count`, each with uri `p<id>`, owned by user 1.
pub fn projects(count: DbId) -> Vec<Project> {
    (1..=count).map(|id| project(id, &format!("p{id}"), 1)).collect()
}

fn database_down() -> LogicError {
    LogicError::Database(sqlx::Error::PoolTimedOut)
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeProjects {
    pub projects: Mutex<Vec<Project>>,
    /// `(limit, last_id)` of every `find_by` call.
    pub find_by_calls: Mutex<Vec<(usize, DbId)>>,
    /// `(actor id, form)` of every `publish` call.
    pub published: Mutex<Vec<(DbId, ProjectForm)>>,
    pub fail_publish: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl FakeProjects {
    pub fn seed(&self, projects: Vec<Project>) {
        self.projects.lock().unwrap().extend(projects);
    }

    pub fn get(&self, id: DbId) -> Option<Project> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn check_reads(&self) -> LogicResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(database_down());
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectLogic for FakeProjects {
    async fn find_by(&self, limit: usize, last_id: DbId) -> LogicResult<Vec<Project>> {
        self.find_by_calls.lock().unwrap().push((limit, last_id));
        self.check_reads()?;
        let mut found: Vec<Project> = self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| last_id <= 0 || p.id < last_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        found.truncate(limit);
        Ok(found)
    }

    async fn find_by_id(&self, id: DbId) -> LogicResult<Option<Project>> {
        self.check_reads()?;
        Ok(self.get(id))
    }

    async fn find_by_uri(&self, uri: &str) -> LogicResult<Option<Project>> {
        self.check_reads()?;
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.uri.eq_ignore_ascii_case(uri))
            .cloned())
    }

    async fn uri_exists(&self, uri: &str) -> LogicResult<bool> {
        Ok(self.find_by_uri(uri).await?.is_some())
    }

    async fn publish(&self, actor: &AuthUser, form: ProjectForm) -> LogicResult<Project> {
        self.published
            .lock()
            .unwrap()
            .push((actor.user_id, form.clone()));
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(database_down());
        }

        let id = form.target_id();
        let draft = form.into_draft()?;
        let mut projects = self.projects.lock().unwrap();

        if id == 0 {
            let next_id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            let mut created = project(next_id, &draft.uri, actor.user_id);
            created.name = draft.name;
            projects.push(created.clone());
            return Ok(created);
        }

        let existing = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;
        if !can_edit(actor.user_id, actor.is_admin(), existing.user_id) {
            return Err(LogicError::NotModifyAuthority {
                entity: "project",
                id,
            });
        }
        existing.name = draft.name;
        existing.uri = draft.uri;
        Ok(existing.clone())
    }

    async fn healthy(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeLikes {
    /// `(uid, objid)` pairs currently liked.
    pub liked: Mutex<HashSet<(DbId, DbId)>>,
    /// `(uid, start_id, end_id)` of every range lookup.
    pub range_calls: Mutex<Vec<(DbId, DbId, DbId)>>,
    /// Object ids that behave as if their record was deleted.
    pub missing: Mutex<HashSet<DbId>>,
}

#[async_trait]
impl LikeLogic for FakeLikes {
    async fn find_user_like_objects(
        &self,
        uid: DbId,
        _objtype: ObjectType,
        start_id: DbId,
        end_id: DbId,
    ) -> LogicResult<HashMap<DbId, bool>> {
        self.range_calls
            .lock()
            .unwrap()
            .push((uid, start_id, end_id));
        let (min, max) = (start_id.min(end_id), start_id.max(end_id));
        Ok(self
            .liked
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, id)| *u == uid && (min..=max).contains(id))
            .map(|(_, id)| (*id, true))
            .collect())
    }

    async fn had_like(&self, uid: DbId, objid: DbId, _: ObjectType) -> LogicResult<bool> {
        Ok(self.liked.lock().unwrap().contains(&(uid, objid)))
    }

    async fn like_object(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        liked: bool,
    ) -> LogicResult<()> {
        if objtype != ObjectType::Project {
            return Err(CoreError::Validation(format!(
                "Objects of type {objtype} cannot be liked"
            ))
            .into());
        }
        if self.missing.lock().unwrap().contains(&objid) {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: objid,
            }
            .into());
        }
        let mut set = self.liked.lock().unwrap();
        if liked {
            set.insert((uid, objid));
        } else {
            set.remove(&(uid, objid));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFavorites {
    pub favorites: Mutex<HashSet<(DbId, DbId)>>,
}

#[async_trait]
impl FavoriteLogic for FakeFavorites {
    async fn had_favorite(&self, uid: DbId, objid: DbId, _: ObjectType) -> LogicResult<bool> {
        Ok(self.favorites.lock().unwrap().contains(&(uid, objid)))
    }
}

#[derive(Default)]
pub struct FakeComments {
    pub comments: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentLogic for FakeComments {
    async fn publish(
        &self,
        uid: DbId,
        objid: DbId,
        objtype: ObjectType,
        content: &str,
    ) -> LogicResult<Comment> {
        if content.trim().is_empty() {
            return Err(CoreError::validation("Comment must not be empty").into());
        }
        let mut comments = self.comments.lock().unwrap();
        let floor = comments
            .iter()
            .filter(|c| c.objid == objid && c.objtype == objtype.as_i16())
            .count() as i32
            + 1;
        let comment = Comment {
            id: comments.len() as DbId + 1,
            objid,
            objtype: objtype.as_i16(),
            uid,
            floor,
            content: content.trim().to_string(),
            created_at: Utc::now(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_object_comments(
        &self,
        objid: DbId,
        objtype: ObjectType,
    ) -> LogicResult<Vec<Comment>> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.objid == objid && c.objtype == objtype.as_i16())
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeViews {
    /// `(objid, uid)` of every recorded viewer.
    pub records: Mutex<Vec<(DbId, DbId)>>,
    pub viewer_count: AtomicI64,
    pub sources: Mutex<Option<SourceCounts>>,
}

#[async_trait]
impl ViewLogic for FakeViews {
    async fn record_viewer(&self, objid: DbId, _: ObjectType, uid: DbId) -> LogicResult<()> {
        self.records.lock().unwrap().push((objid, uid));
        Ok(())
    }

    async fn viewer_count(&self, _: DbId, _: ObjectType) -> LogicResult<i64> {
        Ok(self.viewer_count.load(Ordering::SeqCst))
    }

    async fn view_source(&self, objid: DbId, objtype: ObjectType) -> LogicResult<Option<ViewSource>> {
        Ok(self.sources.lock().unwrap().as_ref().map(|c| ViewSource {
            objid,
            objtype: objtype.as_i16(),
            google: c.google,
            baidu: c.baidu,
            bing: c.bing,
            sogou: c.sogou,
            so: c.so,
            other: c.other,
        }))
    }

    async fn persist_views(
        &self,
        _: ObjectType,
        _: DbId,
        _: i64,
        _: &SourceCounts,
    ) -> LogicResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The router plus handles on every fake behind it.
pub struct TestApp {
    router: Router,
    pub projects: Arc<FakeProjects>,
    pub likes: Arc<FakeLikes>,
    pub favorites: Arc<FakeFavorites>,
    pub comments: Arc<FakeComments>,
    pub views: Arc<FakeViews>,
    pub view_counter: Arc<ViewCounter>,
    pub view_recorder: ViewRecorder,
    cancel: CancellationToken,
}

impl TestApp {
    /// A fresh router over a handle to the same fakes.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Wait until the record queue has delivered `count` viewer records.
    pub async fn wait_for_view_records(&self, count: usize) -> Vec<(DbId, DbId)> {
        for _ in 0..100 {
            if self.views.records.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.views.records.lock().unwrap().clone()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Build the full application router over fresh fakes.
///
/// Must be called from within a tokio runtime (the view record worker is
/// spawned here).
pub fn build_test_app() -> TestApp {
    let config = test_config();

    let projects = Arc::new(FakeProjects::default());
    let likes = Arc::new(FakeLikes::default());
    let favorites = Arc::new(FakeFavorites::default());
    let comments = Arc::new(FakeComments::default());
    let views = Arc::new(FakeViews::default());

    let logic = Logic {
        projects: projects.clone(),
        likes: likes.clone(),
        favorites: favorites.clone(),
        comments: comments.clone(),
        views: views.clone(),
    };

    let cancel = CancellationToken::new();
    let view_counter = Arc::new(ViewCounter::new(config.site_domain.clone()));
    let (view_recorder, _workers) = ViewRecorder::start(
        views.clone(),
        config.view_record_queue,
        config.view_record_workers,
        cancel.clone(),
    );

    let state = AppState {
        sensitive: Arc::new(SensitiveFilter::new(&config.sensitive_words)),
        config: Arc::new(config),
        logic,
        renderer: Arc::new(JsonRenderer),
        view_counter: Arc::clone(&view_counter),
        view_recorder: view_recorder.clone(),
    };

    TestApp {
        router: build_app_router(state),
        projects,
        likes,
        favorites,
        comments,
        views,
        view_counter,
        view_recorder,
        cancel,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a url-encoded form, optionally signed in.
pub async fn post_form(app: Router, uri: &str, token: Option<&str>, body: &str) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
