//! In-memory pages resource.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::controller::{ActionTable, Controller, RequestContext};
use crate::demo::auth::{ApiClient, CLIENT_PARAM};
use crate::model::Validator;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub published: bool,
}

/// Client-supplied page fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageInput {
    pub title: String,
    pub body: String,
}

impl PageInput {
    fn validate(&self) -> Validator {
        let mut validator = Validator::new();
        validator
            .presence("title", &self.title)
            .length("title", &self.title, None, Some(120));
        validator
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    pages: BTreeMap<i64, Page>,
    last_id: i64,
}

/// Shared page storage. Cloning shares the same pages.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self) -> Vec<Page> {
        self.lock().pages.values().cloned().collect()
    }

    pub fn get(&self, id: i64) -> Option<Page> {
        self.lock().pages.get(&id).cloned()
    }

    pub fn insert(&self, input: PageInput) -> Page {
        let mut inner = self.lock();
        inner.last_id += 1;
        let page = Page {
            id: inner.last_id,
            title: input.title,
            body: input.body,
            published: false,
        };
        inner.pages.insert(page.id, page.clone());
        page
    }

    pub fn update(&self, id: i64, input: PageInput) -> Option<Page> {
        let mut inner = self.lock();
        let page = inner.pages.get_mut(&id)?;
        page.title = input.title;
        page.body = input.body;
        Some(page.clone())
    }

    pub fn publish(&self, id: i64) -> Option<Page> {
        let mut inner = self.lock();
        let page = inner.pages.get_mut(&id)?;
        page.published = true;
        Some(page.clone())
    }

    pub fn remove(&self, id: i64) -> Option<Page> {
        self.lock().pages.remove(&id)
    }

    /// Newest pages first.
    pub fn recent(&self, limit: usize) -> Vec<Page> {
        self.lock().pages.values().rev().take(limit).cloned().collect()
    }
}

/// REST controller for `Page` records.
///
/// ```text
/// GET    /pages             Index
/// GET    /pages/recent      GETRecent
/// POST   /pages             Create
/// GET    /pages/:id         Show
/// PUT    /pages/:id         Update
/// DELETE /pages/:id         Destroy
/// POST   /pages/:id/publish POSTPublish
/// ```
pub struct PagesController {
    store: PageStore,
}

impl PagesController {
    pub fn new(store: PageStore) -> Self {
        Self { store }
    }

    fn index(&mut self, ctx: &mut RequestContext) {
        let pages = self.store.list();
        ctx.render_json(StatusCode::OK, &json!({ "pages": pages }));
    }

    fn recent(&mut self, ctx: &mut RequestContext) {
        let pages = self.store.recent(RECENT_LIMIT);
        ctx.render_json(StatusCode::OK, &json!({ "pages": pages }));
    }

    fn show(&mut self, ctx: &mut RequestContext) {
        match self.store.get(ctx.id()) {
            Some(page) => render_page(ctx, StatusCode::OK, &page),
            None => ctx.render_json_error(StatusCode::NOT_FOUND, "page not found"),
        }
    }

    fn create(&mut self, ctx: &mut RequestContext) {
        let Some(input) = read_input(ctx) else {
            return;
        };
        let page = self.store.insert(input);
        let authenticated = ctx.param::<ApiClient>(CLIENT_PARAM).is_some();
        tracing::debug!(page_id = page.id, authenticated, "Page created");
        render_page(ctx, StatusCode::CREATED, &page);
    }

    fn update(&mut self, ctx: &mut RequestContext) {
        let Some(input) = read_input(ctx) else {
            return;
        };
        match self.store.update(ctx.id(), input) {
            Some(page) => render_page(ctx, StatusCode::OK, &page),
            None => ctx.render_json_error(StatusCode::NOT_FOUND, "page not found"),
        }
    }

    fn destroy(&mut self, ctx: &mut RequestContext) {
        match self.store.remove(ctx.id()) {
            Some(page) => render_page(ctx, StatusCode::OK, &page),
            None => ctx.render_json_error(StatusCode::NOT_FOUND, "page not found"),
        }
    }

    fn publish(&mut self, ctx: &mut RequestContext) {
        match self.store.publish(ctx.id()) {
            Some(page) => render_page(ctx, StatusCode::OK, &page),
            None => ctx.render_json_error(StatusCode::NOT_FOUND, "page not found"),
        }
    }
}

impl Controller for PagesController {
    fn actions(actions: &mut ActionTable<Self>) {
        actions
            .index(Self::index)
            .show(Self::show)
            .create(Self::create)
            .update(Self::update)
            .destroy(Self::destroy)
            .custom(Method::GET, "recent", Self::recent)
            .custom(Method::POST, "publish", Self::publish);
    }
}

/// Decode and validate the page payload, rendering the error on failure.
fn read_input(ctx: &mut RequestContext) -> Option<PageInput> {
    let input: PageInput = match ctx.load_json_root::<Option<PageInput>>() {
        Ok(Some(input)) => input,
        Ok(None) => {
            let message = format!("missing \"{}\" object", ctx.root_key());
            ctx.render_json_error(StatusCode::BAD_REQUEST, &message);
            return None;
        }
        Err(err) => {
            ctx.render_json_error(StatusCode::BAD_REQUEST, &err.to_string());
            return None;
        }
    };

    let validator = input.validate();
    if !validator.is_valid() {
        ctx.render_model_errors(StatusCode::UNPROCESSABLE_ENTITY, validator.errors());
        return None;
    }
    Some(input)
}

fn render_page(ctx: &mut RequestContext, status: StatusCode, page: &Page) {
    let mut envelope = serde_json::Map::new();
    envelope.insert(ctx.root_key().to_string(), json!(page));
    ctx.render_json(status, &envelope);
}
