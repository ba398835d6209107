//! # HTTP Service
//!
//! Project CRUD, section generation and the public read path for
//! published pages. Ownership is enforced here; the store trusts its
//! callers.
//!
//! ```text
//! GET    /api/projects              caller's projects, newest first
//! POST   /api/projects              create from the starter template
//! GET    /api/projects/:id          owner, or anyone once published
//! PATCH  /api/projects/:id          owner only
//! DELETE /api/projects/:id          owner only
//! POST   /api/ai/generate-section   signed-in callers
//! GET    /p/:id                     published page as HTML
//! ```

use crate::auth::{CurrentUser, MaybeUser, TokenAuth};
use crate::error::ApiError;
use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use pagekit_editor::{
    prepare_section, EditorHandle, GenerateRequest, NewProject, ProjectRecord, ProjectStore,
    ProjectSummary, ProjectUpdate, SectionGenerator, DEFAULT_WINDOW,
};
use pagekit_model::IdGenerator;
use pagekit_renderer::{render, to_html_document, HtmlOptions, RenderMode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared service state.
///
/// The HTTP routes only touch the store, generator and auth table. A
/// process that embeds the service alongside its own editor front end calls
/// [`AppState::editor`] to get sessions that autosave into the same store
/// with the configured `autosaveMs` window.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub generator: Arc<dyn SectionGenerator>,
    pub auth: TokenAuth,
    pub autosave_window: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        generator: Arc<dyn SectionGenerator>,
        auth: TokenAuth,
    ) -> Self {
        Self {
            store,
            generator,
            auth,
            autosave_window: DEFAULT_WINDOW,
        }
    }

    pub fn with_autosave_window(mut self, window: Duration) -> Self {
        self.autosave_window = window;
        self
    }

    /// An editor session backed by this service's store and generator.
    pub fn editor(&self) -> EditorHandle {
        EditorHandle::with_generator(
            Arc::clone(&self.store),
            Arc::clone(&self.generator),
            self.autosave_window,
        )
    }
}

impl FromRef<AppState> for TokenAuth {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/api/ai/generate-section", post(generate_section))
        .route("/p/:id", get(published_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    Ok(Json(state.store.list(&user).await?))
}

#[derive(Debug, Deserialize)]
struct CreateProject {
    #[serde(default)]
    name: String,
}

async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateProject>,
) -> Result<(StatusCode, Json<ProjectRecord>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Missing required field: name".to_string()));
    }

    let record = state
        .store
        .create(NewProject {
            owner_id: user,
            name: name.to_string(),
        })
        .await?;

    info!(id = %record.id, owner = %record.owner_id, "project created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Loads a project the caller owns.
async fn owned(state: &AppState, id: &str, user: &str) -> Result<ProjectRecord, ApiError> {
    let record = state.store.get(id).await?;
    if !record.is_owned_by(user) {
        return Err(ApiError::Forbidden);
    }
    Ok(record)
}

async fn get_project(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let record = state.store.get(&id).await?;
    if record.published {
        return Ok(Json(record));
    }

    match user {
        Some(user) if record.is_owned_by(&user) => Ok(Json(record)),
        Some(_) => Err(ApiError::Forbidden),
        None => Err(ApiError::Unauthorized),
    }
}

async fn update_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let current = owned(&state, &id, &user).await?;

    if let Some(tree) = &update.tree_json {
        tree.validate()?;
    }
    if matches!(&update.name, Some(name) if name.trim().is_empty()) {
        return Err(ApiError::Validation("Project name cannot be blank".to_string()));
    }

    let publish = update.published.filter(|p| *p != current.published);
    let record = state.store.update(&id, update).await?;

    match publish {
        Some(true) => info!(id = %record.id, "project published"),
        Some(false) => info!(id = %record.id, "project unpublished"),
        None => {}
    }
    Ok(Json(record))
}

async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    owned(&state, &id, &user).await?;
    state.store.delete(&id).await?;

    info!(%id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;

    let candidate = state.generator.generate(&request).await?;

    let seed_source = format!(
        "{}:{}:{}",
        user,
        request.section_variant,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );
    let mut ids = IdGenerator::new(&seed_source);
    let section = prepare_section(candidate, &HashSet::new(), &mut ids)?;

    info!(variant = %request.section_variant, "section generated");
    Ok(Json(json!({ "section": section })))
}

async fn published_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let record = state.store.get(&id).await?;
    if !record.published {
        return Err(ApiError::NotFound(id));
    }

    let doc = render(&record.tree_json, &record.theme_json, RenderMode::Preview);
    let options = HtmlOptions {
        node_ids: false,
        ..HtmlOptions::default()
    };
    Ok(Html(to_html_document(&doc, &record.name, options)))
}
