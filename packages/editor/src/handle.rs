//! # Editor Handle
//!
//! Async driver around an [`EditorSession`]. Mutations run synchronously
//! under a short lock; every call to a collaborator happens with the lock
//! released, so edits keep flowing while a save or generation is pending.
//!
//! A background task owns the debounce timer: it sleeps until the
//! scheduler's deadline, or until woken by a new edit, and runs the save
//! when the quiet period has passed. Manual saves run on a task of their
//! own as well, so a caller that stops waiting never strands the scheduler
//! with a save it believes is still in flight.

use crate::autosave::{AutosaveScheduler, SaveKind};
use crate::generation::{GenerateRequest, SectionGenerator};
use crate::mutations::Mutation;
use crate::session::EditorSession;
use crate::store::{ProjectStore, ProjectUpdate};
use crate::EditorError;
use pagekit_model::ThemeTokens;
use pagekit_renderer::Viewport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The current state was written.
    Saved,
    /// Nothing to write.
    Clean,
    /// Another save is running; this one starts when it finishes.
    Deferred,
}

struct State {
    session: EditorSession,
    autosave: AutosaveScheduler,
    last_error: Option<String>,
}

struct Inner {
    state: Mutex<State>,
    store: Arc<dyn ProjectStore>,
    generator: Option<Arc<dyn SectionGenerator>>,
    wake: Notify,
}

pub struct EditorHandle {
    inner: Arc<Inner>,
    driver: JoinHandle<()>,
}

impl EditorHandle {
    /// Must be called inside a tokio runtime.
    pub fn new(store: Arc<dyn ProjectStore>, autosave_window: Duration) -> Self {
        Self::build(store, None, autosave_window)
    }

    pub fn with_generator(
        store: Arc<dyn ProjectStore>,
        generator: Arc<dyn SectionGenerator>,
        autosave_window: Duration,
    ) -> Self {
        Self::build(store, Some(generator), autosave_window)
    }

    fn build(
        store: Arc<dyn ProjectStore>,
        generator: Option<Arc<dyn SectionGenerator>>,
        autosave_window: Duration,
    ) -> Self {
        let inner = Arc::new(Inner {
            state: Mutex::new(State {
                session: EditorSession::new(),
                autosave: AutosaveScheduler::new(autosave_window),
                last_error: None,
            }),
            store,
            generator,
            wake: Notify::new(),
        });

        let driver = tokio::spawn(Arc::clone(&inner).drive());
        Self { inner, driver }
    }

    /// Loads a project into the session. Returns `Ok(false)` if another
    /// `open` started before this one finished; its result is discarded.
    ///
    /// The open project, and its pending autosave, are only replaced once
    /// the new one has been fetched.
    pub async fn open(&self, project_id: &str) -> Result<bool, EditorError> {
        let ticket = self.inner.state.lock().await.session.begin_load(project_id);

        let record = self.inner.store.get(project_id).await.map_err(|err| {
            warn!(project_id, error = %err, "failed to open project");
            err
        })?;

        let mut state = self.inner.state.lock().await;
        let applied = state
            .session
            .finish_load(ticket, record.tree_json, record.theme_json);
        if applied {
            state.autosave.cancel();
            state.last_error = None;
            info!(project_id, "project opened");
        }
        Ok(applied)
    }

    /// Applies a mutation and restarts the autosave timer. Returns `false`
    /// when no project is open.
    pub async fn apply(&self, mutation: Mutation) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.session.apply(&mutation) {
            return false;
        }
        state.autosave.on_change(Instant::now());
        drop(state);

        self.inner.wake.notify_one();
        true
    }

    pub async fn select(&self, id: Option<String>) {
        self.inner.state.lock().await.session.select(id);
    }

    pub async fn set_preview_mode(&self, mode: Viewport) {
        self.inner.state.lock().await.session.set_preview_mode(mode);
    }

    pub async fn set_theme(&self, theme: ThemeTokens) {
        let mut state = self.inner.state.lock().await;
        state.session.set_theme(theme);
        state.autosave.on_change(Instant::now());
        drop(state);

        self.inner.wake.notify_one();
    }

    /// Saves now, bypassing the debounce timer.
    pub async fn save(&self) -> Result<SaveOutcome, EditorError> {
        let start = {
            let mut state = self.inner.state.lock().await;
            if state.session.project_id().is_none() {
                return Err(EditorError::NoProject);
            }
            if !state.session.is_dirty() && !state.autosave.is_in_flight() {
                return Ok(SaveOutcome::Clean);
            }
            state.autosave.manual()
        };

        let Some(kind) = start else {
            return Ok(SaveOutcome::Deferred);
        };

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.run_saves(kind).await });
        task.await
            .map_err(|err| EditorError::Interrupted(err.to_string()))??;
        Ok(SaveOutcome::Saved)
    }

    /// Asks the generator for a section and appends it to the Page.
    /// Returns the new section's id.
    pub async fn generate_section(&self, request: GenerateRequest) -> Result<String, EditorError> {
        let generator = self.inner.generator.as_ref().ok_or(EditorError::NoGenerator)?;
        request.validate()?;

        let epoch = {
            let state = self.inner.state.lock().await;
            if state.session.tree().is_none() {
                return Err(EditorError::NoProject);
            }
            state.session.epoch()
        };

        let candidate = generator.generate(&request).await.map_err(|err| {
            warn!(error = %err, "section generation failed");
            err
        })?;

        let mut state = self.inner.state.lock().await;
        if state.session.epoch() != epoch {
            return Err(EditorError::Superseded);
        }
        let section_id = state.session.insert_generated(candidate).map_err(|err| {
            warn!(error = %err, "rejected generated section");
            err
        })?;
        state.autosave.on_change(Instant::now());
        drop(state);

        self.inner.wake.notify_one();
        Ok(section_id)
    }

    /// Runs `f` against the session under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&EditorSession) -> R) -> R {
        let state = self.inner.state.lock().await;
        f(&state.session)
    }

    pub async fn is_dirty(&self) -> bool {
        self.read(EditorSession::is_dirty).await
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.lock().await.last_error.clone()
    }
}

impl Drop for EditorHandle {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

impl Inner {
    async fn drive(self: Arc<Self>) {
        loop {
            let deadline = self.state.lock().await.autosave.deadline();

            match deadline {
                Some(at) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(at) => {}
                        _ = self.wake.notified() => continue,
                    }
                }
                None => {
                    self.wake.notified().await;
                    continue;
                }
            }

            let start = self.state.lock().await.autosave.poll(Instant::now());
            if let Some(kind) = start {
                // Failures are recorded in `last_error`; the session stays dirty.
                let _ = self.run_saves(kind).await;
            }
        }
    }

    /// Runs a save, then any save deferred while it ran. Returns the result
    /// of the first one.
    async fn run_saves(&self, kind: SaveKind) -> Result<(), EditorError> {
        let mut first = None;
        let mut next = Some(kind);

        while let Some(kind) = next {
            let result = self.save_once(kind).await;
            if first.is_none() {
                first = Some(result);
            }
            next = self.state.lock().await.autosave.on_save_finished();
        }

        self.wake.notify_one();
        first.unwrap_or(Ok(()))
    }

    async fn save_once(&self, kind: SaveKind) -> Result<(), EditorError> {
        let Some(request) = self.state.lock().await.session.begin_save(kind) else {
            debug!(?kind, "nothing to save");
            return Ok(());
        };

        let update = ProjectUpdate {
            tree_json: Some(request.tree.clone()),
            theme_json: request.theme.clone(),
            ..ProjectUpdate::default()
        };
        let result = self.store.update(&request.project_id, update).await;

        let mut state = self.state.lock().await;
        let still_dirty = state.session.finish_save(&request, result.is_ok());

        match result {
            Ok(_) => {
                state.last_error = None;
                info!(project_id = %request.project_id, ?kind, still_dirty, "project saved");
                Ok(())
            }
            Err(err) => {
                warn!(project_id = %request.project_id, error = %err, "save failed");
                state.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}
