//! # Editor Session
//!
//! Process-local state of one open editor: the current tree and theme,
//! selection, preview width and what still needs saving.
//!
//! Saving is split in two so that I/O can run without holding the session:
//! [`EditorSession::begin_save`] snapshots what to write and
//! [`EditorSession::finish_save`] records the outcome. Edits made while a
//! save is in flight keep the session dirty.
//!
//! Loading follows the same pattern with [`LoadTicket`]s; a load that was
//! overtaken by a newer one is discarded.

use crate::autosave::SaveKind;
use crate::generation::prepare_section;
use crate::mutations::{self, Mutation};
use crate::EditorError;
use pagekit_model::{IdGenerator, Node, ThemeTokens, Tree};
use pagekit_renderer::{frame, render, RenderMode, VirtualDocument, Viewport};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Proof that a load was started. Only the most recent ticket is honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub project_id: String,
    epoch: u64,
}

/// Snapshot handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub project_id: String,
    pub tree: Tree,
    /// Present for manual saves, and for autosaves when the theme changed.
    pub theme: Option<ThemeTokens>,
    pub kind: SaveKind,
    revision: u64,
    theme_revision: u64,
    epoch: u64,
}

#[derive(Debug)]
pub struct EditorSession {
    project_id: Option<String>,
    tree: Option<Tree>,
    theme: ThemeTokens,
    selected: Option<String>,
    preview_mode: Viewport,
    revision: u64,
    saved_revision: u64,
    theme_revision: u64,
    saved_theme_revision: u64,
    /// Bumped when a load starts; a ticket from an older load is stale.
    load_epoch: u64,
    /// Bumped when a project is installed.
    epoch: u64,
    ids: IdGenerator,
    /// Every id present since the project was installed, deleted ones included.
    issued: HashSet<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            project_id: None,
            tree: None,
            theme: ThemeTokens::default(),
            selected: None,
            preview_mode: Viewport::Desktop,
            revision: 0,
            saved_revision: 0,
            theme_revision: 0,
            saved_theme_revision: 0,
            load_epoch: 0,
            epoch: 0,
            ids: IdGenerator::new(""),
            issued: HashSet::new(),
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn theme(&self) -> &ThemeTokens {
        &self.theme
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn preview_mode(&self) -> Viewport {
        self.preview_mode
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision || self.theme_revision != self.saved_theme_revision
    }

    /// Number of applied mutations since the project was loaded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Starts loading `project_id`, invalidating any load already running.
    /// The open project is untouched until [`Self::finish_load`].
    pub fn begin_load(&mut self, project_id: impl Into<String>) -> LoadTicket {
        self.load_epoch += 1;
        LoadTicket {
            project_id: project_id.into(),
            epoch: self.load_epoch,
        }
    }

    /// Completes a load. Returns `false` and changes nothing if the ticket
    /// has been superseded.
    pub fn finish_load(&mut self, ticket: LoadTicket, tree: Tree, theme: ThemeTokens) -> bool {
        if ticket.epoch != self.load_epoch {
            debug!(project_id = %ticket.project_id, "discarding superseded load");
            return false;
        }
        self.install(ticket.project_id, tree, theme);
        true
    }

    /// Replaces the session contents outright.
    pub fn load(&mut self, project_id: impl Into<String>, tree: Tree, theme: ThemeTokens) {
        self.load_epoch += 1;
        self.install(project_id.into(), tree, theme);
    }

    fn install(&mut self, project_id: String, tree: Tree, theme: ThemeTokens) {
        self.epoch += 1;
        self.ids = IdGenerator::new(&project_id);
        self.issued = tree.collect_ids();
        self.project_id = Some(project_id);
        self.tree = Some(tree);
        self.theme = theme;
        self.selected = None;
        self.revision = 0;
        self.saved_revision = 0;
        self.theme_revision = 0;
        self.saved_theme_revision = 0;
    }

    /// Generation of the open project. Changes whenever a project is installed.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn set_preview_mode(&mut self, mode: Viewport) {
        self.preview_mode = mode;
    }

    /// Runs one mutation against the current tree and marks the session
    /// dirty. Returns `false` when no tree is loaded.
    ///
    /// A selection that no longer resolves afterwards (its node was deleted)
    /// is cleared.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let Some(tree) = self.tree.as_ref() else {
            return false;
        };

        let next = mutation.apply(tree);
        self.tree = Some(next);
        self.revision += 1;

        if let Mutation::Insert { node, .. } = mutation {
            let issued = &mut self.issued;
            node.walk(&mut |n: &Node| {
                issued.insert(n.id().to_string());
            });
        }

        let stale = match (&self.selected, &self.tree) {
            (Some(selected), Some(tree)) => mutations::find(tree, selected).is_none(),
            _ => false,
        };
        if stale {
            self.selected = None;
        }
        true
    }

    pub fn set_theme(&mut self, theme: ThemeTokens) {
        self.theme = theme;
        self.theme_revision += 1;
    }

    /// Validates a generated section, gives it fresh ids and appends it to
    /// the Page. Returns the section's id. The tree is untouched on error.
    pub fn insert_generated(&mut self, candidate: Value) -> Result<String, EditorError> {
        let tree = self.tree.as_ref().ok_or(EditorError::NoProject)?;

        let section = prepare_section(candidate, &self.issued, &mut self.ids)?;
        let section_id = section.id().to_string();
        let mutation = Mutation::Insert {
            parent_id: tree.page_id().to_string(),
            node: section,
        };

        self.apply(&mutation);
        Ok(section_id)
    }

    /// Snapshot for a save, or `None` when there is nothing to write.
    pub fn begin_save(&self, kind: SaveKind) -> Option<SaveRequest> {
        let project_id = self.project_id.clone()?;
        let tree = self.tree.clone()?;

        if !self.is_dirty() && kind == SaveKind::Auto {
            return None;
        }

        let theme_changed = self.theme_revision != self.saved_theme_revision;
        let theme = match kind {
            SaveKind::Manual => Some(self.theme.clone()),
            SaveKind::Auto if theme_changed => Some(self.theme.clone()),
            SaveKind::Auto => None,
        };

        Some(SaveRequest {
            project_id,
            tree,
            theme,
            kind,
            revision: self.revision,
            theme_revision: self.theme_revision,
            epoch: self.epoch,
        })
    }

    /// Records the outcome of a save. Returns whether the session is still
    /// dirty. Outcomes for a project that is no longer open are ignored.
    pub fn finish_save(&mut self, request: &SaveRequest, succeeded: bool) -> bool {
        if request.epoch != self.epoch {
            debug!(project_id = %request.project_id, "ignoring save result for previous load");
            return self.is_dirty();
        }

        if succeeded {
            self.saved_revision = self.saved_revision.max(request.revision);
            if request.theme.is_some() {
                self.saved_theme_revision = self.saved_theme_revision.max(request.theme_revision);
            }
        }
        self.is_dirty()
    }

    /// Editor canvas for the current tree, framed to the preview width.
    pub fn render(&self) -> Option<VirtualDocument> {
        let tree = self.tree.as_ref()?;
        let mode = RenderMode::Edit {
            selected: self.selected.as_deref(),
        };
        Some(frame(render(tree, &self.theme, mode), self.preview_mode))
    }

    /// Primary interaction at `path` in the canvas from [`Self::render`].
    /// Selects the node hit and returns its id.
    pub fn handle_primary(&mut self, path: &[usize]) -> Option<String> {
        let doc = self.render()?;
        let mut hit = None;
        doc.dispatch_primary(path, &mut |id| hit = Some(id.to_string()));

        if hit.is_some() {
            self.selected = hit.clone();
        }
        hit
    }
}
