//! # Pagekit Editor
//!
//! Editing engine for landing page trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Tree, Node, ThemeTokens              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: session lifecycle + mutations       │
//! │  - Pure find/update/insert/delete/reorder   │
//! │  - Selection, preview width, dirty state    │
//! │  - Debounced, single-flight autosave        │
//! │  - Validated insertion of generated output  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: Tree + theme → VDOM → HTML        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagekit_editor::{EditorHandle, MemoryStore, Mutation, NodePatch};
//!
//! let editor = EditorHandle::new(Arc::new(MemoryStore::new()), Duration::from_secs(2));
//! editor.open("p1a2b3c").await?;
//!
//! editor.apply(Mutation::Update {
//!     node_id: "hero-title".to_string(),
//!     patch: NodePatch::new().with_content("Hi"),
//! }).await;
//!
//! // saved automatically after two quiet seconds, or now:
//! editor.save().await?;
//! ```

mod autosave;
mod errors;
mod generation;
mod handle;
mod mutations;
mod session;
mod store;

pub use autosave::{AutosaveScheduler, SaveKind, DEFAULT_WINDOW};
pub use errors::EditorError;
pub use generation::{
    build_prompt, parse_completion, prepare_section, GenerateRequest, GenerationError,
    SectionGenerator, SYSTEM_PROMPT,
};
pub use handle::{EditorHandle, SaveOutcome};
pub use mutations::{delete, find, insert, reorder, update, Mutation, NodePatch};
pub use session::{EditorSession, LoadTicket, SaveRequest};
pub use store::{
    project_id, sort_newest_first, MemoryStore, NewProject, ProjectRecord, ProjectStore,
    ProjectSummary, ProjectUpdate, StoreError,
};
