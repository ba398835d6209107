//! # Pagekit Workspace
//!
//! The service side of the editor: project persistence behind an HTTP API,
//! bearer-token auth, section generation and the public read path for
//! published pages.
//!
//! ```text
//! ┌────────────┐    ┌──────────────┐    ┌──────────────┐
//! │   router   │───▶│ ProjectStore │───▶│ MemoryStore  │
//! │  (axum)    │    │   (trait)    │    │ FileStore    │
//! └────────────┘    └──────────────┘    └──────────────┘
//!       │
//!       ├──▶ SectionGenerator ──▶ TemplateGenerator
//!       └──▶ render + to_html_document (GET /p/:id)
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod file_store;
pub mod generator;
pub mod server;

pub use auth::{CurrentUser, MaybeUser, TokenAuth};
pub use config::{Config, DEFAULT_CONFIG_NAME};
pub use error::ApiError;
pub use file_store::FileStore;
pub use generator::TemplateGenerator;
pub use server::{router, AppState};
