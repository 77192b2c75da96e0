//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Settings, EditorConfig, Messages)
//! - `controllers/` - Orchestration (the file session and autosave lifecycle)
//! - `services/` - Business operations (debounce, write queue, signals, markdown)
//! - `infrastructure/` - External integrations (filesystem, FLTK buffer, logging, error)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::session::{SessionController, SessionState};
pub use domain::{AppSettings, Document, EditorConfig, Message};
pub use infrastructure::error::{AppError, Result};
