//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - The open document and its revision bookkeeping
//! - Application settings and editor capabilities
//! - Message types for the event system

pub mod document;
pub mod editor_config;
pub mod messages;
pub mod settings;

pub use document::Document;
pub use editor_config::EditorConfig;
pub use messages::Message;
pub use settings::AppSettings;
