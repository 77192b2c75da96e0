//! Services layer - business operations and utilities.
//!
//! This module contains business logic that has no FLTK dependency:
//! - Debounced deadlines and the per-path write queue
//! - Named menu signals
//! - Markdown rendering for the preview pane

pub mod deferred;
pub mod events;
pub mod file_filters;
pub mod gateway;
pub mod markdown;
pub mod write_queue;
