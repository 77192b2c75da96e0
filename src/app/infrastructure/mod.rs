//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - FLTK buffer utilities
//! - Filesystem store and the background autosave worker
//! - Logging setup and error types

pub mod buffer;
pub mod error;
pub mod fs_store;
pub mod logging;
pub mod save_worker;
