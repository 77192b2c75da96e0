//! Controllers layer - orchestration and coordination.
//!
//! `session` ties the document, the file picker, the editing surface and
//! the autosave writer together.

pub mod session;
