//! Shared types and error handling for the Sahayata platform.
//!
//! This crate contains the foundational types shared between the
//! admission-control core and the server crate: the workspace-wide
//! error type, timestamps, session identifiers, and the document
//! store adapter boundary.

pub mod doc_store;
pub mod error;
pub mod prelude;
pub mod types;

// vim: ts=4
