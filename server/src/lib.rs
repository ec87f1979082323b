//! Sahayata is a small self-hosted wellbeing platform for students.
//!
//! Nearly all of the server is CRUD handlers forwarding JSON bodies
//! to a document store. The interesting part lives in
//! `sahayata-core`: the request admission-control layer every write
//! endpoint consults before persisting anything.

#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod auth_adapter;
pub mod memory_store;
pub mod prelude;
pub mod routes;

pub use crate::app::{App, AppBuilder, AppState};

// vim: ts=4
