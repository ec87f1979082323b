//! Admission control core for the Sahayata platform.
//!
//! Decides whether a unit of client activity (forum post, journal
//! note, journey creation, tool completion, auth attempt) may
//! proceed, based on client identity, endpoint class, recent history,
//! and content shape. All state is process-local and in-memory: it is
//! an abuse-mitigation heuristic, not a source of truth, and is
//! intentionally lost on restart. Multi-instance deployments need an
//! external shared store to make limits globally consistent; that is
//! out of scope here.

#![forbid(unsafe_code)]

pub mod admission;
pub mod prelude;

pub use admission::config::{AdmissionConfig, ClassPolicy, EndpointClass};
pub use admission::error::AdmissionDenied;
pub use admission::identity::{ClientId, ClientIdentity};
pub use admission::service::{AdmissionRequest, AdmissionService, AdmissionStats, AdmissionTicket};

// vim: ts=4
