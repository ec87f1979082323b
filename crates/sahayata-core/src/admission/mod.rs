//! Admission control subsystem
//!
//! Cooperating policies deciding whether an incoming write may
//! proceed: fixed-window rate limiting, content validation, duplicate
//! suppression, and per-session quotas, composed by the
//! `AdmissionService` facade. A background sweeper evicts stale
//! bookkeeping state.

pub mod config;
pub mod duplicate;
pub mod error;
pub mod identity;
pub mod limiter;
pub mod service;
pub mod session;
pub mod sweeper;
pub mod validator;

use crate::admission::config::EndpointClass;
use crate::admission::identity::ClientIdentity;

/// Composite key for per-client, per-endpoint-class bookkeeping.
///
/// A proper struct key instead of string concatenation: no collision
/// risk between identity and class parts, and key construction is
/// compiler-checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BucketKey {
	pub identity: ClientIdentity,
	pub class: EndpointClass,
}

impl BucketKey {
	pub fn new(identity: ClientIdentity, class: EndpointClass) -> Self {
		Self { identity, class }
	}
}

// vim: ts=4
