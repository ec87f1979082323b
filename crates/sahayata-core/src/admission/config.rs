//! Admission policy configuration
//!
//! Immutable per-endpoint-class policies, loaded once at startup.
//! A malformed configuration is a fatal initialization failure,
//! never a per-request condition.

use std::collections::HashMap;
use std::time::Duration;

use crate::prelude::*;

/// Category of write operation subject to its own policy.
///
/// Unknown tags fall back to `Default`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointClass {
	ForumPost,
	JourneyCreate,
	NoteCreate,
	ToolComplete,
	ProfessionalSearch,
	Auth,
	Default,
}

impl EndpointClass {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"forum-post" => EndpointClass::ForumPost,
			"journey-create" => EndpointClass::JourneyCreate,
			"note-create" => EndpointClass::NoteCreate,
			"tool-complete" => EndpointClass::ToolComplete,
			"professional-search" => EndpointClass::ProfessionalSearch,
			"auth" => EndpointClass::Auth,
			_ => EndpointClass::Default,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			EndpointClass::ForumPost => "forum-post",
			EndpointClass::JourneyCreate => "journey-create",
			EndpointClass::NoteCreate => "note-create",
			EndpointClass::ToolComplete => "tool-complete",
			EndpointClass::ProfessionalSearch => "professional-search",
			EndpointClass::Auth => "auth",
			EndpointClass::Default => "default",
		}
	}
}

impl std::fmt::Display for EndpointClass {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Per-class admission policy.
#[derive(Clone, Debug)]
pub struct ClassPolicy {
	/// Maximum allowed requests per window. Must be > 0.
	pub max_requests: u32,
	/// Fixed window length. Must be > 0.
	pub window: Duration,
	/// Inclusive minimum trimmed content length.
	pub min_length: usize,
	/// Inclusive maximum trimmed content length.
	pub max_length: usize,
	/// Lifetime cap on accepted actions per session. 0 disables the cap.
	pub session_cap: u32,
}

impl ClassPolicy {
	pub fn new(max_requests: u32, window: Duration) -> Self {
		Self { max_requests, window, min_length: 3, max_length: 2000, session_cap: 50 }
	}

	pub fn content_bounds(mut self, min_length: usize, max_length: usize) -> Self {
		self.min_length = min_length;
		self.max_length = max_length;
		self
	}

	pub fn session_cap(mut self, cap: u32) -> Self {
		self.session_cap = cap;
		self
	}

	fn validate(&self, class: EndpointClass) -> ShResult<()> {
		if self.max_requests == 0 {
			return Err(Error::ValidationError(format!(
				"policy for {}: max_requests must be > 0",
				class
			)));
		}
		if self.window.is_zero() {
			return Err(Error::ValidationError(format!(
				"policy for {}: window must be > 0",
				class
			)));
		}
		if self.min_length > self.max_length {
			return Err(Error::ValidationError(format!(
				"policy for {}: min_length {} exceeds max_length {}",
				class, self.min_length, self.max_length
			)));
		}
		Ok(())
	}
}

/// Complete admission configuration, immutable after startup.
#[derive(Clone, Debug)]
pub struct AdmissionConfig {
	policies: HashMap<EndpointClass, ClassPolicy>,
	default_policy: ClassPolicy,
	/// How long a content fingerprint suppresses identical resubmission.
	pub duplicate_horizon: Duration,
	/// Sweeper retention for fingerprint history. Must be at least the
	/// duplicate horizon so lazy pruning on access stays safe.
	pub retention_horizon: Duration,
	/// Interval between background sweeps.
	pub sweep_interval: Duration,
}

impl AdmissionConfig {
	pub fn new() -> Self {
		Self {
			policies: HashMap::new(),
			default_policy: ClassPolicy::new(20, Duration::from_secs(60)),
			duplicate_horizon: Duration::from_secs(60),
			retention_horizon: Duration::from_secs(300),
			sweep_interval: Duration::from_secs(60),
		}
	}

	pub fn policy(mut self, class: EndpointClass, policy: ClassPolicy) -> Self {
		self.policies.insert(class, policy);
		self
	}

	pub fn duplicate_horizon(mut self, horizon: Duration) -> Self {
		self.duplicate_horizon = horizon;
		self
	}

	pub fn retention_horizon(mut self, horizon: Duration) -> Self {
		self.retention_horizon = horizon;
		self
	}

	pub fn sweep_interval(mut self, interval: Duration) -> Self {
		self.sweep_interval = interval;
		self
	}

	/// Policy for a class, falling back to the default policy.
	pub fn policy_for(&self, class: EndpointClass) -> &ClassPolicy {
		self.policies.get(&class).unwrap_or(&self.default_policy)
	}

	/// Validate the whole configuration. Called once by
	/// `AdmissionService::new`; an error here is fatal to startup.
	pub fn validate(&self) -> ShResult<()> {
		self.default_policy.validate(EndpointClass::Default)?;
		for (class, policy) in &self.policies {
			policy.validate(*class)?;
		}
		if self.duplicate_horizon.is_zero() {
			return Err(Error::ValidationError("duplicate_horizon must be > 0".into()));
		}
		if self.retention_horizon < self.duplicate_horizon {
			return Err(Error::ValidationError(
				"retention_horizon must not be shorter than duplicate_horizon".into(),
			));
		}
		if self.sweep_interval.is_zero() {
			return Err(Error::ValidationError("sweep_interval must be > 0".into()));
		}
		Ok(())
	}
}

impl Default for AdmissionConfig {
	/// Production defaults, mirroring the per-endpoint limits the API
	/// has always enforced.
	fn default() -> Self {
		Self::new()
			.policy(
				EndpointClass::ForumPost,
				ClassPolicy::new(5, Duration::from_secs(5 * 60)),
			)
			.policy(
				EndpointClass::JourneyCreate,
				ClassPolicy::new(3, Duration::from_secs(60 * 60)).content_bounds(3, 100),
			)
			.policy(
				EndpointClass::NoteCreate,
				ClassPolicy::new(10, Duration::from_secs(60)),
			)
			.policy(
				EndpointClass::ToolComplete,
				ClassPolicy::new(20, Duration::from_secs(60)),
			)
			.policy(
				EndpointClass::ProfessionalSearch,
				ClassPolicy::new(2, Duration::from_secs(60 * 60)).session_cap(0),
			)
			.policy(
				EndpointClass::Auth,
				ClassPolicy::new(5, Duration::from_secs(15 * 60)).session_cap(0),
			)
	}
}


// vim: ts=4
