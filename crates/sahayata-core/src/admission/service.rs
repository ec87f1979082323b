//! Admission facade
//!
//! Composes the policies in a fixed order for a given write:
//! rate limit, content validation, duplicate suppression, session
//! quota. Short-circuits on the first denial. On approval the caller
//! receives a ticket; the duplicate-content fingerprint is only
//! committed once the caller confirms the write was persisted, so a
//! write the caller later rejects leaves no fingerprint behind.

use std::sync::Arc;

use crate::admission::config::{AdmissionConfig, EndpointClass};
use crate::admission::duplicate::{DuplicateSuppressor, Fingerprint};
use crate::admission::error::AdmissionDenied;
use crate::admission::identity::ClientIdentity;
use crate::admission::limiter::RateLimiter;
use crate::admission::session::SessionQuota;
use crate::admission::sweeper::Sweeper;
use crate::admission::BucketKey;
use crate::prelude::*;

/// One unit of client activity submitted for admission.
pub struct AdmissionRequest<'a> {
	identity: ClientIdentity,
	class: EndpointClass,
	/// `None`: the operation carries no text payload and content
	/// checks are skipped. `Some(inner)`: the operation is
	/// text-carrying and `inner` is the (possibly absent) payload --
	/// an absent payload on a text-carrying operation is denied as
	/// invalid content.
	text: Option<Option<&'a str>>,
	session: Option<&'a SessionId>,
}

impl<'a> AdmissionRequest<'a> {
	pub fn new(identity: ClientIdentity, class: EndpointClass) -> Self {
		Self { identity, class, text: None, session: None }
	}

	/// Mark the operation as text-carrying and attach its payload.
	pub fn text(mut self, text: Option<&'a str>) -> Self {
		self.text = Some(text);
		self
	}

	/// Attach the client session for quota accounting.
	pub fn session(mut self, session: &'a SessionId) -> Self {
		self.session = Some(session);
		self
	}
}

/// Proof of an approved admission.
///
/// Carries the trimmed content for the caller to persist and the
/// pending duplicate fingerprint for [`AdmissionService::commit`].
#[derive(Debug)]
pub struct AdmissionTicket {
	/// Remaining allowance in the current rate window.
	pub remaining: u32,
	/// Trimmed content, when the operation carried text.
	pub content: Option<Box<str>>,
	/// Session action count after this admission, when tracked.
	pub session_count: Option<u32>,
	key: BucketKey,
	fingerprint: Option<Fingerprint>,
}

/// Shared mutable admission state, also visible to the sweeper.
pub(crate) struct AdmissionState {
	pub(crate) config: AdmissionConfig,
	pub(crate) limiter: RateLimiter,
	pub(crate) duplicates: DuplicateSuppressor,
	pub(crate) sessions: SessionQuota,
}

impl AdmissionState {
	/// One sweep pass. Returns (evicted rate windows, dropped
	/// fingerprint keys). Safe to run at any time, any number of
	/// times.
	pub(crate) fn sweep(&self, now: Timestamp) -> (usize, usize) {
		let windows = self.limiter.sweep(now);
		let keys = self.duplicates.sweep(self.config.retention_horizon, now);
		(windows, keys)
	}
}

/// Point-in-time snapshot of admission bookkeeping (diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionStats {
	pub rate_windows: usize,
	pub fingerprint_keys: usize,
	pub fingerprints: usize,
	pub session_entries: usize,
}

/// The admission-control service. One instance per process; owns all
/// in-memory policy state and the background sweeper.
pub struct AdmissionService {
	state: Arc<AdmissionState>,
	sweeper: Sweeper,
}

impl AdmissionService {
	/// Validate the configuration and start the service, including
	/// its sweeper task. A malformed configuration is fatal here,
	/// never a per-request condition.
	pub fn new(config: AdmissionConfig) -> ShResult<Self> {
		config.validate()?;
		let sweep_interval = config.sweep_interval;

		let state = Arc::new(AdmissionState {
			config,
			limiter: RateLimiter::new(),
			duplicates: DuplicateSuppressor::new(),
			sessions: SessionQuota::new(),
		});
		let sweeper = Sweeper::start(state.clone(), sweep_interval);

		info!("admission service started (sweep every {:?})", sweep_interval);
		Ok(Self { state, sweeper })
	}

	/// Decide whether the request may proceed.
	///
	/// On approval the returned ticket signals the caller to perform
	/// the write; call [`commit`](Self::commit) afterwards.
	pub fn admit(&self, request: AdmissionRequest<'_>) -> Result<AdmissionTicket, AdmissionDenied> {
		self.admit_at(request, Timestamp::now())
	}

	pub(crate) fn admit_at(
		&self,
		request: AdmissionRequest<'_>,
		now: Timestamp,
	) -> Result<AdmissionTicket, AdmissionDenied> {
		let policy = self.state.config.policy_for(request.class);
		let key = BucketKey::new(request.identity, request.class);

		let remaining = self.state.limiter.check_and_consume(&key, policy, now)?;

		let mut content = None;
		let mut fingerprint = None;
		if let Some(text) = request.text {
			let trimmed =
				super::validator::validate(text, policy.min_length, policy.max_length)?;
			fingerprint = Some(self.state.duplicates.check(
				&key,
				&trimmed,
				self.state.config.duplicate_horizon,
				now,
			)?);
			content = Some(trimmed);
		}

		let mut session_count = None;
		if let Some(session) = request.session {
			session_count =
				Some(self.state.sessions.check_and_consume(session, request.class, policy.session_cap)?);
		}

		Ok(AdmissionTicket { remaining, content, session_count, key, fingerprint })
	}

	/// Commit an approved admission after the caller has persisted
	/// the write. Records the duplicate-content fingerprint; without
	/// this call an approved-but-unpersisted write leaves no trace.
	pub fn commit(&self, ticket: AdmissionTicket) {
		self.commit_at(ticket, Timestamp::now());
	}

	pub(crate) fn commit_at(&self, ticket: AdmissionTicket, now: Timestamp) {
		if let Some(fingerprint) = ticket.fingerprint {
			self.state.duplicates.record(&ticket.key, fingerprint, now);
		}
	}

	pub fn stats(&self) -> AdmissionStats {
		AdmissionStats {
			rate_windows: self.state.limiter.len(),
			fingerprint_keys: self.state.duplicates.key_count(),
			fingerprints: self.state.duplicates.entry_count(),
			session_entries: self.state.sessions.len(),
		}
	}

	/// Stop the background sweeper. Policy state stays readable but
	/// is no longer reclaimed; intended for process teardown and
	/// test cleanup.
	pub async fn shutdown(&self) {
		self.sweeper.stop().await;
		info!("admission service stopped");
	}
}


// vim: ts=4
