//! Duplicate-content suppression
//!
//! Short-horizon memory of content fingerprints per (identity,
//! endpoint-class), used to reject near-immediate repeats. The
//! fingerprint is a cheap order-sensitive rolling hash; collisions
//! are acceptable since this is abuse mitigation, not
//! correctness-critical deduplication.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::admission::error::AdmissionDenied;
use crate::admission::BucketKey;
use crate::prelude::*;

// Fingerprint //
//*************//
/// Compact digest of normalized (trimmed) text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint(u32);

impl Fingerprint {
	/// Deterministic, order-sensitive rolling hash: `h = h * 31 + ch`
	/// over the trimmed text, wrapping at 32 bits.
	pub fn of(content: &str) -> Self {
		let mut hash: u32 = 0;
		for c in content.trim().chars() {
			hash = hash.wrapping_mul(31).wrapping_add(c as u32);
		}
		Fingerprint(hash)
	}
}

// DuplicateSuppressor //
//*********************//
/// Per-key fingerprint history. History length per key is bounded by
/// the request rate within the horizon (the rate limiter caps that),
/// so it cannot grow unboundedly between sweeps.
pub struct DuplicateSuppressor {
	history: Mutex<HashMap<BucketKey, Vec<(Fingerprint, Timestamp)>>>,
}

impl DuplicateSuppressor {
	pub fn new() -> Self {
		Self { history: Mutex::new(HashMap::new()) }
	}

	/// Check whether `content` repeats a submission younger than
	/// `horizon`. Entries older than the horizon are pruned on every
	/// access (lazy pruning), so a delayed sweep never causes an
	/// incorrect decision.
	///
	/// On success the fingerprint is returned but NOT recorded; the
	/// caller commits it with [`record`](Self::record) only after the
	/// write has actually been persisted.
	pub fn check(
		&self,
		key: &BucketKey,
		content: &str,
		horizon: Duration,
		now: Timestamp,
	) -> Result<Fingerprint, AdmissionDenied> {
		let fingerprint = Fingerprint::of(content);
		let mut history = self.history.lock();

		if let Some(entries) = history.get_mut(key) {
			entries.retain(|(_, at)| now.since(*at) < horizon);
			if entries.iter().any(|(fp, _)| *fp == fingerprint) {
				debug!("duplicate content from {} [{}]", key.identity, key.class);
				return Err(AdmissionDenied::DuplicateContent { horizon });
			}
		}

		Ok(fingerprint)
	}

	/// Record a committed fingerprint for the key.
	pub fn record(&self, key: &BucketKey, fingerprint: Fingerprint, now: Timestamp) {
		let mut history = self.history.lock();
		history.entry(key.clone()).or_default().push((fingerprint, now));
	}

	/// Prune every history to entries younger than `retention` and
	/// drop keys left empty. Returns the number of dropped keys.
	/// Snapshots the keys first and prunes each one under its own
	/// short lock hold, never holding the lock across the full scan.
	pub fn sweep(&self, retention: Duration, now: Timestamp) -> usize {
		let keys: Vec<BucketKey> = self.history.lock().keys().cloned().collect();
		let mut dropped = 0;
		for key in keys {
			let mut history = self.history.lock();
			if let Some(entries) = history.get_mut(&key) {
				entries.retain(|(_, at)| now.since(*at) < retention);
				if entries.is_empty() {
					history.remove(&key);
					dropped += 1;
				}
			}
		}
		dropped
	}

	/// Number of tracked keys (diagnostics).
	pub fn key_count(&self) -> usize {
		self.history.lock().len()
	}

	/// Total fingerprints across all keys (diagnostics).
	pub fn entry_count(&self) -> usize {
		self.history.lock().values().map(Vec::len).sum()
	}
}

impl Default for DuplicateSuppressor {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
