//! Fixed-window rate limiter
//!
//! Per (identity, endpoint-class) counter with a reset deadline.
//! Classic fixed-window semantics: the counter resets entirely once
//! the deadline passes, so bursts up to twice the limit are possible
//! across a window boundary. Accepted tradeoff for O(1) memory and
//! O(1) cost per check.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::admission::config::ClassPolicy;
use crate::admission::error::AdmissionDenied;
use crate::admission::BucketKey;
use crate::prelude::*;

/// Counter state for one key within the current window.
#[derive(Debug, Clone)]
struct RateWindow {
	count: u32,
	reset_at: Timestamp,
}

/// Rate limiter over all (identity, endpoint-class) buckets.
///
/// A single mutex guards the map; each check is a short
/// read-modify-write, so concurrent increments to the same key
/// cannot be lost.
pub struct RateLimiter {
	windows: Mutex<HashMap<BucketKey, RateWindow>>,
}

impl RateLimiter {
	pub fn new() -> Self {
		Self { windows: Mutex::new(HashMap::new()) }
	}

	/// Check the key against its policy and consume one slot on
	/// success. Returns the remaining allowance in this window.
	pub fn check_and_consume(
		&self,
		key: &BucketKey,
		policy: &ClassPolicy,
		now: Timestamp,
	) -> Result<u32, AdmissionDenied> {
		let mut windows = self.windows.lock();

		match windows.get_mut(key) {
			// Fresh window: absent, or the old one expired. Replaced,
			// not incremented.
			None => {
				windows.insert(
					key.clone(),
					RateWindow { count: 1, reset_at: now.after(policy.window) },
				);
				Ok(policy.max_requests - 1)
			}
			Some(window) if now > window.reset_at => {
				*window = RateWindow { count: 1, reset_at: now.after(policy.window) };
				Ok(policy.max_requests - 1)
			}
			Some(window) if window.count >= policy.max_requests => {
				let retry_after = window.reset_at.since(now);
				debug!("rate limited {} [{}]", key.identity, key.class);
				Err(AdmissionDenied::RateLimited {
					class: key.class,
					limit: policy.max_requests,
					window: policy.window,
					retry_after,
				})
			}
			Some(window) => {
				window.count += 1;
				Ok(policy.max_requests - window.count)
			}
		}
	}

	/// Drop every window whose reset deadline has passed. Returns the
	/// number of evicted entries. Snapshots the keys first, then
	/// re-checks each key under its own short lock hold, so a large
	/// map never pins the lock for a full scan.
	pub fn sweep(&self, now: Timestamp) -> usize {
		let keys: Vec<BucketKey> = self.windows.lock().keys().cloned().collect();
		let mut evicted = 0;
		for key in keys {
			let mut windows = self.windows.lock();
			// Re-check: the window may have been refreshed since the
			// snapshot was taken.
			if windows.get(&key).is_some_and(|window| now > window.reset_at) {
				windows.remove(&key);
				evicted += 1;
			}
		}
		evicted
	}

	/// Number of live windows (diagnostics).
	pub fn len(&self) -> usize {
		self.windows.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.windows.lock().is_empty()
	}
}

impl Default for RateLimiter {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::admission::config::EndpointClass;
	use crate::admission::identity::ClientIdentity;
	use std::time::Duration;

	fn key() -> BucketKey {
		BucketKey::new(ClientIdentity::new("203.0.113.7"), EndpointClass::ForumPost)
	}

	fn policy(max: u32, window_secs: u64) -> ClassPolicy {
		ClassPolicy::new(max, Duration::from_secs(window_secs))
	}

	#[test]
	fn test_allows_up_to_max_then_denies() {
		let limiter = RateLimiter::new();
		let policy = policy(3, 60);
		let now = Timestamp(1_000);

		assert_eq!(limiter.check_and_consume(&key(), &policy, now), Ok(2));
		assert_eq!(limiter.check_and_consume(&key(), &policy, now), Ok(1));
		assert_eq!(limiter.check_and_consume(&key(), &policy, now), Ok(0));

		let denied = limiter.check_and_consume(&key(), &policy, now).unwrap_err();
		match denied {
			AdmissionDenied::RateLimited { limit, retry_after, .. } => {
				assert_eq!(limit, 3);
				assert_eq!(retry_after, Duration::from_secs(60));
			}
			other => panic!("expected RateLimited, got {:?}", other),
		}
	}

	#[test]
	fn test_window_resets_after_deadline() {
		let limiter = RateLimiter::new();
		let policy = policy(2, 60);
		let now = Timestamp(1_000);

		assert!(limiter.check_and_consume(&key(), &policy, now).is_ok());
		assert!(limiter.check_and_consume(&key(), &policy, now).is_ok());
		assert!(limiter.check_and_consume(&key(), &policy, now).is_err());

		// Just past the deadline: next check starts a fresh window with
		// count = 1, regardless of prior denials.
		let later = Timestamp(1_000 + 60_001);
		assert_eq!(limiter.check_and_consume(&key(), &policy, later), Ok(1));
	}

	#[test]
	fn test_boundary_burst_across_adjacent_windows_is_expected() {
		// Fixed-window semantics: up to 2x max across two adjacent
		// windows is acceptable, not a bug.
		let limiter = RateLimiter::new();
		let policy = policy(3, 60);

		let end_of_first = Timestamp(60_000);
		for _ in 0..3 {
			assert!(limiter.check_and_consume(&key(), &policy, end_of_first).is_ok());
		}

		let start_of_second = Timestamp(120_001);
		for _ in 0..3 {
			assert!(limiter.check_and_consume(&key(), &policy, start_of_second).is_ok());
		}
	}

	#[test]
	fn test_keys_are_independent() {
		let limiter = RateLimiter::new();
		let policy = policy(1, 60);
		let now = Timestamp(1_000);

		let other = BucketKey::new(ClientIdentity::new("198.51.100.4"), EndpointClass::ForumPost);
		assert!(limiter.check_and_consume(&key(), &policy, now).is_ok());
		assert!(limiter.check_and_consume(&other, &policy, now).is_ok());
		assert!(limiter.check_and_consume(&key(), &policy, now).is_err());

		// Same identity, different class: also independent
		let other_class =
			BucketKey::new(ClientIdentity::new("203.0.113.7"), EndpointClass::NoteCreate);
		assert!(limiter.check_and_consume(&other_class, &policy, now).is_ok());
	}

	#[test]
	fn test_sweep_removes_only_expired_windows() {
		let limiter = RateLimiter::new();
		let policy = policy(5, 60);
		let now = Timestamp(1_000);

		let fresh = BucketKey::new(ClientIdentity::new("198.51.100.4"), EndpointClass::Auth);
		limiter.check_and_consume(&key(), &policy, now).unwrap();
		limiter.check_and_consume(&fresh, &policy, Timestamp(50_000)).unwrap();
		assert_eq!(limiter.len(), 2);

		let swept = limiter.sweep(Timestamp(70_000));
		assert_eq!(swept, 1);
		assert_eq!(limiter.len(), 1);

		// Idempotent: a second sweep with no new activity is a no-op
		assert_eq!(limiter.sweep(Timestamp(70_000)), 0);
		assert_eq!(limiter.len(), 1);
	}

	#[test]
	fn test_sweep_large_mixed_population() {
		let limiter = RateLimiter::new();
		let policy = policy(5, 60);

		// Odd-numbered clients start their window a minute later
		for i in 0..100 {
			let key = BucketKey::new(
				ClientIdentity::new(format!("198.51.100.{}", i)),
				EndpointClass::Default,
			);
			let started = if i % 2 == 0 { Timestamp(0) } else { Timestamp(60_000) };
			limiter.check_and_consume(&key, &policy, started).unwrap();
		}

		assert_eq!(limiter.sweep(Timestamp(61_000)), 50);
		assert_eq!(limiter.len(), 50);

		// Survivors keep their counts: a second request in the same
		// window still decrements the allowance
		let survivor = BucketKey::new(
			ClientIdentity::new("198.51.100.1"),
			EndpointClass::Default,
		);
		assert_eq!(limiter.check_and_consume(&survivor, &policy, Timestamp(61_000)), Ok(3));
	}

	#[test]
	fn test_concurrent_increments_are_not_lost() {
		use std::sync::Arc;

		let limiter = Arc::new(RateLimiter::new());
		let policy = Arc::new(policy(1_000, 60));
		let now = Timestamp(1_000);

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let limiter = Arc::clone(&limiter);
				let policy = Arc::clone(&policy);
				std::thread::spawn(move || {
					let mut allowed = 0;
					for _ in 0..100 {
						if limiter.check_and_consume(&key(), &policy, now).is_ok() {
							allowed += 1;
						}
					}
					allowed
				})
			})
			.collect();

		let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
		// 800 attempts against a limit of 1000: every one must land
		assert_eq!(total, 800);
	}
}

// vim: ts=4
