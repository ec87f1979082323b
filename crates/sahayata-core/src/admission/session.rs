//! Session quota tracking
//!
//! Lifetime-of-process counter capping total accepted actions per
//! (session, endpoint-class), independent of time. Explicitly a
//! soft, best-effort cap: the counters are lost on restart.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::admission::config::EndpointClass;
use crate::admission::error::AdmissionDenied;
use crate::prelude::*;

/// Monotonically increasing, never-reset per-session counters.
pub struct SessionQuota {
	counts: Mutex<HashMap<(SessionId, EndpointClass), u32>>,
}

impl SessionQuota {
	pub fn new() -> Self {
		Self { counts: Mutex::new(HashMap::new()) }
	}

	/// Deny once the cap is reached, otherwise increment and return
	/// the new count. A cap of zero disables the quota entirely.
	pub fn check_and_consume(
		&self,
		session: &SessionId,
		class: EndpointClass,
		cap: u32,
	) -> Result<u32, AdmissionDenied> {
		if cap == 0 {
			return Ok(0);
		}

		let mut counts = self.counts.lock();
		let count = counts.entry((session.clone(), class)).or_insert(0);
		if *count >= cap {
			debug!("session quota exhausted for {} [{}]", session, class);
			return Err(AdmissionDenied::SessionLimitExceeded { class, cap });
		}
		*count += 1;
		Ok(*count)
	}

	/// Number of tracked (session, class) pairs (diagnostics).
	pub fn len(&self) -> usize {
		self.counts.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.lock().is_empty()
	}
}

impl Default for SessionQuota {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
