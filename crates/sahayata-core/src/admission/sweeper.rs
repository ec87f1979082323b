//! Expiry sweeper
//!
//! Recurring background task that evicts stale rate windows and
//! fingerprint history so memory stays bounded. A missed or delayed
//! sweep only delays reclamation; it never affects allow/deny
//! decisions because the limiter and the suppressor re-validate
//! freshness on every access.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::admission::service::AdmissionState;
use crate::prelude::*;

/// Handle to the recurring sweep task. Owned by the service: started
/// on construction, stopped on shutdown.
pub(crate) struct Sweeper {
	shutdown: Arc<Notify>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
	pub(crate) fn start(state: Arc<AdmissionState>, interval: Duration) -> Self {
		let shutdown = Arc::new(Notify::new());
		let stop = shutdown.clone();

		let handle = tokio::spawn(async move {
			loop {
				tokio::select! {
					() = tokio::time::sleep(interval) => {
						let (windows, keys) = state.sweep(Timestamp::now());
						if windows > 0 || keys > 0 {
							debug!("sweep evicted {} rate windows, {} fingerprint keys", windows, keys);
						}
					}
					() = stop.notified() => break,
				}
			}
			debug!("sweeper stopped");
		});

		Self { shutdown, handle: Mutex::new(Some(handle)) }
	}

	/// Stop the sweep task and wait for it to finish. Idempotent.
	pub(crate) async fn stop(&self) {
		self.shutdown.notify_one();
		let handle = self.handle.lock().take();
		if let Some(handle) = handle {
			if let Err(err) = handle.await {
				warn!("sweeper task join failed: {}", err);
			}
		}
	}
}

// vim: ts=4
