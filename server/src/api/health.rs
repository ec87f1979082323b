//! Liveness and admission bookkeeping snapshot.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::app::VERSION;
use crate::prelude::*;

/// GET /api/health
pub async fn health(State(app): State<App>) -> Json<serde_json::Value> {
	let stats = app.admission.stats();
	Json(json!({
		"status": "ok",
		"version": VERSION,
		"admission": {
			"rateWindows": stats.rate_windows,
			"fingerprintKeys": stats.fingerprint_keys,
			"fingerprints": stats.fingerprints,
			"sessionEntries": stats.session_entries,
		},
	}))
}

// vim: ts=4
