//! Anonymous session issuance.
//!
//! Sessions are opaque handles for grouping a visitor's writes; they
//! carry no account and require no credentials. Issuance goes through
//! the default rate class so one client cannot mint sessions to dodge
//! per-session quotas faster than it could dodge per-identity ones.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};

use crate::api::ApiResult;
use crate::prelude::*;

/// POST /api/session - mint a fresh anonymous session id.
pub async fn create_session(
	State(app): State<App>,
	ClientId(identity): ClientId,
) -> ApiResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	app.admission
		.admit(AdmissionRequest::new(identity, EndpointClass::Default))?;

	let session = SessionId(uuid::Uuid::new_v4().to_string().into());
	Ok((
		StatusCode::CREATED,
		Json(ApiResponse::new(json!({ "sessionId": session }))),
	))
}

// vim: ts=4
