//! Account registration and login for professionals.
//!
//! Admission here is pure rate limiting with a slow window to blunt
//! credential stuffing. Credential checking itself is delegated to
//! the configured [`AuthAdapter`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};

use crate::api::{ApiError, ApiResult};
use crate::auth_adapter::AuthOutcome;
use crate::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthAction {
	#[serde(rename = "register")]
	Register,
	#[serde(rename = "login")]
	Login,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthBody {
	pub action: AuthAction,
	pub email: String,
	pub password: String,
	#[serde(default)]
	pub name: String,
}

/// POST /api/auth - register or log in.
pub async fn authenticate(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Json(body): Json<AuthBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	app.admission
		.admit(AdmissionRequest::new(identity.clone(), EndpointClass::Auth))?;

	if !body.email.contains('@') || body.password.len() < 8 {
		return Err(ApiError::Server(Error::ValidationError(
			"Valid email and a password of at least 8 characters are required".into(),
		)));
	}

	let outcome = match body.action {
		AuthAction::Register => {
			if body.name.trim().chars().count() < 2 {
				return Err(ApiError::Server(Error::ValidationError(
					"Name must be at least 2 characters".into(),
				)));
			}
			app.auth.register(&body.email, &body.name, &body.password).await?
		}
		AuthAction::Login => app.auth.login(&body.email, &body.password).await?,
	};

	match outcome {
		AuthOutcome::Accepted { token } => {
			info!("auth accepted for {}", identity);
			Ok((StatusCode::OK, Json(ApiResponse::new(json!({ "token": token })))))
		}
		AuthOutcome::Rejected { message } => {
			warn!("auth rejected for {}: {}", identity, message);
			Err(ApiError::Server(Error::PermissionDenied))
		}
	}
}

// vim: ts=4
