//! Error types
//!
//! The workspace-wide `Error` enum and `ShResult` alias. Every failure
//! that is not an admission policy denial flows through this type;
//! policy denials have their own type in the core crate because they
//! are expected business outcomes, not faults.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type ShResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	/// Startup-time configuration or input shape problem. Fatal during
	/// process initialization, HTTP 400 when triggered by a request body.
	ValidationError(String),
	ServiceUnavailable(String),
	Internal(String),

	// externals
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			Error::Json(err) => write!(f, "json error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl Error {
	fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::PermissionDenied => "E-PERMISSION",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::ServiceUnavailable(_) => "E-UNAVAILABLE",
			Error::Internal(_) | Error::Io(_) | Error::Json(_) => "E-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::Internal(_) | Error::Io(_) | Error::Json(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		// Internal details are logged, never sent to the client
		let message = match &self {
			Error::Internal(msg) => {
				tracing::error!("internal error: {}", msg);
				"Internal server error".to_string()
			}
			Error::Io(err) => {
				tracing::error!("io error: {}", err);
				"Internal server error".to_string()
			}
			Error::Json(err) => {
				tracing::error!("json error: {}", err);
				"Internal server error".to_string()
			}
			other => other.to_string(),
		};

		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message
			}
		});
		(self.status(), Json(body)).into_response()
	}
}


// vim: ts=4
