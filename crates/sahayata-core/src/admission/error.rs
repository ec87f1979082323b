//! Admission denial types
//!
//! A denial is an expected, recoverable business outcome, not a
//! fault: every variant carries a reason code and a human-readable
//! message, and maps to a transport response without ever
//! propagating an unhandled error to the caller.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::admission::config::EndpointClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDenied {
	/// Too many requests in the current fixed window.
	RateLimited {
		class: EndpointClass,
		/// Configured per-window maximum.
		limit: u32,
		/// Configured window length.
		window: Duration,
		/// Time until the window resets.
		retry_after: Duration,
	},
	/// Content missing or outside the configured length bounds.
	InvalidContent { detail: String },
	/// Content matched a spam heuristic.
	SpamDetected,
	/// Identical content was submitted within the suppression horizon.
	DuplicateContent { horizon: Duration },
	/// Lifetime per-session cap reached for this endpoint class.
	SessionLimitExceeded { class: EndpointClass, cap: u32 },
}

impl AdmissionDenied {
	/// Stable reason code for logs and API responses.
	pub fn reason(&self) -> &'static str {
		match self {
			AdmissionDenied::RateLimited { .. } => "RateLimited",
			AdmissionDenied::InvalidContent { .. } => "InvalidContent",
			AdmissionDenied::SpamDetected => "SpamDetected",
			AdmissionDenied::DuplicateContent { .. } => "DuplicateContent",
			AdmissionDenied::SessionLimitExceeded { .. } => "SessionLimitExceeded",
		}
	}

	/// Suggested client wait before retrying, where one applies.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			AdmissionDenied::RateLimited { retry_after, .. } => Some(*retry_after),
			AdmissionDenied::DuplicateContent { horizon } => Some(*horizon),
			_ => None,
		}
	}
}

impl std::fmt::Display for AdmissionDenied {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AdmissionDenied::RateLimited { limit, window, .. } => {
				write!(
					f,
					"Rate limit exceeded. Max {} requests per {} minutes.",
					limit,
					window.as_secs().div_ceil(60)
				)
			}
			AdmissionDenied::InvalidContent { detail } => write!(f, "{}", detail),
			AdmissionDenied::SpamDetected => write!(f, "Content appears to be spam"),
			AdmissionDenied::DuplicateContent { .. } => {
				write!(f, "Duplicate content detected. Please wait before posting similar content.")
			}
			AdmissionDenied::SessionLimitExceeded { class, cap } => {
				write!(f, "Session limit exceeded. Maximum {} {} actions per session.", cap, class)
			}
		}
	}
}

impl std::error::Error for AdmissionDenied {}

impl IntoResponse for AdmissionDenied {
	fn into_response(self) -> Response {
		let status = match &self {
			AdmissionDenied::RateLimited { .. }
			| AdmissionDenied::SessionLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
			AdmissionDenied::InvalidContent { .. } | AdmissionDenied::SpamDetected => {
				StatusCode::BAD_REQUEST
			}
			AdmissionDenied::DuplicateContent { .. } => StatusCode::CONFLICT,
		};

		let retry_after = self.retry_after();
		let body = serde_json::json!({
			"error": {
				"code": "E-ADMISSION",
				"reason": self.reason(),
				"message": self.to_string(),
				"details": {
					"retryAfter": retry_after.map(|d| d.as_secs())
				}
			}
		});

		let mut response = (status, Json(body)).into_response();
		if let Some(dur) = retry_after {
			if let Ok(val) = dur.as_secs().to_string().parse() {
				response.headers_mut().insert("Retry-After", val);
			}
		}
		response
	}
}


// vim: ts=4
