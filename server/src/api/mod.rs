//! JSON API handlers.
//!
//! Every write handler follows the same shape: resolve the client
//! identity, ask the admission service for a ticket, persist through
//! the document store, then commit the ticket so the duplicate
//! fingerprint is only recorded for writes that actually landed.

pub mod abhyas;
pub mod auth;
pub mod health;
pub mod journeys;
pub mod notes;
pub mod professionals;
pub mod samvad;
pub mod session;

use axum::response::{IntoResponse, Response};

use sahayata_core::AdmissionDenied;
use sahayata_types::error::Error;

/// Handler error: either a typed admission denial or a server error.
/// Both carry their own response mapping; `?` works on either.
#[derive(Debug)]
pub enum ApiError {
	Denied(AdmissionDenied),
	Server(Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AdmissionDenied> for ApiError {
	fn from(denied: AdmissionDenied) -> Self {
		ApiError::Denied(denied)
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		ApiError::Server(err)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			ApiError::Denied(denied) => denied.into_response(),
			ApiError::Server(err) => err.into_response(),
		}
	}
}

// vim: ts=4
