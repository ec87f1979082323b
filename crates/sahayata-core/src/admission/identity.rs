//! Client identity resolution
//!
//! Derives a stable identifier for the caller from transport-level
//! hints. The identity is not cryptographically unique and is used
//! only for abuse-heuristic bucketing, never for authorization.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::HeaderMap;
use axum::http::request::Parts;

/// Opaque client identity string.
///
/// Precedence: first non-empty forwarded-address entry, else the raw
/// peer address, else the literal `"unknown"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientIdentity(Box<str>);

impl ClientIdentity {
	pub fn new(identity: impl Into<Box<str>>) -> Self {
		ClientIdentity(identity.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Resolve an identity from request transport metadata.
	///
	/// Pure function of its input; always succeeds.
	pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
		if let Some(forwarded) = first_forwarded(headers) {
			return ClientIdentity(forwarded.into());
		}
		if let Some(real_ip) = header_str(headers, "x-real-ip") {
			return ClientIdentity(real_ip.into());
		}
		match peer {
			Some(addr) => ClientIdentity(addr.ip().to_string().into()),
			None => ClientIdentity("unknown".into()),
		}
	}
}

impl std::fmt::Display for ClientIdentity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// First (leftmost) entry of `X-Forwarded-For`: the original client
/// when the chain is `client, proxy1, proxy2`.
fn first_forwarded(headers: &HeaderMap) -> Option<&str> {
	header_str(headers, "x-forwarded-for")?
		.split(',')
		.map(str::trim)
		.find(|part| !part.is_empty())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|h| h.to_str().ok()).map(str::trim).filter(|s| !s.is_empty())
}

/// Axum extractor resolving the caller's `ClientIdentity`.
///
/// Uses `ConnectInfo<SocketAddr>` as the peer fallback, so the router
/// must be served with `into_make_service_with_connect_info`.
#[derive(Clone, Debug)]
pub struct ClientId(pub ClientIdentity);

impl<S> FromRequestParts<S> for ClientId
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &S,
	) -> Result<Self, Self::Rejection> {
		let peer = parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0);
		Ok(ClientId(ClientIdentity::resolve(&parts.headers, peer)))
	}
}


// vim: ts=4
