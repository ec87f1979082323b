//! Common types used throughout the Sahayata platform.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

// Timestamp //
//***********//
/// Millisecond-precision wall-clock timestamp.
///
/// Milliseconds because the admission windows (shortest: one minute)
/// and duplicate horizons are sub-minute and tests drive them with
/// synthetic clocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_millis()).unwrap_or(i64::MAX))
	}

	/// Timestamp `dur` in the future relative to `self`.
	pub fn after(self, dur: Duration) -> Self {
		Timestamp(self.0.saturating_add(i64::try_from(dur.as_millis()).unwrap_or(i64::MAX)))
	}

	/// Elapsed time since `earlier`, zero if `earlier` is in the future.
	pub fn since(self, earlier: Timestamp) -> Duration {
		Duration::from_millis(u64::try_from(self.0 - earlier.0).unwrap_or(0))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// SessionId //
//***********//
/// Opaque client session identifier issued by the session endpoint.
///
/// Not an authenticated principal; used only for per-session quota
/// bookkeeping and document attribution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Box<str>);

impl SessionId {
	pub fn new(id: impl Into<Box<str>>) -> Self {
		SessionId(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

// ApiResponse //
//*************//
/// Standard success envelope for API responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_timestamp_after_and_since() {
		let t = Timestamp(1_000);
		let later = t.after(Duration::from_secs(2));
		assert_eq!(later, Timestamp(3_000));
		assert_eq!(later.since(t), Duration::from_secs(2));
		// earlier in the future clamps to zero
		assert_eq!(t.since(later), Duration::ZERO);
	}

	#[test]
	fn test_session_id_serde_transparent() {
		let sid = SessionId::new("abc-123");
		let json = serde_json::to_string(&sid).unwrap();
		assert_eq!(json, "\"abc-123\"");
		let back: SessionId = serde_json::from_str(&json).unwrap();
		assert_eq!(back, sid);
	}
}

// vim: ts=4
