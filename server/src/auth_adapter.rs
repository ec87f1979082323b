//! Authentication adapter boundary.
//!
//! Credential hashing and token issuance are external collaborators:
//! the admission layer only throttles attempts, it never inspects
//! credentials. The in-memory adapter here exists for development
//! and tests; it stores credentials verbatim and must not be used in
//! production.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::prelude::*;

/// Outcome of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
	/// Credentials accepted; carries an opaque token for the client.
	Accepted { token: Box<str> },
	/// Credentials rejected (wrong password, unknown account, or
	/// registration conflict).
	Rejected { message: Box<str> },
}

#[async_trait]
pub trait AuthAdapter: Send + Sync {
	async fn register(&self, email: &str, name: &str, password: &str) -> ShResult<AuthOutcome>;
	async fn login(&self, email: &str, password: &str) -> ShResult<AuthOutcome>;
}

// MemoryAuthAdapter //
//*******************//
struct Account {
	name: Box<str>,
	password: Box<str>,
}

/// Development adapter. Plaintext storage, process-local.
pub struct MemoryAuthAdapter {
	accounts: RwLock<HashMap<Box<str>, Account>>,
}

impl MemoryAuthAdapter {
	pub fn new() -> Self {
		Self { accounts: RwLock::new(HashMap::new()) }
	}
}

impl Default for MemoryAuthAdapter {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl AuthAdapter for MemoryAuthAdapter {
	async fn register(&self, email: &str, name: &str, password: &str) -> ShResult<AuthOutcome> {
		let mut accounts = self.accounts.write();
		let email_key: Box<str> = email.to_lowercase().into();
		if accounts.contains_key(&email_key) {
			return Ok(AuthOutcome::Rejected {
				message: "An account with this email already exists".into(),
			});
		}
		accounts.insert(email_key, Account { name: name.into(), password: password.into() });
		Ok(AuthOutcome::Accepted { token: uuid::Uuid::new_v4().to_string().into() })
	}

	async fn login(&self, email: &str, password: &str) -> ShResult<AuthOutcome> {
		let accounts = self.accounts.read();
		match accounts.get(email.to_lowercase().as_str()) {
			Some(account) if account.password.as_ref() == password => {
				debug!("login accepted for {}", account.name);
				Ok(AuthOutcome::Accepted { token: uuid::Uuid::new_v4().to_string().into() })
			}
			_ => Ok(AuthOutcome::Rejected { message: "Invalid email or password".into() }),
		}
	}
}


// vim: ts=4
