//! Document store adapter boundary.
//!
//! The admission-control core never touches storage; the server
//! persists accepted writes through this trait. Schemas are the
//! adapter's business; documents travel as JSON values.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ShResult;

/// Equality conditions a document must all satisfy.
pub type Filter = Vec<(Box<str>, Value)>;

/// True when `doc` satisfies every condition in `filter`.
pub fn matches(doc: &Value, filter: &Filter) -> bool {
	filter.iter().all(|(field, value)| doc.get(field.as_ref()) == Some(value))
}

/// Options for listing documents from a collection.
#[derive(Debug, Default, Clone)]
pub struct ListOptions {
	/// Only return documents matching every condition.
	pub filter: Filter,
	/// Maximum number of documents, newest first.
	pub limit: Option<usize>,
}

#[async_trait]
pub trait DocStore: Send + Sync {
	/// Insert a document into a collection, returning its generated id.
	async fn insert(&self, collection: &str, doc: Value) -> ShResult<Box<str>>;

	/// List documents from a collection, newest first.
	async fn list(&self, collection: &str, opts: ListOptions) -> ShResult<Vec<Value>>;

	/// Newest document matching the filter, if any.
	async fn find_one(&self, collection: &str, filter: Filter) -> ShResult<Option<Value>>;

	/// Replace the newest document matching the filter, inserting
	/// `doc` as a fresh document when nothing matches.
	async fn upsert(&self, collection: &str, filter: Filter, doc: Value) -> ShResult<()>;

	/// Delete every document matching the filter, returning the
	/// number removed.
	async fn remove(&self, collection: &str, filter: Filter) -> ShResult<usize>;

	/// Number of documents in a collection (diagnostics).
	async fn count(&self, collection: &str) -> ShResult<usize>;
}


// vim: ts=4
