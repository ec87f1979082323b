//! In-memory document store adapter.
//!
//! Keeps collections as append-ordered vectors of JSON documents.
//! Good enough for development, tests, and single-instance
//! deployments that accept losing data on restart; production
//! deployments plug in a real database behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use sahayata_types::doc_store::{matches, DocStore, Filter, ListOptions};
use sahayata_types::error::ShResult;

pub struct MemoryDocStore {
	collections: RwLock<HashMap<Box<str>, Vec<(Box<str>, Value)>>>,
}

impl MemoryDocStore {
	pub fn new() -> Self {
		Self { collections: RwLock::new(HashMap::new()) }
	}
}

impl Default for MemoryDocStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl DocStore for MemoryDocStore {
	async fn insert(&self, collection: &str, doc: Value) -> ShResult<Box<str>> {
		let id: Box<str> = uuid::Uuid::new_v4().to_string().into();
		let mut collections = self.collections.write();
		collections.entry(collection.into()).or_default().push((id.clone(), doc));
		Ok(id)
	}

	async fn list(&self, collection: &str, opts: ListOptions) -> ShResult<Vec<Value>> {
		let collections = self.collections.read();
		let Some(docs) = collections.get(collection) else {
			return Ok(Vec::new());
		};

		let iter = docs.iter().rev().map(|(_, doc)| doc).filter(|doc| matches(doc, &opts.filter));

		Ok(match opts.limit {
			Some(limit) => iter.take(limit).cloned().collect(),
			None => iter.cloned().collect(),
		})
	}

	async fn find_one(&self, collection: &str, filter: Filter) -> ShResult<Option<Value>> {
		let collections = self.collections.read();
		Ok(collections.get(collection).and_then(|docs| {
			docs.iter().rev().map(|(_, doc)| doc).find(|doc| matches(doc, &filter)).cloned()
		}))
	}

	async fn upsert(&self, collection: &str, filter: Filter, doc: Value) -> ShResult<()> {
		let mut collections = self.collections.write();
		let docs = collections.entry(collection.into()).or_default();
		match docs.iter_mut().rev().find(|(_, existing)| matches(existing, &filter)) {
			Some((_, existing)) => *existing = doc,
			None => {
				let id: Box<str> = uuid::Uuid::new_v4().to_string().into();
				docs.push((id, doc));
			}
		}
		Ok(())
	}

	async fn remove(&self, collection: &str, filter: Filter) -> ShResult<usize> {
		let mut collections = self.collections.write();
		let Some(docs) = collections.get_mut(collection) else {
			return Ok(0);
		};
		let before = docs.len();
		docs.retain(|(_, doc)| !matches(doc, &filter));
		Ok(before - docs.len())
	}

	async fn count(&self, collection: &str) -> ShResult<usize> {
		Ok(self.collections.read().get(collection).map_or(0, Vec::len))
	}
}


// vim: ts=4
