//! Samvad - the anonymous peer support forum.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};
use sahayata_types::doc_store::ListOptions;

use crate::api::ApiResult;
use crate::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
	pub topic: Option<String>,
	pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessage {
	pub session_id: SessionId,
	#[serde(default = "default_topic")]
	pub topic: String,
	pub text: Option<String>,
}

fn default_topic() -> String {
	"general".into()
}

/// GET /api/samvad - list forum posts, newest first.
pub async fn list_posts(
	State(app): State<App>,
	Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<serde_json::Value>>>> {
	let mut opts = ListOptions {
		limit: Some(query.limit.unwrap_or(50).min(200)),
		..Default::default()
	};
	if let Some(topic) = query.topic {
		opts.filter.push(("topic".into(), json!(topic)));
	}
	let posts = app.store.list("samvad", opts).await?;
	Ok(Json(ApiResponse::new(posts)))
}

/// POST /api/samvad - publish a forum post.
pub async fn post_message(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Json(body): Json<PostMessage>,
) -> ApiResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	let ticket = app.admission.admit(
		AdmissionRequest::new(identity, EndpointClass::ForumPost)
			.text(body.text.as_deref())
			.session(&body.session_id),
	)?;

	// Validation trims the text; persist the trimmed form.
	let text = ticket.content.clone().unwrap_or_default();
	let doc = json!({
		"sid": body.session_id,
		"topic": body.topic,
		"text": text,
		"createdAt": Timestamp::now(),
	});
	let id = app.store.insert("samvad", doc).await?;
	app.admission.commit(ticket);

	debug!("samvad post {} accepted", id);
	Ok((StatusCode::CREATED, Json(ApiResponse::new(json!({ "id": id })))))
}

// vim: ts=4
