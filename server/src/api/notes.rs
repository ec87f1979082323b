//! Private notes scoped to a session.

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
	pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
	pub session_id: SessionId,
	pub text: Option<String>,
}

/// GET /api/notes - the caller's own notes, newest first.
pub async fn list_notes(
	State(app): State<App>,
	Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<serde_json::Value>>>> {
	let opts = ListOptions {
		filter: vec![("sid".into(), json!(query.session_id))],
		limit: Some(100),
	};
	let notes = app.store.list("notes", opts).await?;
	Ok(Json(ApiResponse::new(notes)))
}

/// POST /api/notes - save a note.
pub async fn create_note(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Json(body): Json<CreateNote>,
) -> ApiResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
	let ticket = app.admission.admit(
		AdmissionRequest::new(identity, EndpointClass::NoteCreate)
			.text(body.text.as_deref())
			.session(&body.session_id),
	)?;

	let text = ticket.content.clone().unwrap_or_default();
	let doc = json!({
		"sid": body.session_id,
		"text": text,
		"createdAt": Timestamp::now(),
	});
	let id = app.store.insert("notes", doc).await?;
	app.admission.commit(ticket);

	Ok((StatusCode::CREATED, Json(ApiResponse::new(json!({ "id": id })))))
}

// vim: ts=4
