//! Abhyas - guided practice tools (breathing, grounding, and so on).
//!
//! The catalogue is served from the store when an operator has
//! loaded one, falling back to the built-in set. Completions are
//! textless writes: they pass through rate limiting and the session
//! quota, but carry no content to validate or fingerprint. Each
//! first-time completion of a tool earns the session progress
//! points.

use std::sync::OnceLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};
use sahayata_types::doc_store::{Filter, ListOptions};

use crate::api::ApiResult;
use crate::prelude::*;

/// Points a session earns the first time it completes a tool.
const POINTS_PER_TOOL: u64 = 10;

fn default_tools() -> &'static Vec<Value> {
	static TOOLS: OnceLock<Vec<Value>> = OnceLock::new();
	TOOLS.get_or_init(|| {
		vec![
			json!({"key": "breathing", "title": "Guided breathing meditation", "type": "meditation", "minutes": 2, "description": "Calm your racing mind with gentle breath awareness"}),
			json!({"key": "thought-diary", "title": "Interactive thought diary", "type": "journal", "minutes": 5, "description": "Clear your head by writing down what's bothering you"}),
			json!({"key": "mindful-study", "title": "Mindful studying technique", "type": "guide", "minutes": 5, "description": "Study with focus and less anxiety"}),
			json!({"key": "exam-anxiety", "title": "Managing exam anxiety", "type": "guide", "minutes": 7, "description": "Practical steps to handle exam stress"}),
			json!({"key": "placement-stress", "title": "Coping with placement pressure", "type": "guide", "minutes": 6, "description": "Navigate job search anxiety with confidence"}),
			json!({"key": "sleep-hygiene", "title": "Better sleep habits", "type": "guide", "minutes": 4, "description": "Step-by-step guide to quality rest"}),
			json!({"key": "time-management", "title": "Time management for students", "type": "guide", "minutes": 8, "description": "Organize your day to reduce overwhelm"}),
			json!({"key": "gratitude-practice", "title": "Daily gratitude exercise", "type": "exercise", "minutes": 3, "description": "Build positivity with simple appreciation"}),
			json!({"key": "hostel-loneliness", "title": "Dealing with hostel loneliness", "type": "guide", "minutes": 6, "description": "Connect with others and feel less isolated"}),
			json!({"key": "parental-pressure", "title": "Managing parental expectations", "type": "guide", "minutes": 5, "description": "Navigate family pressure with healthy boundaries"}),
		]
	})
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTool {
	pub session_id: SessionId,
	pub key: String,
}

/// GET /api/abhyas - the tool catalogue.
pub async fn list_tools(State(app): State<App>) -> ApiResult<Json<ApiResponse<Value>>> {
	let stored = app.store.list("abhyas_tools", ListOptions::default()).await?;
	let tools = if stored.is_empty() { default_tools().clone() } else { stored };
	Ok(Json(ApiResponse::new(json!({ "tools": tools }))))
}

/// POST /api/abhyas - record a tool completion and award first-time
/// progress points.
pub async fn complete_tool(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Json(body): Json<CompleteTool>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Value>>)> {
	let ticket = app.admission.admit(
		AdmissionRequest::new(identity, EndpointClass::ToolComplete)
			.session(&body.session_id),
	)?;

	let doc = json!({
		"sid": &body.session_id,
		"key": &body.key,
		"completedAt": Timestamp::now(),
	});
	let id = app.store.insert("abhyas_done", doc).await?;

	award_points(&app, &body.session_id, &body.key).await?;
	app.admission.commit(ticket);

	Ok((StatusCode::CREATED, Json(ApiResponse::new(json!({ "id": id })))))
}

/// Credit the session's progress document, once per distinct tool.
async fn award_points(app: &App, sid: &SessionId, key: &str) -> ShResult<()> {
	let filter: Filter = vec![("sid".into(), json!(sid))];
	let progress = app
		.store
		.find_one("progress", filter.clone())
		.await?
		.unwrap_or_else(|| json!({ "sid": sid, "totalPoints": 0, "completedTools": [] }));

	let mut completed = progress["completedTools"].as_array().cloned().unwrap_or_default();
	if completed.iter().any(|v| v.as_str() == Some(key)) {
		return Ok(());
	}
	completed.push(json!(key));

	let total = progress["totalPoints"].as_u64().unwrap_or(0) + POINTS_PER_TOOL;
	app.store
		.upsert(
			"progress",
			filter,
			json!({ "sid": sid, "totalPoints": total, "completedTools": completed }),
		)
		.await?;
	Ok(())
}

// vim: ts=4
