//! Journeys - self-paced wellbeing programmes a session can follow.
//!
//! The catalogue combines built-in core journeys, visible to
//! everyone, with custom journeys a session created itself. A
//! session can advance its progress on any journey, and "deleting" a
//! core journey only hides it for that session.

use std::sync::OnceLock;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};
use sahayata_types::doc_store::{Filter, ListOptions};

use crate::api::ApiResult;
use crate::prelude::*;

fn core_journeys() -> &'static Vec<Value> {
	static CORE: OnceLock<Vec<Value>> = OnceLock::new();
	CORE.get_or_init(|| {
		vec![
			json!({
				"key": "mindfulness-starter",
				"title": "Mindfulness Starter (7 days)",
				"description": "Simple daily breathing and awareness practices",
				"steps": 7,
				"points": 140,
				"category": "mindfulness",
				"activities": [
					"Take 5 deep breaths mindfully",
					"Notice 3 things you can see around you",
					"Do a 3-minute body scan",
					"Practice grateful breathing for 5 minutes",
					"Listen mindfully to sounds for 5 minutes",
					"Take a mindful walk for 10 minutes",
					"Reflect on the week with 5 minutes of quiet",
				],
				"isCore": true,
			}),
			json!({
				"key": "stress-relief",
				"title": "Stress Relief (10 days)",
				"description": "Quick techniques to manage daily stress",
				"steps": 10,
				"points": 200,
				"category": "stress",
				"activities": [
					"Try the 4-7-8 breathing technique",
					"Write down your top 3 concerns",
					"Take a 10-minute walk outside",
					"Do 5 minutes of gentle stretching",
					"Listen to calming music for 15 minutes",
					"Practice progressive muscle relaxation",
					"Call or text a friend for support",
					"Organize one small area of your space",
					"Practice saying positive affirmations",
					"Celebrate one small win from today",
				],
				"isCore": true,
			}),
			json!({
				"key": "sleep-better",
				"title": "Better Sleep (14 days)",
				"description": "Build healthy sleep habits gradually",
				"steps": 14,
				"points": 280,
				"category": "sleep",
				"activities": [
					"Set a consistent bedtime",
					"Avoid screens 1 hour before bed",
					"Create a wind-down routine",
					"Keep your room cool and dark",
					"Avoid caffeine after 2 PM",
					"Do light stretching before bed",
					"Read for 15 minutes instead of scrolling",
					"Practice gratitude before sleep",
					"Take a warm shower or bath",
					"Try relaxation breathing in bed",
					"Write tomorrow's to-do list",
					"Reflect on your sleep quality",
					"Adjust your routine based on what works",
					"Plan to continue good sleep habits",
				],
				"isCore": true,
			}),
			json!({
				"key": "confidence-boost",
				"title": "Confidence Building (7 days)",
				"description": "Small daily actions to build self-confidence",
				"steps": 7,
				"points": 140,
				"category": "confidence",
				"activities": [
					"Write down 3 things you like about yourself",
					"Practice good posture throughout the day",
					"Give someone a genuine compliment",
					"Share your opinion in a conversation",
					"Learn something new for 20 minutes",
					"Do something slightly outside your comfort zone",
					"Reflect on your growth this week",
				],
				"isCore": true,
			}),
		]
	})
}

fn is_core_journey(key: &str) -> bool {
	core_journeys().iter().any(|j| j["key"].as_str() == Some(key))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
	pub session_id: Option<SessionId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyRequest {
	pub session_id: SessionId,
	#[serde(flatten)]
	pub action: JourneyAction,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JourneyAction {
	Create {
		title: Option<String>,
		#[serde(default)]
		description: String,
		#[serde(default)]
		activities: Vec<String>,
		#[serde(default = "default_category")]
		category: String,
	},
	Progress {
		journey_key: String,
	},
	Delete {
		journey_key: String,
	},
}

fn default_category() -> String {
	"custom".into()
}

/// GET /api/journeys - the catalogue: core journeys (minus the ones
/// this session hid) plus the session's custom journeys, with a
/// per-journey progress map.
pub async fn list_journeys(
	State(app): State<App>,
	Query(query): Query<ListQuery>,
) -> ApiResult<Json<ApiResponse<Value>>> {
	let mut journeys = core_journeys().clone();
	let mut progress = serde_json::Map::new();

	if let Some(sid) = query.session_id {
		let sid_filter: Filter = vec![("sid".into(), json!(&sid))];

		let hidden = app
			.store
			.list("hidden_journeys", ListOptions { filter: sid_filter.clone(), limit: None })
			.await?;
		let hidden_keys: Vec<&str> =
			hidden.iter().filter_map(|doc| doc["journeyKey"].as_str()).collect();
		journeys.retain(|j| j["key"].as_str().is_none_or(|key| !hidden_keys.contains(&key)));

		let custom = app
			.store
			.list("journeys", ListOptions { filter: sid_filter.clone(), limit: None })
			.await?;
		journeys.extend(custom);

		for doc in app
			.store
			.list("journey_progress", ListOptions { filter: sid_filter, limit: None })
			.await?
		{
			if let Some(key) = doc["journeyKey"].as_str() {
				progress.insert(key.to_string(), doc["currentStep"].clone());
			}
		}
	}

	Ok(Json(ApiResponse::new(json!({ "journeys": journeys, "progress": progress }))))
}

/// POST /api/journeys - create a custom journey, advance progress on
/// one, or delete/hide one.
pub async fn journey_action(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Json(body): Json<JourneyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Value>>)> {
	let sid = body.session_id;
	match body.action {
		JourneyAction::Create { title, description, activities, category } => {
			// The title is the admission-checked text; journey titles
			// have a tighter length policy than forum posts.
			let ticket = app.admission.admit(
				AdmissionRequest::new(identity, EndpointClass::JourneyCreate)
					.text(title.as_deref())
					.session(&sid),
			)?;

			let title = ticket.content.clone().unwrap_or_default();
			let journey = json!({
				"key": format!("custom-{}", uuid::Uuid::new_v4()),
				"title": title,
				"description": description,
				"steps": activities.len(),
				"points": activities.len() * 20,
				"category": category,
				"activities": activities,
				"sid": &sid,
				"isCustom": true,
				"createdAt": Timestamp::now(),
			});
			app.store.insert("journeys", journey.clone()).await?;
			app.admission.commit(ticket);

			Ok((StatusCode::CREATED, Json(ApiResponse::new(journey))))
		}
		JourneyAction::Progress { journey_key } => {
			// Progress ticks carry no text and are frequent;
			// they go through the default rate class only.
			app.admission
				.admit(AdmissionRequest::new(identity, EndpointClass::Default))?;

			let filter: Filter = vec![
				("sid".into(), json!(&sid)),
				("journeyKey".into(), json!(&journey_key)),
			];
			let current = app
				.store
				.find_one("journey_progress", filter.clone())
				.await?
				.and_then(|doc| doc["currentStep"].as_u64())
				.unwrap_or(0);
			let step = current + 1;
			app.store
				.upsert(
					"journey_progress",
					filter,
					json!({
						"sid": &sid,
						"journeyKey": &journey_key,
						"currentStep": step,
						"lastUpdated": Timestamp::now(),
					}),
				)
				.await?;

			Ok((
				StatusCode::OK,
				Json(ApiResponse::new(json!({ "journeyKey": &journey_key, "currentStep": step }))),
			))
		}
		JourneyAction::Delete { journey_key } => {
			app.admission
				.admit(AdmissionRequest::new(identity, EndpointClass::Default))?;

			// Custom journeys are removed outright; core journeys are
			// only hidden for this session. Progress goes either way.
			app.store
				.remove(
					"journeys",
					vec![("sid".into(), json!(&sid)), ("key".into(), json!(&journey_key))],
				)
				.await?;

			let is_core = is_core_journey(&journey_key);
			if is_core {
				app.store
					.upsert(
						"hidden_journeys",
						vec![
							("sid".into(), json!(&sid)),
							("journeyKey".into(), json!(&journey_key)),
						],
						json!({
							"sid": &sid,
							"journeyKey": &journey_key,
							"hiddenAt": Timestamp::now(),
						}),
					)
					.await?;
			}
			app.store
				.remove(
					"journey_progress",
					vec![("sid".into(), json!(&sid)), ("journeyKey".into(), json!(journey_key))],
				)
				.await?;

			Ok((StatusCode::OK, Json(ApiResponse::new(json!({ "isCore": is_core })))))
		}
	}
}

// vim: ts=4
