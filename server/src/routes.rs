//! Route table.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app::App;

pub fn init(app: App) -> Router {
	Router::new()
		.route("/api/health", get(api::health::health))
		.route("/api/session", post(api::session::create_session))
		.route(
			"/api/samvad",
			get(api::samvad::list_posts).post(api::samvad::post_message),
		)
		.route(
			"/api/journeys",
			get(api::journeys::list_journeys).post(api::journeys::journey_action),
		)
		.route(
			"/api/abhyas",
			get(api::abhyas::list_tools).post(api::abhyas::complete_tool),
		)
		.route(
			"/api/notes",
			get(api::notes::list_notes).post(api::notes::create_note),
		)
		.route("/api/professionals", get(api::professionals::search))
		.route("/api/auth", post(api::auth::authenticate))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(app)
}

// vim: ts=4
