//! Professional directory lookup.
//!
//! Read-only, but deliberately rate limited much tighter than other
//! reads: the directory contains contact details and is the obvious
//! target for scraping.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use sahayata_core::{AdmissionRequest, ClientId, EndpointClass};
use sahayata_types::doc_store::ListOptions;

use crate::api::ApiResult;
use crate::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
	pub specialty: Option<String>,
}

/// GET /api/professionals - search the directory.
pub async fn search(
	State(app): State<App>,
	ClientId(identity): ClientId,
	Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ApiResponse<Vec<serde_json::Value>>>> {
	let ticket = app
		.admission
		.admit(AdmissionRequest::new(identity, EndpointClass::ProfessionalSearch))?;

	let mut opts = ListOptions { limit: Some(50), ..Default::default() };
	if let Some(specialty) = query.specialty {
		opts.filter.push(("specialty".into(), json!(specialty)));
	}
	let professionals = app.store.list("professionals", opts).await?;
	app.admission.commit(ticket);

	Ok(Json(ApiResponse::new(professionals)))
}

// vim: ts=4
