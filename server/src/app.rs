//! App state and builder - constructs and runs the Sahayata server

use std::net::SocketAddr;
use std::sync::Arc;

use sahayata_core::{AdmissionConfig, AdmissionService};
use sahayata_types::doc_store::DocStore;

use crate::auth_adapter::{AuthAdapter, MemoryAuthAdapter};
use crate::memory_store::MemoryDocStore;
use crate::prelude::*;
use crate::routes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub admission: Arc<AdmissionService>,
	pub store: Arc<dyn DocStore>,
	pub auth: Arc<dyn AuthAdapter>,
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	listen: Box<str>,
	admission_config: AdmissionConfig,
	store: Option<Arc<dyn DocStore>>,
	auth: Option<Arc<dyn AuthAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			listen: "127.0.0.1:8080".into(),
			admission_config: AdmissionConfig::default(),
			store: None,
			auth: None,
		}
	}

	pub fn listen(mut self, listen: impl Into<Box<str>>) -> Self {
		self.listen = listen.into();
		self
	}

	pub fn admission_config(mut self, config: AdmissionConfig) -> Self {
		self.admission_config = config;
		self
	}

	pub fn store(mut self, store: Arc<dyn DocStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn auth(mut self, auth: Arc<dyn AuthAdapter>) -> Self {
		self.auth = Some(auth);
		self
	}

	/// Build the app state. Fatal on malformed admission config.
	pub fn build(self) -> ShResult<App> {
		let admission = Arc::new(AdmissionService::new(self.admission_config)?);
		let store = self.store.unwrap_or_else(|| Arc::new(MemoryDocStore::new()));
		let auth = self.auth.unwrap_or_else(|| Arc::new(MemoryAuthAdapter::new()));
		Ok(Arc::new(AppState { admission, store, auth }))
	}

	/// Build and serve until ctrl-c, then stop the admission sweeper.
	pub async fn run(self) -> ShResult<()> {
		tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.init();

		info!("Sahayata server v{}", VERSION);

		let listen = self.listen.clone();
		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(listen.as_ref()).await?;
		info!("listening on {}", listen);

		axum::serve(
			listener,
			router.into_make_service_with_connect_info::<SocketAddr>(),
		)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

		app.admission.shutdown().await;
		info!("bye");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		error!("failed to listen for shutdown signal: {}", err);
	}
}

// vim: ts=4
