use std::env;

use sahayata::AppBuilder;

#[tokio::main]
async fn main() {
	let listen = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

	if let Err(err) = AppBuilder::new().listen(listen).run().await {
		eprintln!("FATAL: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
