mod cors;
mod gql;
mod health;
mod signals;
mod version;

use std::sync::Arc;

use axum::{Extension, Router};
use todo_relay_core::gql::generate_schema;
use todo_relay_core::kvs::Datastore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cli::Config;
use crate::err::Error;

const LOG: &str = "todo_relay::net";

#[derive(Clone)]
struct AppState {
	datastore: Arc<Datastore>,
}

/// Assemble the HTTP routes around a datastore
pub fn router(opt: &Config, ds: Arc<Datastore>) -> Result<Router, Error> {
	// Build the schema once, it is shared by every request
	let schema = generate_schema(ds.clone())?;
	// Only the GraphQL endpoint takes cross-origin requests
	let cors = cors::layer(&opt.allow_origin)?;
	let mut app = Router::new()
		.merge(gql::router(schema).layer(cors))
		.merge(health::router())
		.merge(version::router());
	// Serve any static files at the root
	if let Some(root) = &opt.web_root {
		app = app.fallback_service(ServeDir::new(root));
	}
	Ok(app
		.layer(Extension(AppState {
			datastore: ds,
		}))
		.layer(TraceLayer::new_for_http())
		.layer(CatchPanicLayer::new()))
}

pub async fn init(opt: &Config, ds: Arc<Datastore>) -> Result<(), Error> {
	// Setup the routes
	let app = router(opt, ds)?;
	info!(target: LOG, "Starting web server on {}", opt.bind);
	// Bind the listener
	let listener = tokio::net::TcpListener::bind(opt.bind).await?;
	info!(target: LOG, "Started web server on {}", opt.bind);
	info!(
		target: LOG,
		"GraphQL endpoint available at http://{}{}",
		opt.bind,
		crate::cnf::GRAPHQL_PATH
	);
	// Serve until a shutdown signal is received
	axum::serve(listener, app).with_graceful_shutdown(signals::shutdown()).await?;
	info!(target: LOG, "Web server stopped. Bye!");
	Ok(())
}
