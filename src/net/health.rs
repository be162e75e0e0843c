use axum::routing::get;
use axum::{Extension, Router};
use http::StatusCode;
use todo_relay_core::kvs::Status;

use super::AppState;

pub(super) fn router<S>() -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	Router::new().route("/health", get(handler))
}

async fn handler(Extension(state): Extension<AppState>) -> StatusCode {
	// Attempt to read from the datastore
	match state.datastore.list_tasks(Status::Completed).await {
		Ok(_) => StatusCode::OK,
		Err(e) => {
			warn!(target: super::LOG, "Health check failed: {e}");
			StatusCode::INTERNAL_SERVER_ERROR
		}
	}
}
