use async_graphql::dynamic::Schema;
use async_graphql_axum::GraphQL;
use axum::Router;
use axum::routing::post_service;

use crate::cnf::GRAPHQL_PATH;

pub(super) fn router<S>(schema: Schema) -> Router<S>
where
	S: Clone + Send + Sync + 'static,
{
	// Queries may also be sent in the query string of a GET request
	let service = GraphQL::new(schema);
	Router::new().route(GRAPHQL_PATH, post_service(service.clone()).get_service(service))
}
