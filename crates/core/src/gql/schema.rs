use std::sync::Arc;

use async_graphql::dynamic::{Object, Schema, Type};

use super::connection::{connection_types, page_info_type};
use super::error::{GqlError, schema_error};
use super::node::{NodeRegistry, is_type_of};
use super::todos::{fetch_todo, mutations, todo_type};
use super::viewer::{Viewer, fetch_user, user_type, viewer_field};
use crate::cnf::{GRAPHQL_COMPLEXITY_LIMIT, GRAPHQL_DEPTH_LIMIT, TODO_TYPE, USER_TYPE};
use crate::kvs::{Datastore, Task};

/// The name of the query root type
pub const QUERY: &str = "Root";

/// The name of the mutation root type
pub const MUTATION: &str = "Mutation";

/// Build the immutable schema served for every request.
///
/// The datastore is attached to the schema and shared by all resolvers.
pub fn generate_schema(datastore: Arc<Datastore>) -> Result<Schema, GqlError> {
	let registry = Arc::new(
		NodeRegistry::new()
			.register(TODO_TYPE, fetch_todo, is_type_of::<Task>)
			.register(USER_TYPE, fetch_user, is_type_of::<Viewer>),
	);

	let query = Object::new(QUERY).field(viewer_field()).field(registry.node_field());
	let mut mutation = Object::new(MUTATION);
	let mut types: Vec<Type> = vec![
		registry.interface().into(),
		todo_type().into(),
		user_type().into(),
		page_info_type().into(),
	];

	let (connection, edge) = connection_types::<Task>(TODO_TYPE);
	types.push(connection.into());
	types.push(edge.into());

	for (field, input, payload) in mutations() {
		mutation = mutation.field(field);
		types.push(input.into());
		types.push(payload.into());
	}

	trace!(types = ?registry.names().collect::<Vec<_>>(), "generating schema");

	let mut schema = Schema::build(QUERY, Some(MUTATION), None).register(query).register(mutation);
	for ty in types {
		schema = schema.register(ty);
	}

	schema
		.data(datastore)
		.limit_depth(*GRAPHQL_DEPTH_LIMIT)
		.limit_complexity(*GRAPHQL_COMPLEXITY_LIMIT)
		.finish()
		.map_err(|e| schema_error(e.to_string()))
}
