use std::sync::Arc;

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, TypeRef};

use super::connection::{ConnectionArgs, connection_arguments, connection_from_sequence};
use super::error::{GqlError, resolver_error};
use super::node::{NODE, global_id_field};
use super::utils::{datastore, nullable};
use crate::cnf::{TODO_TYPE, USER_TYPE, VIEWER_ID};
use crate::kvs::{Datastore, Status};

/// The single, fixed caller of the API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
	pub id: String,
}

impl Default for Viewer {
	fn default() -> Self {
		Self {
			id: VIEWER_ID.to_owned(),
		}
	}
}

/// Fetch a user by local id, only the viewer exists
pub(crate) fn get_user(id: &str) -> Option<Viewer> {
	(id == VIEWER_ID).then(Viewer::default)
}

pub(crate) async fn fetch_user(
	_: Arc<Datastore>,
	id: String,
) -> Result<Option<FieldValue<'static>>, GqlError> {
	Ok(get_user(&id).map(FieldValue::owned_any))
}

/// Resolve a payload field to the viewer
pub(crate) async fn viewer_output<T>(
	_: Arc<Datastore>,
	_: T,
) -> Result<Option<FieldValue<'static>>, GqlError> {
	Ok(Some(FieldValue::owned_any(Viewer::default())))
}

fn count<'a>(len: usize) -> Result<FieldValue<'a>, GqlError> {
	let len = i64::try_from(len).map_err(|_| resolver_error("task count out of range"))?;
	Ok(FieldValue::value(GqlValue::from(len)))
}

fn count_field(name: &str, status: Status) -> Field {
	Field::new(name, TypeRef::named(TypeRef::INT), move |ctx| {
		FieldFuture::new(async move {
			let out: Result<Option<FieldValue<'_>>, GqlError> = async {
				let ds = datastore(&ctx)?;
				let tasks = ds.list_tasks(status).await?;
				Ok(Some(count(tasks.len())?))
			}
			.await;
			Ok(nullable(&ctx, out))
		})
	})
}

/// The `User` object type
pub(crate) fn user_type() -> Object {
	let todos = Field::new("todos", TypeRef::named(format!("{TODO_TYPE}Connection")), |ctx| {
		FieldFuture::new(async move {
			let out: Result<Option<FieldValue<'_>>, GqlError> = async {
				let ds = datastore(&ctx)?;
				let status = match ctx.args.get("status") {
					Some(v) if !v.is_null() => Status::from(v.string()?),
					_ => Status::Any,
				};
				let args = ConnectionArgs::from_args(&ctx.args)?;
				let tasks = ds.list_tasks(status).await?;
				let conn = connection_from_sequence(tasks, &args)?;
				Ok(Some(FieldValue::owned_any(conn)))
			}
			.await;
			Ok(nullable(&ctx, out))
		})
	})
	.argument(
		InputValue::new("status", TypeRef::named(TypeRef::STRING))
			.default_value(GqlValue::String("any".to_owned())),
	);
	Object::new(USER_TYPE)
		.implement(NODE)
		.field(global_id_field::<Viewer>(USER_TYPE, |v| v.id.clone()))
		.field(connection_arguments(todos))
		.field(count_field("totalCount", Status::Any))
		.field(count_field("completedCount", Status::Completed))
}

/// The root `viewer` field
pub(crate) fn viewer_field() -> Field {
	Field::new("viewer", TypeRef::named(USER_TYPE), |_| {
		FieldFuture::new(async move { Ok(Some(FieldValue::owned_any(Viewer::default()))) })
	})
}
