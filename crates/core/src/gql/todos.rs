use std::sync::Arc;

use async_graphql::dynamic::{
	Field, FieldFuture, FieldValue, InputObject, InputValue, Object, TypeRef,
};

use super::connection::{Edge, cursor_for_object_in_sequence};
use super::error::GqlError;
use super::id::to_global_id;
use super::mutation::{Mutation, MutationInput};
use super::node::{NODE, global_id_field};
use super::utils::parent;
use super::viewer::viewer_output;
use crate::cnf::{TODO_TYPE, USER_TYPE};
use crate::kvs::{Datastore, Status, Task, TaskUpdate};

type Result<T> = std::result::Result<T, GqlError>;

pub(crate) async fn fetch_todo(
	ds: Arc<Datastore>,
	id: String,
) -> Result<Option<FieldValue<'static>>> {
	Ok(ds.get_task(&id).await?.map(FieldValue::owned_any))
}

fn string_field(name: &str, get: fn(&Task) -> Option<String>) -> Field {
	Field::new(name, TypeRef::named(TypeRef::STRING), move |ctx| {
		FieldFuture::new(async move {
			let task = parent::<Task>(&ctx)?;
			Ok(get(task).map(FieldValue::value))
		})
	})
}

/// The `Todo` object type
pub(crate) fn todo_type() -> Object {
	Object::new(TODO_TYPE)
		.implement(NODE)
		.field(global_id_field::<Task>(TODO_TYPE, Task::local_id))
		.field(string_field("title", |t| Some(t.title.clone())))
		.field(string_field("note", |t| Some(t.note.clone())))
		.field(Field::new("complete", TypeRef::named(TypeRef::BOOLEAN), |ctx| {
			FieldFuture::new(async move {
				let task = parent::<Task>(&ctx)?;
				Ok(Some(FieldValue::value(task.complete)))
			})
		}))
		.field(string_field("created_by", |t| Some(t.created_by.clone())))
		.field(string_field("created_at", |t| Some(t.created_at.to_rfc3339())))
		.field(string_field("updated_at", |t| Some(t.updated_at.to_rfc3339())))
		.field(string_field("remind_at", |t| t.remind_at.map(|v| v.to_rfc3339())))
		.field(string_field("repeat_every", |t| Some(t.repeat_every.clone())))
		.field(string_field("important", |t| Some(t.important.clone())))
}

fn required(name: &str, ty: &str) -> InputValue {
	InputValue::new(name, TypeRef::named_nn(ty))
}

/// The edge of a task within the viewer's unfiltered task list
async fn todo_edge(ds: Arc<Datastore>, id: String) -> Result<Option<FieldValue<'static>>> {
	let tasks = ds.list_tasks(Status::Any).await?;
	let Some(cursor) = cursor_for_object_in_sequence(&tasks, |t| t.local_id() == id) else {
		return Ok(None);
	};
	let Some(node) = tasks.into_iter().find(|t| t.local_id() == id) else {
		return Ok(None);
	};
	Ok(Some(FieldValue::owned_any(Edge {
		node,
		cursor,
	})))
}

async fn changed_todos(
	ds: Arc<Datastore>,
	ids: Vec<String>,
) -> Result<Option<FieldValue<'static>>> {
	let mut out = Vec::with_capacity(ids.len());
	for id in ids {
		if let Some(task) = ds.get_task(&id).await? {
			out.push(FieldValue::owned_any(task));
		}
	}
	Ok(Some(FieldValue::list(out)))
}

/// Removed tasks are reported by global id, not by their storage-local id
async fn deleted_todo_ids(
	_: Arc<Datastore>,
	ids: Vec<String>,
) -> Result<Option<FieldValue<'static>>> {
	let ids = ids.iter().map(|id| FieldValue::value(to_global_id(TODO_TYPE, id)));
	Ok(Some(FieldValue::list(ids)))
}

async fn deleted_todo_id(_: Arc<Datastore>, id: String) -> Result<Option<FieldValue<'static>>> {
	Ok(Some(FieldValue::value(id)))
}

async fn add_todo(ds: Arc<Datastore>, input: MutationInput) -> Result<String> {
	let title = input.string("title")?;
	let important = input.string("important")?;
	Ok(ds.create_task(&title, &important, false).await?)
}

async fn change_todo_status(ds: Arc<Datastore>, input: MutationInput) -> Result<String> {
	let id = input.global_id("id", TODO_TYPE)?;
	ds.set_complete(&id, input.boolean("complete")?).await?;
	Ok(id)
}

async fn mark_all_todos(ds: Arc<Datastore>, input: MutationInput) -> Result<Vec<String>> {
	Ok(ds.mark_all_complete(input.boolean("complete")?).await?)
}

async fn remove_completed_todos(ds: Arc<Datastore>, _: MutationInput) -> Result<Vec<String>> {
	Ok(ds.soft_delete_all_completed().await?)
}

async fn remove_todo(ds: Arc<Datastore>, input: MutationInput) -> Result<String> {
	let token = input.string("id")?;
	let id = input.global_id("id", TODO_TYPE)?;
	ds.soft_delete(&id).await?;
	// Handed back exactly as sent
	Ok(token)
}

async fn rename_todo(ds: Arc<Datastore>, input: MutationInput) -> Result<String> {
	let id = input.global_id("id", TODO_TYPE)?;
	ds.rename(&id, &input.string("title")?).await?;
	Ok(id)
}

async fn update_todo(ds: Arc<Datastore>, input: MutationInput) -> Result<String> {
	let id = input.global_id("id", TODO_TYPE)?;
	let update = TaskUpdate {
		title: input.string("title")?,
		note: input.string("note")?,
		important: input.string("important")?,
		remind_at: input.string("remind_at")?,
		repeat_every: input.string("repeat_every")?,
	};
	ds.update_fields(&id, update).await?;
	Ok(id)
}

/// Every mutation operating on tasks
pub(crate) fn mutations() -> Vec<(Field, InputObject, Object)> {
	let todo = || TypeRef::named(TODO_TYPE);
	let viewer = || TypeRef::named(USER_TYPE);
	vec![
		Mutation::new("AddTodo", add_todo)
			.description("Add a new, incomplete task to the viewer's list")
			.input_field(required("title", TypeRef::STRING))
			.input_field(required("important", TypeRef::STRING))
			.output_field("todoEdge", TypeRef::named(format!("{TODO_TYPE}Edge")), todo_edge)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("ChangeTodoStatus", change_todo_status)
			.input_field(required("id", TypeRef::ID))
			.input_field(required("complete", TypeRef::BOOLEAN))
			.output_field("todo", todo(), fetch_todo)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("MarkAllTodos", mark_all_todos)
			.input_field(required("complete", TypeRef::BOOLEAN))
			.output_field("changedTodos", TypeRef::named_list(TODO_TYPE), changed_todos)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("RemoveCompletedTodos", remove_completed_todos)
			.output_field("deletedTodoIds", TypeRef::named_list(TypeRef::ID), deleted_todo_ids)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("RemoveTodo", remove_todo)
			.input_field(required("id", TypeRef::ID))
			.output_field("deletedTodoId", TypeRef::named(TypeRef::ID), deleted_todo_id)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("RenameTodo", rename_todo)
			.input_field(required("id", TypeRef::ID))
			.input_field(required("title", TypeRef::STRING))
			.output_field("todo", todo(), fetch_todo)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
		Mutation::new("UpdateTodo", update_todo)
			.description("Replace every editable field of a task")
			.input_field(required("id", TypeRef::ID))
			.input_field(required("title", TypeRef::STRING))
			.input_field(required("note", TypeRef::STRING))
			.input_field(required("important", TypeRef::STRING))
			.input_field(required("remind_at", TypeRef::STRING))
			.input_field(required("repeat_every", TypeRef::STRING))
			.output_field("todo", todo(), fetch_todo)
			.output_field("viewer", viewer(), viewer_output)
			.build(),
	]
}
