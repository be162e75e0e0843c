use std::sync::{Arc, Mutex};

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Variables};
use async_trait::async_trait;
use serde_json::{Value, json};
use test_log::test;
use todo_relay_core::err::Error;
use todo_relay_core::gql::connection::offset_to_cursor;
use todo_relay_core::gql::generate_schema;
use todo_relay_core::gql::id::to_global_id;
use todo_relay_core::kvs::{Change, Cond, Datastore, Store, Task};
use ulid::Ulid;

const ADD: &str = r#"
mutation Add($input: AddTodoInput!) {
	addTodo(input: $input) {
		clientMutationId
		todoEdge { cursor node { id title complete important created_by } }
		viewer { id totalCount completedCount }
	}
}"#;

const TODOS: &str = r#"
query Todos($status: String, $first: Int, $after: String, $last: Int, $before: String) {
	viewer {
		todos(status: $status, first: $first, after: $after, last: $last, before: $before) {
			totalCount
			edges { cursor node { id title complete } }
			pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
		}
	}
}"#;

async fn schema() -> Schema {
	let ds = Datastore::new("memory").await.unwrap();
	generate_schema(Arc::new(ds)).unwrap()
}

/// Execute a document, returning the data and the error messages
async fn run(schema: &Schema, query: &str, vars: Value) -> (Value, Vec<String>) {
	let req = Request::new(query).variables(Variables::from_json(vars));
	let res = schema.execute(req).await;
	let errors = res.errors.iter().map(|e| e.message.clone()).collect();
	(res.data.into_json().unwrap(), errors)
}

async fn add(schema: &Schema, title: &str) -> String {
	let vars = json!({ "input": { "title": title, "important": "no" } });
	let (data, errors) = run(schema, ADD, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	data["addTodo"]["todoEdge"]["node"]["id"].as_str().unwrap().to_owned()
}

async fn todo_ids(schema: &Schema, status: &str) -> Vec<String> {
	let (data, errors) = run(schema, TODOS, json!({ "status": status })).await;
	assert!(errors.is_empty(), "{errors:?}");
	data["viewer"]["todos"]["edges"]
		.as_array()
		.unwrap()
		.iter()
		.map(|e| e["node"]["id"].as_str().unwrap().to_owned())
		.collect()
}

#[test(tokio::test)]
async fn task_lifecycle() {
	let schema = schema().await;
	// Add a task
	let vars = json!({
		"input": { "title": "Buy milk", "important": "yes", "clientMutationId": "abc" }
	});
	let (data, errors) = run(&schema, ADD, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	let payload = &data["addTodo"];
	assert_eq!(payload["clientMutationId"], "abc");
	assert_eq!(payload["todoEdge"]["cursor"], offset_to_cursor(0));
	assert_eq!(payload["todoEdge"]["node"]["title"], "Buy milk");
	assert_eq!(payload["todoEdge"]["node"]["important"], "yes");
	assert_eq!(payload["todoEdge"]["node"]["complete"], false);
	assert_eq!(payload["todoEdge"]["node"]["created_by"], "me");
	assert_eq!(payload["viewer"]["id"], to_global_id("User", "me"));
	assert_eq!(payload["viewer"]["totalCount"], 1);
	assert_eq!(payload["viewer"]["completedCount"], 0);
	let id = payload["todoEdge"]["node"]["id"].as_str().unwrap().to_owned();
	assert_eq!(todo_ids(&schema, "incomplete").await, vec![id.clone()]);
	assert!(todo_ids(&schema, "completed").await.is_empty());
	// Complete it
	let query = r#"
		mutation Change($input: ChangeTodoStatusInput!) {
			changeTodoStatus(input: $input) {
				clientMutationId
				todo { id complete }
				viewer { completedCount }
			}
		}"#;
	let vars = json!({ "input": { "id": id, "complete": true, "clientMutationId": "abc" } });
	let (data, errors) = run(&schema, query, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["changeTodoStatus"]["clientMutationId"], "abc");
	assert_eq!(data["changeTodoStatus"]["todo"]["complete"], true);
	assert_eq!(data["changeTodoStatus"]["viewer"]["completedCount"], 1);
	assert_eq!(todo_ids(&schema, "completed").await, vec![id.clone()]);
	assert!(todo_ids(&schema, "incomplete").await.is_empty());
	// Remove the completed tasks
	let query = r#"
		mutation Remove($input: RemoveCompletedTodosInput!) {
			removeCompletedTodos(input: $input) {
				clientMutationId
				deletedTodoIds
				viewer { totalCount }
			}
		}"#;
	let vars = json!({ "input": { "clientMutationId": "abc" } });
	let (data, errors) = run(&schema, query, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["removeCompletedTodos"]["clientMutationId"], "abc");
	assert_eq!(data["removeCompletedTodos"]["deletedTodoIds"], json!([id.clone()]));
	assert_eq!(data["removeCompletedTodos"]["viewer"]["totalCount"], 0);
	// It is gone for good
	for status in ["any", "completed", "incomplete"] {
		assert!(todo_ids(&schema, status).await.is_empty());
	}
	let query = "query($id: ID!) { node(id: $id) { id } }";
	let (data, errors) = run(&schema, query, json!({ "id": id })).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["node"], Value::Null);
}

#[test(tokio::test)]
async fn client_mutation_id_is_optional() {
	let schema = schema().await;
	let vars = json!({ "input": { "title": "Walk the dog", "important": "no" } });
	let (data, errors) = run(&schema, ADD, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["addTodo"]["clientMutationId"], Value::Null);
}

#[test(tokio::test)]
async fn node_refetches_every_type() {
	let schema = schema().await;
	let id = add(&schema, "Buy milk").await;
	let query = r#"
		query($todo: ID!, $user: ID!) {
			todo: node(id: $todo) { __typename id ... on Todo { title } }
			user: node(id: $user) { __typename id ... on User { totalCount } }
		}"#;
	let vars = json!({ "todo": id, "user": to_global_id("User", "me") });
	let (data, errors) = run(&schema, query, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["todo"]["__typename"], "Todo");
	assert_eq!(data["todo"]["id"], id);
	assert_eq!(data["todo"]["title"], "Buy milk");
	assert_eq!(data["user"]["__typename"], "User");
	assert_eq!(data["user"]["id"], to_global_id("User", "me"));
	assert_eq!(data["user"]["totalCount"], 1);
}

#[test(tokio::test)]
async fn unresolvable_node_ids_are_null() {
	let schema = schema().await;
	let query = "query($id: ID!) { node(id: $id) { id } }";
	for id in [
		"this is not base64".to_owned(),
		to_global_id("Cow", "1"),
		to_global_id("User", "someone-else"),
		to_global_id("Todo", "01ARZ3NDEKTSV4RRFFQ69G5FAV"),
		to_global_id("Todo", "not-a-ulid"),
	] {
		let (data, errors) = run(&schema, query, json!({ "id": id })).await;
		assert!(errors.is_empty(), "{id}: {errors:?}");
		assert_eq!(data["node"], Value::Null, "{id}");
	}
}

#[test(tokio::test)]
async fn todos_are_paginated() {
	let schema = schema().await;
	for i in 0..5 {
		add(&schema, &format!("task {i}")).await;
	}
	let (data, errors) = run(&schema, TODOS, json!({ "first": 2 })).await;
	assert!(errors.is_empty(), "{errors:?}");
	let todos = &data["viewer"]["todos"];
	assert_eq!(todos["totalCount"], 5);
	assert_eq!(todos["edges"].as_array().unwrap().len(), 2);
	assert_eq!(todos["pageInfo"]["hasNextPage"], true);
	assert_eq!(todos["pageInfo"]["hasPreviousPage"], false);
	// Most recently added first
	assert_eq!(todos["edges"][0]["node"]["title"], "task 4");
	// Continue after the last cursor
	let end = todos["pageInfo"]["endCursor"].as_str().unwrap().to_owned();
	let (data, errors) = run(&schema, TODOS, json!({ "first": 10, "after": end })).await;
	assert!(errors.is_empty(), "{errors:?}");
	let todos = &data["viewer"]["todos"];
	assert_eq!(todos["edges"].as_array().unwrap().len(), 3);
	assert_eq!(todos["edges"][0]["cursor"], offset_to_cursor(2));
	assert_eq!(todos["pageInfo"]["hasNextPage"], false);
	assert_eq!(todos["pageInfo"]["hasPreviousPage"], true);
	// And backwards from the end
	let (data, errors) = run(&schema, TODOS, json!({ "last": 1 })).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["viewer"]["todos"]["edges"][0]["node"]["title"], "task 0");
}

#[test(tokio::test)]
async fn negative_page_sizes_are_field_errors() {
	let schema = schema().await;
	add(&schema, "task").await;
	let query = r#"
		query($first: Int, $last: Int) {
			viewer { id todos(first: $first, last: $last) { totalCount } totalCount }
		}"#;
	for vars in [json!({ "first": -1 }), json!({ "last": -1 })] {
		let (data, errors) = run(&schema, query, vars).await;
		assert_eq!(errors.len(), 1, "{errors:?}");
		assert!(errors[0].contains("non-negative"), "{errors:?}");
		// Only the failing field is null
		assert_eq!(data["viewer"]["id"], to_global_id("User", "me"));
		assert_eq!(data["viewer"]["todos"], Value::Null);
		assert_eq!(data["viewer"]["totalCount"], 1);
	}
}

#[test(tokio::test)]
async fn unknown_status_lists_everything() {
	let schema = schema().await;
	add(&schema, "task").await;
	assert_eq!(todo_ids(&schema, "whatever").await.len(), 1);
}

#[test(tokio::test)]
async fn mutations_reject_foreign_ids() {
	let schema = schema().await;
	let query = r#"
		mutation Rename($input: RenameTodoInput!) {
			renameTodo(input: $input) { clientMutationId todo { title } }
		}"#;
	for id in ["garbage".to_owned(), to_global_id("User", "me")] {
		let vars = json!({ "input": { "id": id, "title": "x", "clientMutationId": "abc" } });
		let (data, errors) = run(&schema, query, vars).await;
		assert_eq!(errors.len(), 1, "{errors:?}");
		assert!(data.is_object(), "{data:?}");
		assert_eq!(data["renameTodo"], Value::Null);
	}
}

#[test(tokio::test)]
async fn failed_mutations_do_not_stop_later_ones() {
	let schema = schema().await;
	let query = r#"
		mutation {
			a: renameTodo(input: { id: "garbage", title: "x", clientMutationId: "abc" }) {
				clientMutationId
			}
			b: addTodo(input: { title: "later", important: "no", clientMutationId: "def" }) {
				clientMutationId
				viewer { totalCount }
			}
		}"#;
	let (data, errors) = run(&schema, query, json!({})).await;
	assert_eq!(errors.len(), 1, "{errors:?}");
	assert_eq!(data["a"], Value::Null);
	assert_eq!(data["b"]["clientMutationId"], "def");
	assert_eq!(data["b"]["viewer"]["totalCount"], 1);
	assert_eq!(todo_ids(&schema, "any").await.len(), 1);
}

/// Accepts new tasks but fails every listing and bulk write
#[derive(Default)]
struct Unlistable {
	tasks: Mutex<Vec<Task>>,
}

fn disk_on_fire() -> Error {
	Error::Io(std::io::Error::other("disk on fire"))
}

#[async_trait]
impl Store for Unlistable {
	async fn put(&self, task: Task) -> Result<(), Error> {
		self.tasks.lock().unwrap().push(task);
		Ok(())
	}

	async fn get(&self, id: Ulid) -> Result<Option<Task>, Error> {
		Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
	}

	async fn scan(&self, _: Cond<'_>) -> Result<Vec<Task>, Error> {
		Err(disk_on_fire())
	}

	async fn update(&self, _: Cond<'_>, _: Change<'_>) -> Result<Vec<Task>, Error> {
		Err(disk_on_fire())
	}
}

#[test(tokio::test)]
async fn storage_failures_stay_on_their_field() {
	let ds = Datastore::from_store(Box::new(Unlistable::default()));
	let schema = generate_schema(Arc::new(ds)).unwrap();
	let query = r#"
		mutation Add($input: AddTodoInput!) {
			addTodo(input: $input) {
				clientMutationId
				todoEdge { cursor }
				viewer { id totalCount }
			}
		}"#;
	let vars = json!({
		"input": { "title": "Buy milk", "important": "no", "clientMutationId": "abc" }
	});
	let (data, errors) = run(&schema, query, vars).await;
	// Both listings fail, the write itself went through
	assert_eq!(errors.len(), 2, "{errors:?}");
	assert!(errors.iter().all(|e| e.contains("disk on fire")), "{errors:?}");
	let payload = &data["addTodo"];
	assert_eq!(payload["clientMutationId"], "abc");
	assert_eq!(payload["todoEdge"], Value::Null);
	assert_eq!(payload["viewer"]["id"], to_global_id("User", "me"));
	assert_eq!(payload["viewer"]["totalCount"], Value::Null);
	// A failing write nulls only its own payload
	let query = r#"
		mutation {
			markAllTodos(input: { complete: true, clientMutationId: "abc" }) { clientMutationId }
		}"#;
	let (data, errors) = run(&schema, query, json!({})).await;
	assert_eq!(errors.len(), 1, "{errors:?}");
	assert!(errors[0].contains("disk on fire"), "{errors:?}");
	assert_eq!(data["markAllTodos"], Value::Null);
}

#[test(tokio::test)]
async fn rename_update_and_remove() {
	let schema = schema().await;
	let id = add(&schema, "draft").await;
	// Rename
	let query = r#"
		mutation Rename($input: RenameTodoInput!) {
			renameTodo(input: $input) { todo { id title } }
		}"#;
	let vars = json!({ "input": { "id": id, "title": "final" } });
	let (data, errors) = run(&schema, query, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["renameTodo"]["todo"]["title"], "final");
	// Update every field, with a reminder which cannot be parsed
	let query = r#"
		mutation Update($input: UpdateTodoInput!) {
			updateTodo(input: $input) {
				clientMutationId
				todo { title note important remind_at repeat_every }
			}
		}"#;
	let vars = json!({ "input": {
		"id": id,
		"title": "groceries",
		"note": "oat milk",
		"important": "yes",
		"remind_at": "tomorrow-ish",
		"repeat_every": "week",
		"clientMutationId": "abc",
	}});
	let (data, errors) = run(&schema, query, vars).await;
	assert!(errors.is_empty(), "{errors:?}");
	let todo = &data["updateTodo"]["todo"];
	assert_eq!(data["updateTodo"]["clientMutationId"], "abc");
	assert_eq!(todo["title"], "groceries");
	assert_eq!(todo["note"], "oat milk");
	assert_eq!(todo["important"], "yes");
	assert_eq!(todo["repeat_every"], "week");
	assert!(todo["remind_at"].is_string());
	// Remove
	let query = r#"
		mutation Remove($input: RemoveTodoInput!) {
			removeTodo(input: $input) { deletedTodoId viewer { totalCount } }
		}"#;
	let (data, errors) = run(&schema, query, json!({ "input": { "id": id } })).await;
	assert!(errors.is_empty(), "{errors:?}");
	assert_eq!(data["removeTodo"]["deletedTodoId"], id);
	assert_eq!(data["removeTodo"]["viewer"]["totalCount"], 0);
}

#[test(tokio::test)]
async fn mark_all_todos() {
	let schema = schema().await;
	let a = add(&schema, "a").await;
	let b = add(&schema, "b").await;
	let query = r#"
		mutation Mark($input: MarkAllTodosInput!) {
			markAllTodos(input: $input) { changedTodos { id complete } viewer { completedCount } }
		}"#;
	let (data, errors) = run(&schema, query, json!({ "input": { "complete": true } })).await;
	assert!(errors.is_empty(), "{errors:?}");
	let changed = data["markAllTodos"]["changedTodos"].as_array().unwrap();
	let mut ids: Vec<&str> = changed.iter().map(|t| t["id"].as_str().unwrap()).collect();
	ids.sort();
	let mut expected = vec![a.as_str(), b.as_str()];
	expected.sort();
	assert_eq!(ids, expected);
	assert!(changed.iter().all(|t| t["complete"] == true));
	assert_eq!(data["markAllTodos"]["viewer"]["completedCount"], 2);
}
