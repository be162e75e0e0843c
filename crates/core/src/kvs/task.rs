use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A single entry in the task list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
	pub id: Ulid,
	pub title: String,
	pub note: String,
	pub complete: bool,
	/// Soft deletion marker, a deleted task is invisible to every read
	pub deleted: bool,
	pub created_by: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub remind_at: Option<DateTime<Utc>>,
	pub repeat_every: String,
	pub important: String,
}

impl Task {
	/// The storage-local identifier of this task
	pub fn local_id(&self) -> String {
		self.id.to_string()
	}
}

/// The completion filter applied when listing tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
	#[default]
	Any,
	Completed,
	Incomplete,
}

impl Status {
	/// Check whether a task passes this filter
	pub fn matches(&self, task: &Task) -> bool {
		match self {
			Status::Any => true,
			Status::Completed => task.complete,
			Status::Incomplete => !task.complete,
		}
	}
}

impl From<&str> for Status {
	/// Unrecognised filters select every task.
	fn from(value: &str) -> Self {
		match value {
			"completed" => Status::Completed,
			"incomplete" => Status::Incomplete,
			_ => Status::Any,
		}
	}
}

/// The full set of editable fields, as accepted by `updateTodo`.
#[derive(Clone, Debug, Default)]
pub struct TaskUpdate {
	pub title: String,
	pub note: String,
	pub important: String,
	/// An RFC 3339 timestamp, anything unparsable becomes one day from now
	pub remind_at: String,
	pub repeat_every: String,
}
