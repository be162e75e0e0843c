use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use ulid::Ulid;

use crate::cnf::VIEWER_ID;
use crate::err::Error;
use crate::kvs::{Status, Store, Task, TaskUpdate, file, mem};

const TARGET: &str = "todo_relay::core::kvs";

/// The underlying datastore instance which stores the tasks.
pub struct Datastore {
	inner: Box<dyn Store>,
}

impl fmt::Debug for Datastore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Datastore").finish_non_exhaustive()
	}
}

/// Tasks that have not been soft deleted and belong to the viewer
fn live(task: &Task) -> bool {
	!task.deleted && task.created_by == VIEWER_ID
}

/// Most recently updated first
fn order(tasks: &mut [Task]) {
	tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
}

/// Parse an RFC 3339 reminder timestamp, falling back to one day from now
pub(crate) fn parse_remind_at(value: &str, now: DateTime<Utc>) -> DateTime<Utc> {
	match DateTime::parse_from_rfc3339(value) {
		Ok(v) => v.with_timezone(&Utc),
		Err(e) => {
			debug!(
				target: TARGET,
				"Unparsable reminder '{value}' ({e}), defaulting to one day from now"
			);
			now + TimeDelta::days(1)
		}
	}
}

impl Datastore {
	/// Setup the initial datastore from a path.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// # use todo_relay_core::kvs::Datastore;
	/// # use todo_relay_core::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("memory").await?;
	/// # Ok(())
	/// # }
	/// ```
	///
	/// Or to persist the tasks to a file:
	///
	/// ```rust,no_run
	/// # use todo_relay_core::kvs::Datastore;
	/// # use todo_relay_core::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("file://todos.json").await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn new(path: &str) -> Result<Datastore, Error> {
		// Initiate the desired datastore
		let inner: Box<dyn Store> = match path {
			"memory" => {
				info!(target: TARGET, "Starting kvs store in {}", path);
				Box::new(mem::Datastore::new())
			}
			// Parse and initiate a file backed database
			s if s.starts_with("file:") => {
				info!(target: TARGET, "Starting kvs store at {}", path);
				let s = s.trim_start_matches("file://");
				let s = s.trim_start_matches("file:");
				Box::new(file::Datastore::new(s).await?)
			}
			// The datastore path is not valid
			_ => {
				info!(target: TARGET, "Unable to load the specified datastore {}", path);
				return Err(Error::Unsupported(path.to_owned()));
			}
		};
		info!(target: TARGET, "Started kvs store at {}", path);
		Ok(Self::from_store(inner))
	}

	/// Wrap an already constructed storage engine
	pub fn from_store(inner: Box<dyn Store>) -> Datastore {
		Datastore {
			inner,
		}
	}

	/// Create a new task owned by the viewer, returning its local id
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn create_task(
		&self,
		title: &str,
		important: &str,
		complete: bool,
	) -> Result<String, Error> {
		let now = Utc::now();
		let task = Task {
			id: Ulid::new(),
			title: title.to_owned(),
			note: String::new(),
			complete,
			deleted: false,
			created_by: VIEWER_ID.to_owned(),
			created_at: now,
			updated_at: now,
			remind_at: None,
			repeat_every: String::new(),
			important: important.to_owned(),
		};
		let id = task.local_id();
		self.inner.put(task).await?;
		Ok(id)
	}

	/// Fetch a task, or nothing if it is missing or soft deleted
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn get_task(&self, id: &str) -> Result<Option<Task>, Error> {
		let Ok(id) = Ulid::from_str(id) else {
			return Ok(None);
		};
		Ok(self.inner.get(id).await?.filter(|t| !t.deleted))
	}

	/// List the viewer's tasks, most recently updated first
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn list_tasks(&self, status: Status) -> Result<Vec<Task>, Error> {
		let mut tasks = self.inner.scan(&|t: &Task| live(t) && status.matches(t)).await?;
		order(&mut tasks);
		Ok(tasks)
	}

	/// Mark a single task as complete or incomplete
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn set_complete(&self, id: &str, complete: bool) -> Result<(), Error> {
		self.update_one(id, &|t: &mut Task| t.complete = complete).await
	}

	/// Mark every task of the viewer, returning the affected local ids
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn mark_all_complete(&self, complete: bool) -> Result<Vec<String>, Error> {
		let tasks = self.inner.update(&live, &|t: &mut Task| t.complete = complete).await?;
		Ok(ids(tasks))
	}

	/// Soft delete a single task
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn soft_delete(&self, id: &str) -> Result<(), Error> {
		self.update_one(id, &|t: &mut Task| t.deleted = true).await
	}

	/// Soft delete every completed task, returning the affected local ids
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn soft_delete_all_completed(&self) -> Result<Vec<String>, Error> {
		let tasks = self
			.inner
			.update(&|t: &Task| live(t) && t.complete, &|t: &mut Task| t.deleted = true)
			.await?;
		Ok(ids(tasks))
	}

	/// Change the title of a task
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn rename(&self, id: &str, title: &str) -> Result<(), Error> {
		let now = Utc::now();
		self.update_one(id, &|t: &mut Task| {
			t.title = title.to_owned();
			t.updated_at = now;
		})
		.await
	}

	/// Replace every editable field of a task
	#[instrument(level = "trace", target = "todo_relay::core::kvs", skip(self))]
	pub async fn update_fields(&self, id: &str, update: TaskUpdate) -> Result<(), Error> {
		let now = Utc::now();
		let remind_at = parse_remind_at(&update.remind_at, now);
		self.update_one(id, &|t: &mut Task| {
			t.title.clone_from(&update.title);
			t.note.clone_from(&update.note);
			t.important.clone_from(&update.important);
			t.remind_at = Some(remind_at);
			t.repeat_every.clone_from(&update.repeat_every);
			t.updated_at = now;
		})
		.await
	}

	/// Apply a change to one live task, doing nothing if it does not exist
	async fn update_one(
		&self,
		id: &str,
		change: &(dyn Fn(&mut Task) + Send + Sync),
	) -> Result<(), Error> {
		let Ok(id) = Ulid::from_str(id) else {
			trace!(target: TARGET, "Ignoring write to invalid id {id}");
			return Ok(());
		};
		let out = self.inner.update(&|t: &Task| t.id == id && live(t), change).await?;
		if out.is_empty() {
			trace!(target: TARGET, "No live task with id {id}");
		}
		Ok(())
	}
}

/// The local ids of the tasks, in listing order
fn ids(mut tasks: Vec<Task>) -> Vec<String> {
	order(&mut tasks);
	tasks.iter().map(Task::local_id).collect()
}
