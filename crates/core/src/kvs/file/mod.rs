use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::err::Error;
use crate::kvs::api::{Change, Cond, Store};
use crate::kvs::{Task, mem};

/// The in-memory engine, mirrored to a JSON snapshot on disk.
pub struct Datastore {
	db: mem::Datastore,
	path: PathBuf,
	/// Serialises writes so snapshots land in the order the writes happened
	lock: Mutex<()>,
}

impl Datastore {
	/// Open the database stored at the given path, creating it if missing
	pub(crate) async fn new(path: impl AsRef<Path>) -> Result<Datastore, Error> {
		let path = path.as_ref().to_path_buf();
		let tasks: Vec<Task> = match tokio::fs::read(&path).await {
			Ok(bytes) => serde_json::from_slice(&bytes)?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
			Err(e) => return Err(e.into()),
		};
		debug!(
			target: "todo_relay::core::kvs::file",
			"Loaded {} tasks from {}",
			tasks.len(),
			path.display()
		);
		Ok(Datastore {
			db: mem::Datastore::from_tasks(tasks),
			path,
			lock: Mutex::new(()),
		})
	}
	/// Write the given contents of the database to disk
	async fn persist(&self, tasks: &[Task]) -> Result<(), Error> {
		let bytes = serde_json::to_vec(tasks)?;
		// Write to a sibling file, then swap it in
		let tmp = self.path.with_extension("tmp");
		tokio::fs::write(&tmp, bytes).await?;
		tokio::fs::rename(&tmp, &self.path).await?;
		Ok(())
	}
}

#[async_trait]
impl Store for Datastore {
	async fn put(&self, task: Task) -> Result<(), Error> {
		let _guard = self.lock.lock().await;
		let mut tasks = self.db.snapshot().await;
		match tasks.iter_mut().find(|t| t.id == task.id) {
			Some(v) => *v = task,
			None => tasks.push(task),
		}
		// Only become visible once the snapshot is on disk
		self.persist(&tasks).await?;
		self.db.replace(tasks).await;
		Ok(())
	}

	async fn get(&self, id: Ulid) -> Result<Option<Task>, Error> {
		self.db.get(id).await
	}

	async fn scan(&self, cond: Cond<'_>) -> Result<Vec<Task>, Error> {
		self.db.scan(cond).await
	}

	async fn update(&self, cond: Cond<'_>, change: Change<'_>) -> Result<Vec<Task>, Error> {
		let _guard = self.lock.lock().await;
		let mut tasks = self.db.snapshot().await;
		let mut out = Vec::new();
		for task in tasks.iter_mut().filter(|t| cond(t)) {
			change(task);
			out.push(task.clone());
		}
		if !out.is_empty() {
			self.persist(&tasks).await?;
			self.db.replace(tasks).await;
		}
		Ok(out)
	}
}
