use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::err::Error;
use crate::kvs::api::{Change, Cond, Store};
use crate::kvs::Task;

pub struct Datastore {
	db: RwLock<BTreeMap<Ulid, Task>>,
}

impl Datastore {
	/// Open a new, empty database
	pub(crate) fn new() -> Datastore {
		Self::from_tasks(Vec::new())
	}
	/// Open a database holding the given tasks
	pub(crate) fn from_tasks(tasks: Vec<Task>) -> Datastore {
		Datastore {
			db: RwLock::new(tasks.into_iter().map(|t| (t.id, t)).collect()),
		}
	}
	/// Take a copy of every task currently stored
	pub(crate) async fn snapshot(&self) -> Vec<Task> {
		self.db.read().await.values().cloned().collect()
	}
	/// Swap the whole contents of the database
	pub(crate) async fn replace(&self, tasks: Vec<Task>) {
		*self.db.write().await = tasks.into_iter().map(|t| (t.id, t)).collect();
	}
}

#[async_trait]
impl Store for Datastore {
	#[instrument(level = "trace", target = "todo_relay::core::kvs::mem", skip_all)]
	async fn put(&self, task: Task) -> Result<(), Error> {
		self.db.write().await.insert(task.id, task);
		Ok(())
	}

	#[instrument(level = "trace", target = "todo_relay::core::kvs::mem", skip(self))]
	async fn get(&self, id: Ulid) -> Result<Option<Task>, Error> {
		Ok(self.db.read().await.get(&id).cloned())
	}

	#[instrument(level = "trace", target = "todo_relay::core::kvs::mem", skip_all)]
	async fn scan(&self, cond: Cond<'_>) -> Result<Vec<Task>, Error> {
		Ok(self.db.read().await.values().filter(|t| cond(t)).cloned().collect())
	}

	#[instrument(level = "trace", target = "todo_relay::core::kvs::mem", skip_all)]
	async fn update(&self, cond: Cond<'_>, change: Change<'_>) -> Result<Vec<Task>, Error> {
		// Hold the write lock for the whole change
		let mut db = self.db.write().await;
		let mut out = Vec::new();
		for task in db.values_mut().filter(|t| cond(t)) {
			change(task);
			out.push(task.clone());
		}
		Ok(out)
	}
}
