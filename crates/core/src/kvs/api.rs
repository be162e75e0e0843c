//! This module defines the API for a task storage engine.

use async_trait::async_trait;
use ulid::Ulid;

use crate::err::Error;
use crate::kvs::Task;

/// A condition selecting a set of tasks.
pub type Cond<'a> = &'a (dyn Fn(&Task) -> bool + Send + Sync);

/// A change applied in place to a stored task.
pub type Change<'a> = &'a (dyn Fn(&mut Task) + Send + Sync);

/// The raw operations a storage engine must provide.
///
/// Engines know nothing about soft deletion or task ownership. Each call is
/// expected to be atomic as observed by the caller: a concurrent call sees
/// either none or all of the effects of an [`Store::update`].
#[async_trait]
pub trait Store: Send + Sync + 'static {
	/// Insert or replace a task.
	async fn put(&self, task: Task) -> Result<(), Error>;

	/// Fetch a single task by its id, whether deleted or not.
	async fn get(&self, id: Ulid) -> Result<Option<Task>, Error>;

	/// Fetch every task matching the condition, in no particular order.
	async fn scan(&self, cond: Cond<'_>) -> Result<Vec<Task>, Error>;

	/// Apply a change to every task matching the condition.
	///
	/// Returns the affected tasks as they are after the change.
	async fn update(&self, cond: Cond<'_>, change: Change<'_>) -> Result<Vec<Task>, Error>;
}
