//! The task store consumed by the GraphQL resolvers.
//!
//! Every read and write the Relay layer needs goes through [`Datastore`],
//! which enforces the soft-delete rule and the viewer ownership of tasks on
//! top of a raw [`Store`] backend. Tasks are never physically removed.
//!
//! These operations can be processed by the following storage engines:
//! - `memory`: in-memory store, lost when the process exits
//! - `file`: the in-memory store, persisted as a JSON snapshot after every
//!   write and reloaded when the datastore is opened

mod api;
mod ds;
mod file;
mod mem;
mod task;

pub use api::{Change, Cond, Store};
pub use ds::Datastore;
pub use task::{Status, Task, TaskUpdate};
