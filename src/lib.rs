//! # todo-relay
//!
//! A Relay compliant GraphQL server for a single user's task list. The
//! schema and the task store live in `todo-relay-core`, this crate adds the
//! command line, logging and the HTTP transport.

#[macro_use]
extern crate tracing;

pub mod cli;
pub mod cnf;
pub mod err;
pub mod net;
pub mod telemetry;

pub use cli::init;
