//! # todo-relay core
//!
//! This crate holds the Relay layer of the todo-relay server together with
//! the task storage it resolves against. The `todo-relay` binary is a thin
//! transport shell around the schema generated here.
//!
//! - [`gql`] builds the GraphQL schema: global ids, the node registry,
//!   cursor connections and the mutation envelope.
//! - [`kvs`] is the task store consumed by the resolvers.

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod cnf;
pub mod err;
pub mod gql;
pub mod kvs;
