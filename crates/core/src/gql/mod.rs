//! Relay compliant GraphQL support for the task list.
//!
//! The schema is built once at startup by [`schema::generate_schema`] and is
//! immutable afterwards. It follows the Relay server specification:
//!
//! - **Global ids** ([`id`]) -- opaque identifiers encoding a type name and a storage-local id.
//! - **Nodes** ([`node`]) -- a registry of refetchable types backing the root `node(id)` field
//!   and the type resolution of the `Node` interface.
//! - **Connections** ([`connection`]) -- cursor based pagination over an ordered sequence.
//! - **Mutations** ([`mutation`]) -- the input object in, payload object out envelope that
//!   threads a `clientMutationId` back to the caller.
//! - **Types** ([`todos`], [`viewer`]) -- the `Todo` and `User` object types and the mutations
//!   operating on them.
//! - **Error handling** ([`error`]) -- domain error type ([`GqlError`]) with helper constructors.

pub mod connection;
pub mod error;
pub mod id;
pub mod mutation;
pub mod node;
pub mod schema;
mod todos;
mod utils;
mod viewer;

pub use error::GqlError;
pub use id::GlobalId;
pub use schema::generate_schema;
pub use viewer::Viewer;
