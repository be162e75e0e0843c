//! Refetchable objects and the `Node` interface.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_graphql::dynamic::{
	Field, FieldFuture, FieldValue, InputValue, Interface, InterfaceField, TypeRef,
};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::{GqlError, internal_error};
use super::id::GlobalId;
use super::utils::{datastore, nullable, parent};
use crate::kvs::Datastore;

/// The name of the Relay node interface
pub const NODE: &str = "Node";

type FetchFn = Box<
	dyn Fn(
			Arc<Datastore>,
			String,
		) -> BoxFuture<'static, Result<Option<FieldValue<'static>>, GqlError>>
		+ Send
		+ Sync,
>;

/// Check the runtime shape of a fetched value
pub type IsTypeOf = fn(&FieldValue<'_>) -> bool;

struct NodeType {
	name: String,
	fetch: FetchFn,
	is_type_of: IsTypeOf,
}

/// The ordered set of types reachable through the root `node` field.
#[derive(Default)]
pub struct NodeRegistry {
	types: Vec<NodeType>,
}

impl NodeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a refetchable type.
	///
	/// `fetch` receives the local id decoded from a global id of type `name`
	/// and yields nothing when no such object exists. `is_type_of` is asked,
	/// in registration order, which type a fetched value belongs to.
	pub fn register<F, Fut>(mut self, name: &str, fetch: F, is_type_of: IsTypeOf) -> Self
	where
		F: Fn(Arc<Datastore>, String) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<FieldValue<'static>>, GqlError>> + Send + 'static,
	{
		self.types.push(NodeType {
			name: name.to_owned(),
			fetch: Box::new(move |ds: Arc<Datastore>, id: String| fetch(ds, id).boxed()),
			is_type_of,
		});
		self
	}

	/// The names of all registered types, in registration order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.types.iter().map(|t| t.name.as_str())
	}

	/// Find the concrete type of a value, first match wins
	pub fn resolve_type(&self, value: &FieldValue<'_>) -> Option<&str> {
		self.types.iter().find(|t| (t.is_type_of)(value)).map(|t| t.name.as_str())
	}

	/// Fetch the object behind a global id.
	///
	/// A malformed id, an id of an unregistered type and a missing object all
	/// resolve to nothing. A fetched value which no registered type claims is
	/// an internal error.
	pub async fn fetch(
		&self,
		ds: Arc<Datastore>,
		token: &str,
	) -> Result<Option<FieldValue<'static>>, GqlError> {
		let gid = match GlobalId::decode(token) {
			Ok(v) => v,
			Err(e) => {
				debug!("Resolving node to null: {e}");
				return Ok(None);
			}
		};
		let Some(ty) = self.types.iter().find(|t| t.name == gid.ty) else {
			debug!("Resolving node to null: {}", GqlError::UnknownType(gid.ty));
			return Ok(None);
		};
		let Some(value) = (ty.fetch)(ds, gid.id).await? else {
			return Ok(None);
		};
		match self.resolve_type(&value) {
			Some(name) => Ok(Some(value.with_type(name.to_owned()))),
			None => Err(internal_error(format!(
				"no node type claims a value fetched as {}",
				ty.name
			))),
		}
	}

	/// The `Node` interface implemented by every registered type
	pub fn interface(&self) -> Interface {
		Interface::new(NODE)
			.description("An object with an ID")
			.field(InterfaceField::new("id", TypeRef::named_nn(TypeRef::ID)))
	}

	/// The root `node(id: ID!)` field
	pub fn node_field(self: &Arc<Self>) -> Field {
		let registry = Arc::clone(self);
		Field::new("node", TypeRef::named(NODE), move |ctx| {
			let registry = registry.clone();
			FieldFuture::new(async move {
				let node: Result<Option<FieldValue<'_>>, GqlError> = async {
					let ds = datastore(&ctx)?;
					let id = ctx.args.try_get("id")?;
					registry.fetch(ds, id.string()?).await
				}
				.await;
				Ok(nullable(&ctx, node))
			})
		})
		.description("Fetches an object given its ID")
		.argument(
			InputValue::new("id", TypeRef::named_nn(TypeRef::ID))
				.description("The ID of an object"),
		)
	}
}

/// A discriminator matching values of the Rust type `T`
pub fn is_type_of<T: Any>(value: &FieldValue<'_>) -> bool {
	value.downcast_ref::<T>().is_some()
}

/// The global `id: ID!` field of a node type
pub fn global_id_field<T: Any + Send + Sync>(
	ty: &'static str,
	local_id: fn(&T) -> String,
) -> Field {
	Field::new("id", TypeRef::named_nn(TypeRef::ID), move |ctx| {
		FieldFuture::new(async move {
			let value = parent::<T>(&ctx)?;
			Ok(Some(FieldValue::value(GlobalId::new(ty, local_id(value)).encode())))
		})
	})
	.description("The ID of an object")
}
