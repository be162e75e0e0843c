//! The Relay mutation envelope.
//!
//! Every mutation takes a single `input` argument of type `<Name>Input` and
//! resolves to a `<Name>Payload` object. Both carry a nullable
//! `clientMutationId` which is handed back to the caller exactly as it was
//! sent. The domain function runs to completion before any payload field
//! is resolved, so payload fields always observe the effect of the write.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{
	Field, FieldFuture, FieldValue, InputObject, InputValue, Object, ObjectAccessor, TypeRef,
};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::{GqlError, invalid_argument, malformed_id};
use super::id::GlobalId;
use super::utils::{GqlValueUtils, datastore, nullable, parent};
use crate::kvs::Datastore;

/// The name of the client supplied correlation token
pub const CLIENT_MUTATION_ID: &str = "clientMutationId";

type MutateFn<T> = Box<
	dyn Fn(Arc<Datastore>, MutationInput) -> BoxFuture<'static, Result<T, GqlError>>
		+ Send
		+ Sync,
>;

/// The value a mutation field resolves to
#[derive(Clone, Debug)]
pub struct Payload<T> {
	pub client_mutation_id: Option<String>,
	/// The value returned by the domain function
	pub result: T,
}

/// The fields of a mutation input object, without the `clientMutationId`
#[derive(Clone, Debug, Default)]
pub struct MutationInput {
	fields: BTreeMap<String, GqlValue>,
}

impl MutationInput {
	/// Split an input object into its correlation token and its domain fields
	pub fn split(input: &ObjectAccessor<'_>) -> (Option<String>, Self) {
		let mut fields: BTreeMap<String, GqlValue> =
			input.iter().map(|(k, v)| (k.to_string(), v.as_value().clone())).collect();
		let client_mutation_id = fields.remove(CLIENT_MUTATION_ID).and_then(|v| v.as_string());
		(client_mutation_id, Self {
			fields,
		})
	}

	fn get(&self, name: &str) -> Option<&GqlValue> {
		self.fields.get(name).filter(|v| !matches!(v, GqlValue::Null))
	}

	/// A required string field
	pub fn string(&self, name: &str) -> Result<String, GqlError> {
		self.get(name)
			.and_then(GqlValueUtils::as_string)
			.ok_or_else(|| invalid_argument(format!("expected a string for `{name}`")))
	}

	/// A required boolean field
	pub fn boolean(&self, name: &str) -> Result<bool, GqlError> {
		self.get(name)
			.and_then(GqlValueUtils::as_bool)
			.ok_or_else(|| invalid_argument(format!("expected a boolean for `{name}`")))
	}

	/// A required global id field of the given type, yielding the local id
	pub fn global_id(&self, name: &str, ty: &str) -> Result<String, GqlError> {
		let gid = GlobalId::decode(&self.string(name)?)?;
		if gid.ty != ty {
			return Err(malformed_id(format!("`{name}` must be a {ty} id, found a {} id", gid.ty)));
		}
		Ok(gid.id)
	}
}

/// Builder for a single Relay mutation.
pub struct Mutation<T> {
	name: String,
	description: Option<String>,
	inputs: Vec<InputValue>,
	outputs: Vec<Field>,
	mutate: Arc<MutateFn<T>>,
}

impl<T: Clone + Send + Sync + 'static> Mutation<T> {
	/// Start a mutation named `name`, the root field is its lower camel case form
	pub fn new<F, Fut>(name: &str, mutate: F) -> Self
	where
		F: Fn(Arc<Datastore>, MutationInput) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, GqlError>> + Send + 'static,
	{
		Self {
			name: name.to_owned(),
			description: None,
			inputs: Vec::new(),
			outputs: Vec::new(),
			mutate: Arc::new(Box::new(move |ds: Arc<Datastore>, input: MutationInput| {
				mutate(ds, input).boxed()
			})),
		}
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Declare a field of the input object
	pub fn input_field(mut self, field: InputValue) -> Self {
		self.inputs.push(field);
		self
	}

	/// Declare a field of the payload object, resolved from the mutation result
	pub fn output_field<F, Fut>(mut self, name: &str, ty: TypeRef, resolve: F) -> Self
	where
		F: Fn(Arc<Datastore>, T) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<FieldValue<'static>>, GqlError>> + Send + 'static,
	{
		let resolve = Arc::new(resolve);
		self.outputs.push(Field::new(name, ty, move |ctx| {
			let resolve = resolve.clone();
			FieldFuture::new(async move {
				let out: Result<Option<FieldValue<'_>>, GqlError> = async {
					let ds = datastore(&ctx)?;
					let payload = parent::<Payload<T>>(&ctx)?;
					resolve(ds, payload.result.clone()).await
				}
				.await;
				Ok(nullable(&ctx, out))
			})
		}));
		self
	}

	/// The root field, the input object and the payload object
	pub fn build(self) -> (Field, InputObject, Object) {
		let input_name = format!("{}Input", self.name);
		let payload_name = format!("{}Payload", self.name);
		// Assemble the input object
		let mut input = InputObject::new(&input_name)
			.field(InputValue::new(CLIENT_MUTATION_ID, TypeRef::named(TypeRef::STRING)));
		for field in self.inputs {
			input = input.field(field);
		}
		// Assemble the payload object
		let mut payload = Object::new(&payload_name).field(Field::new(
			CLIENT_MUTATION_ID,
			TypeRef::named(TypeRef::STRING),
			|ctx| {
				FieldFuture::new(async move {
					let payload = parent::<Payload<T>>(&ctx)?;
					Ok(payload.client_mutation_id.clone().map(FieldValue::value))
				})
			},
		));
		for field in self.outputs {
			payload = payload.field(field);
		}
		// Assemble the root field
		let mutate = self.mutate;
		let mut field =
			Field::new(lower_camel(&self.name), TypeRef::named(&payload_name), move |ctx| {
				let mutate = mutate.clone();
				FieldFuture::new(async move {
					// A failed write reads as a null payload, later mutations still run
					let out: Result<Option<FieldValue<'_>>, GqlError> = async {
						let ds = datastore(&ctx)?;
						let input = ctx.args.try_get("input")?;
						let (client_mutation_id, input) = MutationInput::split(&input.object()?);
						let result = mutate(ds, input).await?;
						Ok(Some(FieldValue::owned_any(Payload {
							client_mutation_id,
							result,
						})))
					}
					.await;
					Ok(nullable(&ctx, out))
				})
			})
			.argument(InputValue::new("input", TypeRef::named_nn(&input_name)));
		if let Some(description) = self.description {
			field = field.description(description);
		}
		(field, input, payload)
	}
}

fn lower_camel(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}
