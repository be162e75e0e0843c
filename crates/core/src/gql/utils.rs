use std::sync::Arc;

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{FieldValue, ResolverContext};

use super::error::{GqlError, internal_error};
use crate::kvs::Datastore;

pub(crate) trait GqlValueUtils {
	fn as_string(&self) -> Option<String>;
	fn as_bool(&self) -> Option<bool>;
}

impl GqlValueUtils for GqlValue {
	fn as_string(&self) -> Option<String> {
		if let GqlValue::String(s) = self {
			Some(s.to_owned())
		} else {
			None
		}
	}
	fn as_bool(&self) -> Option<bool> {
		if let GqlValue::Boolean(b) = self {
			Some(*b)
		} else {
			None
		}
	}
}

/// Fetch the datastore handle the schema was built with
pub(crate) fn datastore(ctx: &ResolverContext<'_>) -> Result<Arc<Datastore>, GqlError> {
	ctx.data::<Arc<Datastore>>()
		.cloned()
		.map_err(|_| internal_error("schema was built without a datastore"))
}

/// Fetch a value of a known type from the parent of a field
pub(crate) fn parent<'a, T: 'static>(ctx: &ResolverContext<'a>) -> Result<&'a T, GqlError> {
	ctx.parent_value.downcast_ref::<T>().ok_or_else(|| {
		internal_error(format!("failed to downcast parent to {}", std::any::type_name::<T>()))
	})
}

/// Settle a nullable field, keeping an error on the field which raised it.
///
/// The error is recorded with the field's position and path and the field
/// reads as null, so sibling fields and later mutations still resolve.
pub(crate) fn nullable<'a>(
	ctx: &ResolverContext<'_>,
	res: Result<Option<FieldValue<'a>>, GqlError>,
) -> Option<FieldValue<'a>> {
	match res {
		Ok(v) => v,
		Err(e) => {
			debug!("Resolving field to null: {e}");
			let err = async_graphql::Error::new(e.to_string());
			let err = err.into_server_error(ctx.ctx.item.pos);
			ctx.ctx.add_error(ctx.ctx.set_error_path(err));
			None
		}
	}
}
