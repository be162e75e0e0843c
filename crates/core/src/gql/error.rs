use thiserror::Error;

#[derive(Debug, Error)]
pub enum GqlError {
	#[error("Database error: {0}")]
	DbError(crate::err::Error),
	#[error("Malformed global id: {0}")]
	MalformedId(String),
	#[error("Unknown node type: {0}")]
	UnknownType(String),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Error generating schema: {0}")]
	SchemaError(String),
	#[error("Error resolving request: {0}")]
	ResolverError(String),
	#[error("Internal Error: {0}")]
	InternalError(String),
}

pub fn malformed_id(msg: impl Into<String>) -> GqlError {
	GqlError::MalformedId(msg.into())
}

pub fn invalid_argument(msg: impl Into<String>) -> GqlError {
	GqlError::InvalidArgument(msg.into())
}

pub fn schema_error(msg: impl Into<String>) -> GqlError {
	GqlError::SchemaError(msg.into())
}

pub fn resolver_error(msg: impl Into<String>) -> GqlError {
	GqlError::ResolverError(msg.into())
}

pub fn internal_error(msg: impl Into<String>) -> GqlError {
	let msg = msg.into();
	error!("{}", msg);
	GqlError::InternalError(msg)
}

impl From<crate::err::Error> for GqlError {
	fn from(value: crate::err::Error) -> Self {
		GqlError::DbError(value)
	}
}

impl From<async_graphql::Error> for GqlError {
	fn from(value: async_graphql::Error) -> Self {
		GqlError::ResolverError(value.message)
	}
}
