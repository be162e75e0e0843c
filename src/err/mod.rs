use thiserror::Error;
use todo_relay_core::gql::GqlError;

#[derive(Error, Debug)]
pub enum Error {
	#[error("There was a problem with the datastore: {0}")]
	Db(#[from] todo_relay_core::err::Error),

	#[error("Couldn't generate the GraphQL schema: {0}")]
	Schema(#[from] GqlError),

	#[error("The allowed origin '{0}' is not a valid header value")]
	InvalidOrigin(String),

	#[error("Couldn't open the specified file: {0}")]
	Io(#[from] std::io::Error),
}
