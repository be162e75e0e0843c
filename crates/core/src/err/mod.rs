use std::io::Error as IoError;

use serde_json::Error as JsonError;
use thiserror::Error;

/// An error originating from the task datastore.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// The datastore path could not be understood
	#[error("Unable to open a datastore at '{0}'")]
	Unsupported(String),

	/// There was an error reading or writing the datastore file
	#[error("There was an error with the datastore file: {0}")]
	Io(#[from] IoError),

	/// The datastore snapshot could not be encoded or decoded
	#[error("There was an error serializing the datastore: {0}")]
	Serialization(#[from] JsonError),
}
