//! Opaque, globally unique object identifiers.
//!
//! A global id is the standard base64 encoding of `Type:localId`. The type
//! name must not contain a `:`, the local id may contain anything.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{GqlError, malformed_id};

/// A decoded global id
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlobalId {
	/// The exposed GraphQL type name
	pub ty: String,
	/// The identifier within the storage for that type
	pub id: String,
}

impl GlobalId {
	pub fn new(ty: impl Into<String>, id: impl Into<String>) -> Self {
		let ty = ty.into();
		debug_assert!(!ty.is_empty() && !ty.contains(':'), "invalid node type name: {ty}");
		Self {
			ty,
			id: id.into(),
		}
	}

	/// Encode into the opaque form presented to clients
	pub fn encode(&self) -> String {
		STANDARD.encode(format!("{}:{}", self.ty, self.id))
	}

	/// Decode a token produced by [`GlobalId::encode`]
	pub fn decode(token: &str) -> Result<Self, GqlError> {
		let bytes = STANDARD.decode(token).map_err(|e| malformed_id(format!("{token}: {e}")))?;
		let text =
			String::from_utf8(bytes).map_err(|_| malformed_id(format!("{token}: not utf-8")))?;
		match text.split_once(':') {
			Some((ty, id)) if !ty.is_empty() => Ok(Self {
				ty: ty.to_owned(),
				id: id.to_owned(),
			}),
			_ => Err(malformed_id(format!("{token}: expected `Type:id`"))),
		}
	}
}

/// Encode a type name and local id pair
pub fn to_global_id(ty: &str, id: &str) -> String {
	GlobalId::new(ty, id).encode()
}

impl fmt::Display for GlobalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.encode())
	}
}

impl FromStr for GlobalId {
	type Err = GqlError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::decode(s)
	}
}
