//! Cursor based pagination over an ordered, fully materialized sequence.
//!
//! A cursor encodes the index of an element in the sequence materialized
//! for the current request. Cursors are therefore only stable within one
//! request: the same logical element may receive a different cursor once
//! the underlying data changes.

use std::any::Any;

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{
	Field, FieldFuture, FieldValue, InputValue, Object, ObjectAccessor, TypeRef,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{GqlError, invalid_argument};
use super::utils::parent;

const PREFIX: &str = "arrayconnection:";

/// The name of the shared page information object type
pub const PAGE_INFO: &str = "PageInfo";

/// Create the cursor for the element at the given index
pub fn offset_to_cursor(offset: usize) -> String {
	STANDARD.encode(format!("{PREFIX}{offset}"))
}

/// Read the index back out of a cursor, if it is one
pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
	let bytes = STANDARD.decode(cursor).ok()?;
	let text = String::from_utf8(bytes).ok()?;
	text.strip_prefix(PREFIX)?.parse().ok()
}

/// Find the cursor of the first element matching the predicate
pub fn cursor_for_object_in_sequence<T>(items: &[T], pred: impl Fn(&T) -> bool) -> Option<String> {
	items.iter().position(pred).map(offset_to_cursor)
}

/// The Relay pagination arguments of a connection field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
	pub first: Option<i64>,
	pub after: Option<String>,
	pub last: Option<i64>,
	pub before: Option<String>,
}

impl ConnectionArgs {
	/// Read the pagination arguments of a field, missing and null alike are absent
	pub fn from_args(args: &ObjectAccessor<'_>) -> Result<Self, GqlError> {
		let int = |name: &str| -> Result<Option<i64>, GqlError> {
			match args.get(name) {
				Some(v) if !v.is_null() => Ok(Some(v.i64()?)),
				_ => Ok(None),
			}
		};
		let string = |name: &str| -> Result<Option<String>, GqlError> {
			match args.get(name) {
				Some(v) if !v.is_null() => Ok(Some(v.string()?.to_owned())),
				_ => Ok(None),
			}
		};
		Ok(Self {
			first: int("first")?,
			after: string("after")?,
			last: int("last")?,
			before: string("before")?,
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
	pub has_previous_page: bool,
	pub has_next_page: bool,
	pub start_cursor: Option<String>,
	pub end_cursor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge<T> {
	pub node: T,
	pub cursor: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection<T> {
	pub edges: Vec<Edge<T>>,
	pub page_info: PageInfo,
	/// The length of the whole sequence, ignoring pagination
	pub total_count: usize,
}

fn bound(name: &str, value: Option<i64>) -> Result<Option<usize>, GqlError> {
	match value {
		None => Ok(None),
		Some(v) => usize::try_from(v)
			.map(Some)
			.map_err(|_| invalid_argument(format!("`{name}` must be non-negative, found {v}"))),
	}
}

/// Slice a sequence into one page of edges.
///
/// `after` and `before` are exclusive bounds, a cursor which cannot be
/// decoded is ignored. `first` is applied before `last`. Negative `first`
/// or `last` values are rejected.
pub fn connection_from_sequence<T>(
	items: Vec<T>,
	args: &ConnectionArgs,
) -> Result<Connection<T>, GqlError> {
	let first = bound("first", args.first)?;
	let last = bound("last", args.last)?;
	let len = items.len();
	// Apply the cursor bounds
	let mut start = match args.after.as_deref().and_then(cursor_to_offset) {
		Some(after) => after.saturating_add(1).min(len),
		None => 0,
	};
	let mut end = match args.before.as_deref().and_then(cursor_to_offset) {
		Some(before) => before.min(len).max(start),
		None => len,
	};
	// Apply the page sizes
	if let Some(first) = first {
		end = end.min(start.saturating_add(first));
	}
	if let Some(last) = last {
		start = start.max(end.saturating_sub(last));
	}
	let edges: Vec<Edge<T>> = items
		.into_iter()
		.enumerate()
		.skip(start)
		.take(end - start)
		.map(|(i, node)| Edge {
			node,
			cursor: offset_to_cursor(i),
		})
		.collect();
	let page_info = PageInfo {
		has_previous_page: start > 0,
		has_next_page: end < len,
		start_cursor: edges.first().map(|e| e.cursor.clone()),
		end_cursor: edges.last().map(|e| e.cursor.clone()),
	};
	Ok(Connection {
		edges,
		page_info,
		total_count: len,
	})
}

/// Add the Relay pagination arguments to a connection field
pub fn connection_arguments(field: Field) -> Field {
	field
		.argument(InputValue::new("after", TypeRef::named(TypeRef::STRING)))
		.argument(InputValue::new("first", TypeRef::named(TypeRef::INT)))
		.argument(InputValue::new("before", TypeRef::named(TypeRef::STRING)))
		.argument(InputValue::new("last", TypeRef::named(TypeRef::INT)))
}

/// The `PageInfo` object type, shared by every connection
pub fn page_info_type() -> Object {
	fn flag(name: &str, get: fn(&PageInfo) -> bool) -> Field {
		Field::new(name, TypeRef::named_nn(TypeRef::BOOLEAN), move |ctx| {
			FieldFuture::new(async move {
				let info = parent::<PageInfo>(&ctx)?;
				Ok(Some(FieldValue::value(get(info))))
			})
		})
	}
	fn cursor(name: &str, get: fn(&PageInfo) -> &Option<String>) -> Field {
		Field::new(name, TypeRef::named(TypeRef::STRING), move |ctx| {
			FieldFuture::new(async move {
				let info = parent::<PageInfo>(&ctx)?;
				Ok(get(info).clone().map(FieldValue::value))
			})
		})
	}
	Object::new(PAGE_INFO)
		.description("Information about pagination in a connection.")
		.field(flag("hasNextPage", |p| p.has_next_page))
		.field(flag("hasPreviousPage", |p| p.has_previous_page))
		.field(cursor("startCursor", |p| &p.start_cursor))
		.field(cursor("endCursor", |p| &p.end_cursor))
}

/// Generate the `<name>Connection` and `<name>Edge` object types.
///
/// The field returning the connection must resolve to an owned
/// [`Connection<T>`], where `T` is the value the `name` object type
/// resolves its own fields from.
pub fn connection_types<T: Any + Send + Sync>(name: &str) -> (Object, Object) {
	let edge_name = format!("{name}Edge");
	let edge = Object::new(&edge_name)
		.description("An edge in a connection.")
		.field(Field::new("node", TypeRef::named(name), |ctx| {
			FieldFuture::new(async move {
				let edge = parent::<Edge<T>>(&ctx)?;
				Ok(Some(FieldValue::borrowed_any(&edge.node)))
			})
		}))
		.field(Field::new("cursor", TypeRef::named_nn(TypeRef::STRING), |ctx| {
			FieldFuture::new(async move {
				let edge = parent::<Edge<T>>(&ctx)?;
				Ok(Some(FieldValue::value(edge.cursor.clone())))
			})
		}));
	let connection = Object::new(format!("{name}Connection"))
		.description("A connection to a list of items.")
		.field(Field::new("edges", TypeRef::named_list(&edge_name), |ctx| {
			FieldFuture::new(async move {
				let conn = parent::<Connection<T>>(&ctx)?;
				let edges = conn.edges.iter().map(|e| FieldValue::borrowed_any(e));
				Ok(Some(FieldValue::list(edges)))
			})
		}))
		.field(Field::new("pageInfo", TypeRef::named_nn(PAGE_INFO), |ctx| {
			FieldFuture::new(async move {
				let conn = parent::<Connection<T>>(&ctx)?;
				Ok(Some(FieldValue::borrowed_any(&conn.page_info)))
			})
		}))
		.field(Field::new("totalCount", TypeRef::named_nn(TypeRef::INT), |ctx| {
			FieldFuture::new(async move {
				let conn = parent::<Connection<T>>(&ctx)?;
				// Non-null, so it must not fail
				let count = i64::try_from(conn.total_count).unwrap_or(i64::MAX);
				Ok(Some(FieldValue::value(GqlValue::from(count))))
			})
		}));
	(connection, edge)
}
