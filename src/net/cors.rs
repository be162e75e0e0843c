use http::header::{ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::err::Error;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// The CORS policy of the GraphQL endpoint.
///
/// Credentials are only allowed with an explicit list of origins, as
/// browsers reject credentialed responses to a wildcard origin.
pub(super) fn layer(origins: &[String]) -> Result<CorsLayer, Error> {
	let layer = CorsLayer::new()
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT_ENCODING, X_REQUESTED_WITH, AUTHORIZATION]);
	if origins.is_empty() || origins.iter().any(|o| o == "*") {
		return Ok(layer.allow_origin(AllowOrigin::any()));
	}
	let origins = origins
		.iter()
		.map(|o| HeaderValue::from_str(o).map_err(|_| Error::InvalidOrigin(o.clone())))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(layer.allow_origin(AllowOrigin::list(origins)).allow_credentials(true))
}
