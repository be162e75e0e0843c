use std::net::SocketAddr;
use std::path::PathBuf;

use super::StartCommandArguments;

/// The settings the server is started with
#[derive(Clone, Debug)]
pub struct Config {
	pub bind: SocketAddr,
	pub path: String,
	/// The origins allowed to make cross-origin requests, `*` allows any
	pub allow_origin: Vec<String>,
	/// A directory of static files served at `/`
	pub web_root: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
			path: todo_relay_core::cnf::DEFAULT_PATH.to_owned(),
			allow_origin: vec!["*".to_owned()],
			web_root: None,
		}
	}
}

impl From<&StartCommandArguments> for Config {
	fn from(args: &StartCommandArguments) -> Self {
		Self {
			bind: args.listen_address,
			path: args.path.clone(),
			allow_origin: args.allow_origin.clone(),
			web_root: args.web_root.clone(),
		}
	}
}
