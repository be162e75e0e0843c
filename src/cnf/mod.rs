use std::sync::LazyLock;

pub const LOGO: &str = "
 +-----------------------------------------------+
 |  todo-relay                                   |
 |  A Relay compliant GraphQL task list server   |
 +-----------------------------------------------+
";

/// The publicly visible name of the server
pub const PKG_NAME: &str = "todo-relay";

/// The path the GraphQL endpoint is served on
pub const GRAPHQL_PATH: &str = "/graphql";

/// The version identifier of this build
pub static PKG_VERSION: LazyLock<String> =
	LazyLock::new(|| match option_env!("TODO_BUILD_METADATA") {
		Some(metadata) if !metadata.trim().is_empty() => {
			let version = env!("CARGO_PKG_VERSION");
			format!("{version}+{metadata}")
		}
		_ => env!("CARGO_PKG_VERSION").to_owned(),
	});
