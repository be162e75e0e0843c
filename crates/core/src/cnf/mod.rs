use std::sync::LazyLock;

/// The local id of the single, fixed caller of the API
pub const VIEWER_ID: &str = "me";

/// The exposed type name of a task
pub const TODO_TYPE: &str = "Todo";

/// The exposed type name of the viewer
pub const USER_TYPE: &str = "User";

/// The datastore path used when none is configured
pub const DEFAULT_PATH: &str = "memory";

/// The maximum nesting depth of a single GraphQL query (defaults to 32)
pub static GRAPHQL_DEPTH_LIMIT: LazyLock<usize> =
	lazy_env_parse!("TODO_GRAPHQL_DEPTH_LIMIT", usize, 32);

/// The maximum complexity of a single GraphQL query (defaults to 2048)
pub static GRAPHQL_COMPLEXITY_LIMIT: LazyLock<usize> =
	lazy_env_parse!("TODO_GRAPHQL_COMPLEXITY_LIMIT", usize, 2048);
