mod logs;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

/// The crates whose events are shown at the configured level
const TARGETS: [&str; 3] = ["todo_relay", "todo_relay_core", "tower_http"];

#[derive(Default, Debug, Clone)]
pub struct Builder {
	log_level: Option<String>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(mut self, log_level: &str) -> Self {
		self.log_level = Some(log_level.to_owned());
		self
	}

	/// The filter to apply, a `RUST_LOG` directive takes precedence
	pub fn filter(&self) -> EnvFilter {
		if let Ok(v) = std::env::var("RUST_LOG") {
			if let Ok(filter) = EnvFilter::builder().parse(&v) {
				return filter;
			}
		}
		let level = self.log_level.as_deref().unwrap_or("info");
		filter_from_value(level).unwrap_or_else(|_| EnvFilter::new("error"))
	}

	/// Build a tracing dispatcher with the fmt subscriber (logs)
	pub fn build(self) -> Box<dyn Subscriber + Send + Sync + 'static> {
		let filter = self.filter();
		Box::new(tracing_subscriber::registry().with(logs::new(filter)))
	}

	/// Build a dispatcher and set it as global
	pub fn init(self) {
		self.build().init()
	}
}

/// Create an EnvFilter from the given value.
///
/// The plain levels apply to this server only and keep every other crate
/// at `error`. Anything else is parsed as a full filter directive.
pub fn filter_from_value(v: &str) -> Result<EnvFilter, ParseError> {
	match v {
		// Don't show any logs at all
		"none" => Ok(EnvFilter::new("off")),
		// Show all logs from every crate
		"full" => Ok(EnvFilter::new("trace")),
		// Show the logs of this server at the given level
		"error" | "warn" | "info" | "debug" | "trace" => {
			let directives =
				TARGETS.iter().map(|t| format!("{t}={v}")).collect::<Vec<_>>().join(",");
			EnvFilter::builder().parse(format!("error,{directives}"))
		}
		// Let's try to parse the custom log level
		_ => EnvFilter::builder().parse(v),
	}
}
