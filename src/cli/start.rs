use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use todo_relay_core::kvs::Datastore;

use super::config::Config;
use crate::cnf::LOGO;
use crate::err::Error;
use crate::net;

#[derive(Args, Debug)]
pub struct StartCommandArguments {
	#[arg(help = "The hostname or ip address to listen for connections on")]
	#[arg(env = "TODO_BIND", short = 'b', long = "bind")]
	#[arg(default_value = "127.0.0.1:8080")]
	pub(crate) listen_address: SocketAddr,

	#[arg(help = "Datastore path used for storing tasks, either memory or file:<path>")]
	#[arg(env = "TODO_PATH", long = "path", default_value = "memory")]
	pub(crate) path: String,

	#[arg(help = "The logging level for the server")]
	#[arg(env = "TODO_LOG", short = 'l', long = "log", default_value = "info")]
	pub(crate) log: String,

	#[arg(help = "The origins allowed to make cross-origin requests")]
	#[arg(env = "TODO_ALLOW_ORIGIN", long = "allow-origin", value_delimiter = ',')]
	#[arg(default_value = "*")]
	pub(crate) allow_origin: Vec<String>,

	#[arg(help = "A directory of static files to serve at the root path")]
	#[arg(env = "TODO_WEB_ROOT", long = "web-root")]
	pub(crate) web_root: Option<PathBuf>,

	#[arg(help = "Whether to hide the startup banner")]
	#[arg(env = "TODO_NO_BANNER", long)]
	pub(crate) no_banner: bool,
}

#[tokio::main]
pub async fn init(args: StartCommandArguments) -> Result<(), Error> {
	// Initialize logging
	crate::telemetry::builder().with_log_level(&args.log).init();
	// Check if a banner should be outputted
	if !args.no_banner {
		// Output the logo
		println!("{LOGO}");
	}
	// Setup the server options
	let config = Config::from(&args);
	// Start the kvs store
	let ds = Arc::new(Datastore::new(&config.path).await?);
	// Start the web server
	net::init(&config, ds).await?;
	// All ok
	Ok(())
}
