pub(crate) mod config;
mod start;
mod version;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
pub use config::Config;
pub use start::StartCommandArguments;

use crate::cnf::LOGO;

const INFO: &str = "
To get started serving your task list, run:

  todo-relay start --path file:todos.json

The GraphQL endpoint is then available at http://127.0.0.1:8080/graphql
";

#[derive(Parser, Debug)]
#[command(name = "todo-relay command-line interface and server", bin_name = "todo-relay")]
#[command(about = INFO, before_help = LOGO)]
#[command(disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	#[command(about = "Start the GraphQL server")]
	Start(StartCommandArguments),
	#[command(about = "Output the command-line tool version information")]
	Version,
}

pub fn init() -> ExitCode {
	// Parse the command line arguments
	let args = Cli::parse();
	// Run the specified command
	let output = match args.command {
		Commands::Start(args) => start::init(args),
		Commands::Version => version::init(),
	};
	// Error and exit the programme
	if let Err(e) = output {
		error!("{}", e);
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}
