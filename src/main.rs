use std::process::ExitCode;

fn main() -> ExitCode {
	// Initiate the command line
	todo_relay::init()
}
