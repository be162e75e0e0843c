use crate::err::Error;

/// Resolve once a shutdown signal has been received
pub async fn shutdown() {
	match listen().await {
		Ok(signal) => {
			info!(target: super::LOG, "{} received. Waiting for graceful shutdown...", signal);
		}
		Err(e) => {
			// Keep serving rather than stopping straight away
			error!(target: super::LOG, "Failed to listen to shutdown signal: {}", e);
			std::future::pending::<()>().await;
		}
	}
}

#[cfg(unix)]
pub async fn listen() -> Result<String, Error> {
	// Import the OS signals
	use tokio::signal::unix::{SignalKind, signal};
	// Get the operating system signal types
	let mut sighup = signal(SignalKind::hangup())?;
	let mut sigint = signal(SignalKind::interrupt())?;
	let mut sigquit = signal(SignalKind::quit())?;
	let mut sigterm = signal(SignalKind::terminate())?;
	// Listen and wait for the system signals
	tokio::select! {
		// Wait for a SIGHUP signal
		_ = sighup.recv() => {
			Ok(String::from("SIGHUP"))
		}
		// Wait for a SIGINT signal
		_ = sigint.recv() => {
			Ok(String::from("SIGINT"))
		}
		// Wait for a SIGQUIT signal
		_ = sigquit.recv() => {
			Ok(String::from("SIGQUIT"))
		}
		// Wait for a SIGTERM signal
		_ = sigterm.recv() => {
			Ok(String::from("SIGTERM"))
		}
	}
}

#[cfg(not(unix))]
pub async fn listen() -> Result<String, Error> {
	// Wait for a CTRL-C signal
	tokio::signal::ctrl_c().await?;
	Ok(String::from("CTRL-C"))
}
