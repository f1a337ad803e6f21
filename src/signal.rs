//! Console interrupt handling.

use crate::output;
use log::info;
use std::io;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[cfg(unix)]
type Interrupt = tokio::signal::unix::Signal;
#[cfg(windows)]
type Interrupt = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn listen() -> io::Result<Interrupt> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> io::Result<Interrupt> {
    tokio::signal::windows::ctrl_c()
}

/// Listen for Ctrl-C and cancel `token` when it arrives.
///
/// The listener is registered before this returns, so an interrupt that lands
/// while the pool is still starting is caught rather than killing the process.
/// Workers notice the cancelled token on their next loop iteration. Abort the
/// returned handle once the scan is over.
pub fn install_interrupt_handler(token: CancellationToken, quiet: bool) -> io::Result<JoinHandle<()>> {
    let mut interrupt = listen()?;

    Ok(tokio::spawn(async move {
        if interrupt.recv().await.is_some() {
            if !quiet {
                output::print_interrupt_notice();
            }
            info!("Interrupt received, waiting for in-flight lookups");
            token.cancel();
        }
    }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::Duration;

    #[tokio::test]
    async fn test_interrupt_before_first_poll_cancels_token() {
        let token = CancellationToken::new();
        let handle = install_interrupt_handler(token.clone(), true).unwrap();

        // Deliver SIGINT before the listener task has had a chance to run.
        let status = Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), token.cancelled())
            .await
            .expect("interrupt did not cancel the token");
        handle.await.unwrap();
    }
}
