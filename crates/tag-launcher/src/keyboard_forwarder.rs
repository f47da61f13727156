//! Forwards console lines from stdin into the operator channel.

use std::io::BufRead;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};

/// Capacity of the console line channel.
pub(crate) const KEYBOARD_CHANNEL_CAPACITY: usize = 32;

/// Start the stdin forwarder on the blocking pool.
///
/// The task ends on end of input, on a read error, when the receiving side
/// is dropped or when shutdown is signalled. A pending `read_line` cannot be
/// interrupted, so callers should join with a timeout.
pub(crate) fn spawn(
    line_tx: mpsc::Sender<String>,
    shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        forward(stdin.lock(), &line_tx, &shutdown_rx);
    })
}

/// Copy lines from `input` into `line_tx` until one of the stop conditions holds.
pub(crate) fn forward<R: BufRead>(
    mut input: R,
    line_tx: &mpsc::Sender<String>,
    shutdown_rx: &watch::Receiver<bool>,
) {
    let mut line = String::new();
    loop {
        if *shutdown_rx.borrow() {
            debug!("Keyboard forwarder shutting down");
            break;
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                debug!("Console input reached end of file");
                break;
            }
            Ok(_) => {
                if line_tx.blocking_send(line.clone()).is_err() {
                    debug!("Operator channel closed, keyboard forwarder stopping");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to read console input");
                break;
            }
        }
    }
}
