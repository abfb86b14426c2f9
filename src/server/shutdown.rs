// Shutdown module
// Gives in-flight connections a bounded window to finish after the listener closes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::logger;

/// How often the connection counter is polled while draining
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Wait until no connections are active or `grace` elapses.
///
/// The listener must already be closed so the counter can only go down.
/// Returns the number of connections still open when the wait ended.
pub async fn drain_connections(conn_counter: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = conn_counter.load(Ordering::SeqCst);
        if active == 0 {
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "{active} connection(s) still open after {}s, closing anyway",
                grace.as_secs()
            ));
            return active;
        }
        logger::log_debug(&format!("Waiting for {active} connection(s) to finish"));
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
