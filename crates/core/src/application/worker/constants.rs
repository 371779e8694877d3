// Worker constants (no magic values)
use std::time::Duration;

/// Upper bound the supervisor waits for the worker to finish the
/// in-flight request during shutdown.
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
