//! Shared types used across DOCCHECK.
//! Includes the `RunStatus` returned by the CLI dispatcher and the reserved
//! daemon signal code.

/// Reserved status code signalling "ran as a daemon". Callers must not map
/// this to a process exit call; the daemon owns the process lifecycle.
pub const DAEMON_SIGNAL: i32 = 100;

/// Outcome of one CLI invocation.
///
/// Batch runs terminate with `Exited` carrying the exit code contract
/// (0 = success, 1 = validation failed, -1 = fatal error). A daemon run
/// yields `DaemonStarted` once the blocking server loop returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Exited(i32),
    DaemonStarted,
}

impl RunStatus {
    /// Numeric form of the status. `DaemonStarted` maps to the reserved
    /// [`DAEMON_SIGNAL`] and must never be fed to `process::exit`.
    pub fn code(&self) -> i32 {
        match self {
            RunStatus::Exited(code) => *code,
            RunStatus::DaemonStarted => DAEMON_SIGNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exited_code_passthrough() {
        assert_eq!(RunStatus::Exited(0).code(), 0);
        assert_eq!(RunStatus::Exited(1).code(), 1);
        assert_eq!(RunStatus::Exited(-1).code(), -1);
    }

    #[test]
    fn daemon_maps_to_reserved_signal() {
        assert_eq!(RunStatus::DaemonStarted.code(), DAEMON_SIGNAL);
        assert_eq!(DAEMON_SIGNAL, 100);
    }
}
