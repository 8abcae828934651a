//! DOCCHECK CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to
//! batch or daemon mode, and exit with the resulting status. The daemon
//! outcome is deliberately not mapped to a process exit; the daemon owns
//! its own lifecycle.

use doccheck::types::RunStatus;

mod cli;

fn main() {
    match cli::run(std::env::args_os()) {
        RunStatus::Exited(code) => std::process::exit(code),
        RunStatus::DaemonStarted => {}
    }
}
