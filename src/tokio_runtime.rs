//! Tokio runtime for pactl calls and background switches
//!
//! The work is a handful of short-lived child processes, so two worker
//! threads are plenty.

use tokio::runtime::{Builder, Runtime};

const WORKER_THREADS: usize = 2;

/// Build the runtime the whole plugin runs on
pub fn build() -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .thread_name("switch-sound")
        .enable_all()
        .build()
}
