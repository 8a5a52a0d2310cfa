//! Concurrency management for Symbol Scout.
//! Configures the rayon pool used by directory scans.

use anyhow::Result;
use tracing::debug;

/// Number of workers when none is requested: half the cores, at least one.
pub fn default_workers() -> usize {
    std::cmp::max(1, num_cpus::get() / 2)
}

/// Initialize the global rayon thread pool with `jobs` workers, or the
/// default worker count when `jobs` is `None`.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let workers = jobs.filter(|&n| n > 0).unwrap_or_else(default_workers);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    debug!(
        workers,
        cores = num_cpus::get(),
        "initialized thread pool"
    );

    Ok(workers)
}
