//! Environment configuration for the binaries.

/// Threads used when neither variable gives a usable count.
pub const DEFAULT_THREADS: usize = 8;

/// Pick a thread count from the `RAYON_NUM_THREADS` and `OMP_NUM_THREADS`
/// values. The first one that parses to a positive integer wins.
pub fn parse_thread_count(rayon: Option<String>, omp: Option<String>) -> usize {
    [rayon, omp]
        .into_iter()
        .flatten()
        .find_map(|s| s.trim().parse::<usize>().ok().filter(|&n| n > 0))
        .unwrap_or(DEFAULT_THREADS)
}

/// Thread count from `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8).
pub fn thread_count_from_env() -> usize {
    parse_thread_count(
        std::env::var("RAYON_NUM_THREADS").ok(),
        std::env::var("OMP_NUM_THREADS").ok(),
    )
}

/// Build the rayon global thread pool from the environment.
/// Tolerates an already-initialized pool. Returns the configured thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = thread_count_from_env();
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        log::warn!("Rayon pool already initialized: {}", e);
    }
    log::info!("Rayon threads: {}", num_threads);
    num_threads
}
