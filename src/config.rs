//! Runtime knobs for the integer kernel.

use std::env;
use std::str::FromStr;

use log::warn;

/// Environment variable overriding [`KernelConfig::num_threads`].
pub const ENV_NUM_THREADS: &str = "QMATMUL_NUM_THREADS";
/// Environment variable overriding [`KernelConfig::single_thread_ops`].
pub const ENV_SINGLE_THREAD_OPS: &str = "QMATMUL_SINGLE_THREAD_OPS";

/// Thread-count heuristics for the integer kernel.
///
/// Small problems run on the calling thread; the per-call pool is only
/// worth building once there is enough work to split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Upper bound on worker threads.
    pub num_threads: usize,
    /// Below this many ops (2·m·n·k) use one thread, below 3× this use two.
    pub single_thread_ops: u64,
    /// Every worker gets at least this many rows of A.
    pub min_rows_per_thread: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            num_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            single_thread_ops: 100_000_000,
            min_rows_per_thread: 64,
        }
    }
}

impl KernelConfig {
    /// Defaults, overridden by `QMATMUL_NUM_THREADS` and
    /// `QMATMUL_SINGLE_THREAD_OPS` when set. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = read_env::<usize>(ENV_NUM_THREADS) {
            config.num_threads = n.max(1);
        }
        if let Some(ops) = read_env::<u64>(ENV_SINGLE_THREAD_OPS) {
            config.single_thread_ops = ops;
        }
        config
    }

    /// Single-threaded configuration.
    pub fn serial() -> Self {
        Self {
            num_threads: 1,
            ..Self::default()
        }
    }

    /// How many threads to use for an m×k by k×n product.
    ///
    /// - < `single_thread_ops`: 1 thread
    /// - < 3 × `single_thread_ops`: 2 threads
    /// - Otherwise: up to `num_threads`
    ///
    /// Never more than one thread per `min_rows_per_thread` rows.
    pub fn choose_thread_count(&self, m: usize, n: usize, k: usize) -> usize {
        let ops = 2 * (m as u64) * (n as u64) * (k as u64);

        let optimal_threads = if ops < self.single_thread_ops {
            1
        } else if ops < self.single_thread_ops.saturating_mul(3) {
            2
        } else {
            self.num_threads
        };

        let threads_by_rows = (m / self.min_rows_per_thread.max(1)).max(1);

        optimal_threads
            .min(threads_by_rows)
            .min(self.num_threads)
            .max(1)
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
