//! Core configuration
//!
//! All knobs come from `BINLIFT_*` environment variables with defaults
//! matching the original deployment. Built once at startup and passed in
//! explicitly.

use std::path::PathBuf;

/// Orchestrator and classifier tuning.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Cap on functions refined per job. Inference is slow, so only the
    /// top-ranked candidates are processed.
    pub max_functions: usize,
    /// Directory for uploaded binaries awaiting processing.
    pub temp_dir: PathBuf,
    /// Absolute minimum function size in bytes; anything smaller is noise.
    pub min_size_floor: u64,
    /// Minimum size for auto-named (`FUN_*`) functions, which need more
    /// substance to be worth refining.
    pub min_auto_size: u64,
    /// Skip all generated-stub-style names outright.
    pub skip_auto_named: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_functions: 10,
            temp_dir: std::env::temp_dir().join("binlift"),
            min_size_floor: 8,
            min_auto_size: 32,
            skip_auto_named: false,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_functions: env_parse("BINLIFT_MAX_FUNCTIONS", defaults.max_functions),
            temp_dir: std::env::var("BINLIFT_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            min_size_floor: env_parse("BINLIFT_MIN_SIZE_FLOOR", defaults.min_size_floor),
            min_auto_size: env_parse("BINLIFT_MIN_AUTO_SIZE", defaults.min_auto_size),
            skip_auto_named: env_parse("BINLIFT_SKIP_AUTO_NAMED", defaults.skip_auto_named),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
