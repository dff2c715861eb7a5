use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// ─── Defaults ────────────────────────────────────────────────────

const DEFAULT_BIND: &str = "0.0.0.0:5000";
const DEFAULT_LOG_FILE: &str = "app.log";
const DEFAULT_HASHCAT_OUT: &str = "hashcat.out";
const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 60;
const DEFAULT_NVIDIA_SMI: &str = "nvidia-smi";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address for the HTTP API
    pub bind_addr: String,
    /// Application log, written by our own subscriber and served on `/logs`
    pub log_file: PathBuf,
    /// Benchmark output, rewritten by an external hashcat run
    pub hashcat_out: PathBuf,
    /// Pause after each sampler iteration
    pub sample_interval: Duration,
    /// GPU inventory binary
    pub nvidia_smi: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.into(),
            log_file: DEFAULT_LOG_FILE.into(),
            hashcat_out: DEFAULT_HASHCAT_OUT.into(),
            sample_interval: Duration::from_secs(DEFAULT_SAMPLE_INTERVAL_SECS),
            nvidia_smi: DEFAULT_NVIDIA_SMI.into(),
        }
    }
}

impl Config {
    /// Defaults, overridden by any `GPU_HASH_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("GPU_HASH_BIND").unwrap_or(defaults.bind_addr),
            log_file: lookup("GPU_HASH_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            hashcat_out: lookup("GPU_HASH_HASHCAT_OUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.hashcat_out),
            sample_interval: Duration::from_secs(parse_or(
                &lookup,
                "GPU_HASH_SAMPLE_INTERVAL_SECS",
                DEFAULT_SAMPLE_INTERVAL_SECS,
            )),
            nvidia_smi: lookup("GPU_HASH_NVIDIA_SMI").unwrap_or(defaults.nvidia_smi),
        }
    }
}

// Logging is not up yet when this runs, so complaints go to stderr.
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            eprintln!("⚠️  Ignoring invalid {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}
