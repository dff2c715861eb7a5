//! GPU inventory via `nvidia-smi`.
//!
//! Every call shells out synchronously and has no timeout; a hung driver
//! blocks the calling thread. Handlers run these on tokio's blocking pool.

use std::process::Command;

use serde::Serialize;
use thiserror::Error;

/// Memory figures for one GPU, in MiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpuMemory {
    #[serde(rename = "total_memory_MB")]
    pub total_mb: u64,
    #[serde(rename = "free_memory_MB")]
    pub free_mb: u64,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Status {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("unexpected memory line {line}: '{text}'")]
    Malformed { line: usize, text: String },
}

/// Stateless GPU inventory queries. Neither call ever fails outward.
pub trait GpuProbe: Send + Sync {
    /// Number of GPUs, or 0 when the inventory tool is unavailable.
    fn gpu_count(&self) -> usize;

    /// Total/free memory per GPU, or `None` when the query fails.
    fn gpu_memory(&self) -> Option<Vec<GpuMemory>>;
}

/// `GpuProbe` backed by the NVIDIA system management CLI.
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    program: String,
}

impl NvidiaSmi {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, ProbeError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Status {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GpuProbe for NvidiaSmi {
    fn gpu_count(&self) -> usize {
        match self.run(&["--list-gpus"]) {
            Ok(stdout) => count_gpus(&stdout),
            Err(e) => {
                tracing::warn!(error = %e, "GPU listing failed, reporting no GPUs");
                0
            }
        }
    }

    fn gpu_memory(&self) -> Option<Vec<GpuMemory>> {
        let result = self
            .run(&[
                "--query-gpu=memory.total,memory.free",
                "--format=csv,nounits,noheader",
            ])
            .and_then(|stdout| parse_memory_csv(&stdout));

        match result {
            Ok(gpus) => Some(gpus),
            Err(e) => {
                tracing::error!(error = %e, "Error querying GPU memory");
                None
            }
        }
    }
}

/// One GPU per non-blank line of `--list-gpus` output.
pub fn count_gpus(stdout: &str) -> usize {
    stdout.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Parse `total, free` rows from a `csv,nounits,noheader` memory query.
pub fn parse_memory_csv(stdout: &str) -> Result<Vec<GpuMemory>, ProbeError> {
    let mut gpus = Vec::new();

    for (idx, raw) in stdout.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let malformed = || ProbeError::Malformed {
            line: idx + 1,
            text: line.to_string(),
        };

        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        let [total, free] = columns.as_slice() else {
            return Err(malformed());
        };

        gpus.push(GpuMemory {
            total_mb: total.parse().map_err(|_| malformed())?,
            free_mb: free.parse().map_err(|_| malformed())?,
        });
    }

    Ok(gpus)
}

/// Fixed answers for exercising handlers without a GPU.
#[cfg(test)]
pub struct StaticProbe {
    pub count: usize,
    pub memory: Option<Vec<GpuMemory>>,
}

#[cfg(test)]
impl GpuProbe for StaticProbe {
    fn gpu_count(&self) -> usize {
        self.count
    }

    fn gpu_memory(&self) -> Option<Vec<GpuMemory>> {
        self.memory.clone()
    }
}
