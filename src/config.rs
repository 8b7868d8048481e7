use std::path::PathBuf;

use crate::dispatch::DispatchConfig;
use crate::error::{ContextError, Result};
use crate::fetch::FetchMode;
use crate::index::default_index_path;
use crate::variants::MAX_POSITION;

/// Parameters for one extraction run
#[derive(Debug, Clone)]
pub struct Options {
    /// Variant list (VCF or any tab-delimited file with VCF's first five columns)
    pub vcf: PathBuf,
    /// Line-wrapped reference FASTA
    pub fasta: PathBuf,
    /// Side-car index; defaults to `<fasta>.fai`
    pub index: Option<PathBuf>,
    /// Bases on each side of the variant
    pub length: u64,
    pub output: PathBuf,
    /// Requested worker count, clamped to the machine's CPUs
    pub ncpu: usize,
    pub fetch: FetchMode,
    /// Report per-variant failures and continue instead of aborting
    pub keep_going: bool,
}

impl Options {
    pub fn index_path(&self) -> PathBuf {
        self.index
            .clone()
            .unwrap_or_else(|| default_index_path(&self.fasta))
    }

    /// Validate every parameter before any input is read
    pub fn check(&self) -> Result<()> {
        if self.vcf.as_os_str().is_empty() {
            return Err(ContextError::config("no input VCF"));
        }
        if !self.vcf.exists() {
            return Err(ContextError::FileNotFound {
                path: self.vcf.clone(),
            });
        }
        if self.fasta.as_os_str().is_empty() {
            return Err(ContextError::config("no reference FASTA"));
        }
        if !self.fasta.exists() {
            return Err(ContextError::FileNotFound {
                path: self.fasta.clone(),
            });
        }
        let index = self.index_path();
        if !index.exists() {
            return Err(ContextError::FileNotFound { path: index });
        }
        if self.length < 1 {
            return Err(ContextError::config(format!(
                "invalid context length {}; must be at least 1",
                self.length
            )));
        }
        if self.length > MAX_POSITION {
            return Err(ContextError::config(format!(
                "invalid context length {}; must be at most {}",
                self.length, MAX_POSITION
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ContextError::config("invalid output path"));
        }
        if self.ncpu < 1 {
            return Err(ContextError::config(format!(
                "invalid number of CPUs {}; must be at least 1",
                self.ncpu
            )));
        }
        Ok(())
    }

    /// Worker count actually used: the request, capped at available CPUs
    pub fn worker_threads(&self) -> usize {
        self.ncpu.min(num_cpus::get())
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            threads: self.worker_threads(),
            half_window: self.length,
            fetch: self.fetch,
        }
    }

    pub fn log_parameters(&self) {
        eprintln!("Parameters:");
        eprintln!("   Input VCF: {}", self.vcf.display());
        eprintln!("   Reference FASTA: {}", self.fasta.display());
        eprintln!("   FASTA index: {}", self.index_path().display());
        eprintln!("   Context length: {}", self.length);
        eprintln!("   Output: {}", self.output.display());
        if self.worker_threads() < self.ncpu {
            eprintln!(
                "   Workers: {} (requested {}, capped at available CPUs)",
                self.worker_threads(),
                self.ncpu
            );
        } else {
            eprintln!("   Workers: {}", self.ncpu);
        }
        eprintln!("   Fetch strategy: {}", self.fetch.name());
        if self.keep_going {
            eprintln!("   Keep going: failed variants are written as '.'");
        }
    }
}
