use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the contig table, planning windows or reading context
#[derive(Error, Debug)]
pub enum ContextError {
    /// Invalid run parameters (missing inputs, non-positive length or worker count)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input file that should exist does not
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row in the .fai side-car that cannot describe a line-wrapped contig
    #[error("Malformed FASTA index at line {line}: {message}")]
    MalformedIndex { line: u64, message: String },

    /// Data row in the variant list that cannot be turned into a variant
    #[error("Malformed variant at line {line}: {message}")]
    MalformedVariant { line: u64, message: String },

    /// Variant names a contig absent from the index
    #[error("Variant #{slot} ({variant}) references unknown contig '{contig}'")]
    UnknownContig {
        slot: usize,
        variant: String,
        contig: String,
    },

    /// Seek or read against the reference failed for one variant
    #[error("Variant #{slot} ({variant}): failed to read {length} bytes at offset {offset}: {source}")]
    Read {
        slot: usize,
        variant: String,
        offset: u64,
        length: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] csv::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ContextError>;

impl ContextError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn malformed_index(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedIndex {
            line,
            message: message.into(),
        }
    }

    pub fn malformed_variant(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedVariant {
            line,
            message: message.into(),
        }
    }
}
