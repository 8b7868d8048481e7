//! Variant context sequence extraction from line-wrapped, `.fai`-indexed FASTA files.
//!
//! For each variant a window of `L` bases on either side is translated into a
//! byte range of the reference (accounting for line terminators), read with a
//! single positioned read, and padded with `N` where the window leaves the contig.

// Synthetic base used where a window leaves its contig
pub const PAD_BASE: u8 = b'N';
// Context column value for variants skipped with keep-going
pub const MISSING_CONTEXT: &str = ".";

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod index;
pub mod offset;
pub mod pipeline;
pub mod variants;

// Re-export main types for public API
pub use config::Options;
pub use dispatch::{DispatchConfig, Dispatcher};
pub use error::{ContextError, Result};
pub use fetch::{FetchMode, FetchStrategy, MmapStrategy, Outcome, SeekStrategy};
pub use index::{ContigLayout, ContigTable};
pub use offset::ByteRange;
pub use pipeline::{RunSummary, run};
pub use variants::{Variant, VariantSet};
