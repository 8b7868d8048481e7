use clap::ValueEnum;
use memchr::memchr2_iter;
use std::io;
use std::path::Path;

use crate::PAD_BASE;
use crate::error::{ContextError, Result};
use crate::offset::ByteRange;
use crate::variants::Variant;

pub mod mmap;
pub mod seek;

pub use mmap::MmapStrategy;
pub use seek::SeekStrategy;

/// Context sequence for one variant, or the reason it could not be produced
pub type Outcome = Result<String>;

/// Common trait for all ways of reading planned ranges out of the reference
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve every planned range into a context sequence.
    ///
    /// `planned[slot]` belongs to `variants[slot]`; planning failures are passed
    /// through unchanged and the result keeps the same slot order. Only failing
    /// to open the reference is returned as an outer error.
    fn fetch(
        &self,
        reference: &Path,
        variants: &[Variant],
        planned: Vec<Result<ByteRange>>,
    ) -> Result<Vec<Outcome>>;
}

/// Available fetch strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FetchMode {
    /// One shared file handle, one seek and read per variant, in input order
    #[default]
    #[value(name = "seek")]
    Seek,
    /// Read-only memory map sliced in parallel; no shared file cursor
    #[value(name = "mmap")]
    Mmap,
}

impl FetchMode {
    pub fn name(&self) -> &'static str {
        self.strategy().name()
    }

    pub fn strategy(&self) -> &'static dyn FetchStrategy {
        match self {
            FetchMode::Seek => &SeekStrategy,
            FetchMode::Mmap => &MmapStrategy,
        }
    }

    pub fn all() -> Vec<FetchMode> {
        vec![FetchMode::Seek, FetchMode::Mmap]
    }
}

/// Build `N* + UPPER(raw without line breaks) + N*` for one range
pub(crate) fn assemble(raw: &[u8], range: &ByteRange) -> io::Result<String> {
    let left = range.left_pad as usize;
    let right = range.right_pad as usize;
    let mut context = Vec::with_capacity(left + raw.len() + right);
    context.resize(left, PAD_BASE);

    let mut line_start = 0;
    for line_break in memchr2_iter(b'\n', b'\r', raw) {
        context.extend(raw[line_start..line_break].iter().map(u8::to_ascii_uppercase));
        line_start = line_break + 1;
    }
    context.extend(raw[line_start..].iter().map(u8::to_ascii_uppercase));
    context.resize(context.len() + right, PAD_BASE);

    String::from_utf8(context).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Every planned range must belong to exactly one variant
pub(crate) fn check_slots(variants: &[Variant], planned: &[Result<ByteRange>]) -> Result<()> {
    if variants.len() != planned.len() {
        return Err(ContextError::config(format!(
            "{} planned ranges for {} variants",
            planned.len(),
            variants.len()
        )));
    }
    Ok(())
}

pub(crate) fn read_error(
    slot: usize,
    variant: &Variant,
    range: &ByteRange,
    source: io::Error,
) -> ContextError {
    ContextError::Read {
        slot,
        variant: variant.to_string(),
        offset: range.start_byte,
        length: range.byte_length,
        source,
    }
}
