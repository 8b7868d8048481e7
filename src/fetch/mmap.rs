use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io;
use std::path::Path;

use super::{FetchStrategy, Outcome, assemble, check_slots, read_error};
use crate::error::Result;
use crate::offset::ByteRange;
use crate::variants::Variant;

/// **MMAP STRATEGY** - positional slices of a read-only map, fetched in parallel
///
/// Every slice is addressed explicitly, so workers never share a cursor.
/// Runs on whichever rayon pool the caller installed.
pub struct MmapStrategy;

impl FetchStrategy for MmapStrategy {
    fn name(&self) -> &'static str {
        "mmap"
    }

    fn fetch(
        &self,
        reference: &Path,
        variants: &[Variant],
        planned: Vec<Result<ByteRange>>,
    ) -> Result<Vec<Outcome>> {
        check_slots(variants, &planned)?;
        let file = File::open(reference)?;
        // The reference must not be modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(fetch_from_slice(&mmap, variants, planned))
    }
}

/// Parallel fetch over bytes already in memory
pub(crate) fn fetch_from_slice(
    data: &[u8],
    variants: &[Variant],
    planned: Vec<Result<ByteRange>>,
) -> Vec<Outcome> {
    planned
        .into_par_iter()
        .enumerate()
        .map(|(slot, plan)| {
            let range = plan?;
            slice_range(data, &range)
                .and_then(|raw| assemble(raw, &range))
                .map_err(|source| read_error(slot, &variants[slot], &range, source))
        })
        .collect()
}

fn slice_range<'a>(data: &'a [u8], range: &ByteRange) -> io::Result<&'a [u8]> {
    if range.is_empty() {
        return Ok(&[]);
    }

    let start = range.start_byte as usize;
    let end = start + range.byte_length as usize;
    data.get(start..end).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("range ends past end of reference ({} bytes)", data.len()),
        )
    })
}
