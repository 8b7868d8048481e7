use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::{FetchStrategy, Outcome, assemble, check_slots, read_error};
use crate::error::Result;
use crate::offset::ByteRange;
use crate::variants::Variant;

/// **SEEK STRATEGY** - one handle, one seek and one read per variant
///
/// Reads run strictly in slot order on the calling thread, since every
/// seek/read pair moves the same file cursor.
pub struct SeekStrategy;

impl FetchStrategy for SeekStrategy {
    fn name(&self) -> &'static str {
        "seek"
    }

    fn fetch(
        &self,
        reference: &Path,
        variants: &[Variant],
        planned: Vec<Result<ByteRange>>,
    ) -> Result<Vec<Outcome>> {
        check_slots(variants, &planned)?;
        // BufReader discards its buffer on seek, so each read stays positioned
        let mut reader = BufReader::new(File::open(reference)?);
        Ok(fetch_from(&mut reader, variants, planned))
    }
}

/// Sequential fetch over any seekable source
pub(crate) fn fetch_from<R: Read + Seek>(
    reader: &mut R,
    variants: &[Variant],
    planned: Vec<Result<ByteRange>>,
) -> Vec<Outcome> {
    let mut buffer = Vec::new();

    planned
        .into_iter()
        .enumerate()
        .map(|(slot, plan)| {
            let range = plan?;
            read_range(&mut *reader, &range, &mut buffer)
                .and_then(|()| assemble(&buffer, &range))
                .map_err(|source| read_error(slot, &variants[slot], &range, source))
        })
        .collect()
}

fn read_range<R: Read + Seek>(
    reader: &mut R,
    range: &ByteRange,
    buffer: &mut Vec<u8>,
) -> io::Result<()> {
    buffer.clear();
    if range.is_empty() {
        return Ok(());
    }

    reader.seek(SeekFrom::Start(range.start_byte))?;
    buffer.resize(range.byte_length as usize, 0);
    reader.read_exact(buffer)
}
