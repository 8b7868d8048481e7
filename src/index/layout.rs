/// Placement of one contig's bases inside a line-wrapped FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigLayout {
    /// Contig name as written in the index
    pub name: String,
    /// Number of bases in the contig
    pub total_bases: u64,
    /// Byte offset of the first base (just after the header line)
    pub start_byte: u64,
    /// Byte offset of the last byte belonging to the contig's sequence block
    pub end_byte: u64,
    /// Bases on each full line, excluding the terminator
    pub bases_per_line: u64,
    /// Bytes on each full line, including the terminator
    pub bytes_per_line: u64,
}

impl ContigLayout {
    /// Create a layout and derive its end byte.
    ///
    /// Callers must uphold `bytes_per_line > bases_per_line >= 1` and
    /// `total_bases >= 1`; the index parser rejects rows that do not.
    pub fn new(
        name: impl Into<String>,
        total_bases: u64,
        start_byte: u64,
        bases_per_line: u64,
        bytes_per_line: u64,
    ) -> Self {
        let full_lines = total_bases / bases_per_line;
        let remainder = total_bases % bases_per_line;
        let end_byte = start_byte + full_lines * bytes_per_line + remainder - 1;

        Self {
            name: name.into(),
            total_bases,
            start_byte,
            end_byte,
            bases_per_line,
            bytes_per_line,
        }
    }

    /// Byte offset of a 0-based base coordinate, skipping one terminator per wrapped line
    #[inline]
    pub fn base_to_byte(&self, base: u64) -> u64 {
        let line = base / self.bases_per_line;
        let column = base % self.bases_per_line;
        self.start_byte + line * self.bytes_per_line + column
    }
}
