// Window-to-byte translation for line-wrapped FASTA sequence blocks

use crate::index::ContigLayout;
use crate::variants::Variant;

/// Bytes to read for one variant plus the synthetic padding around them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte to read
    pub start_byte: u64,
    /// Last byte to read (inclusive)
    pub end_byte: u64,
    /// Number of bytes to read; 0 when the window lies wholly past the contig
    pub byte_length: u64,
    /// `N` bases to place before the bytes read
    pub left_pad: u64,
    /// `N` bases to place after the bytes read
    pub right_pad: u64,
}

impl ByteRange {
    /// Translate the window around `variant` into a byte range of `layout`.
    ///
    /// The 0-based window is `[position - L - 1, position + L - 1]`, so `L`
    /// bases on either side of the variant base plus the base itself. Bases
    /// before the contig start or past its end become `N` padding and the byte
    /// range is clamped to the contig's sequence block.
    pub fn plan(variant: &Variant, layout: &ContigLayout, half_window: u64) -> Self {
        let zero_based = variant.position - 1;
        // Saturates so coordinates near u64::MAX clamp instead of wrapping
        let base_end = zero_based.saturating_add(half_window);

        // Left edge: negative window starts become padding
        let (base_start, left_pad) = if half_window > zero_based {
            (0, half_window - zero_based)
        } else {
            (zero_based - half_window, 0)
        };

        if base_start >= layout.total_bases {
            return Self {
                start_byte: layout.end_byte + 1,
                end_byte: layout.end_byte,
                byte_length: 0,
                left_pad: 0,
                right_pad: (base_end - base_start).saturating_add(1),
            };
        }

        let start_byte = if left_pad > 0 {
            layout.start_byte
        } else {
            layout.base_to_byte(base_start)
        };

        let (end_byte, right_pad) = if base_end >= layout.total_bases {
            (layout.end_byte, base_end - layout.total_bases + 1)
        } else {
            (layout.base_to_byte(base_end), 0)
        };

        Self {
            start_byte,
            end_byte,
            byte_length: end_byte - start_byte + 1,
            left_pad,
            right_pad,
        }
    }

    /// True when nothing needs to be read from the reference
    pub fn is_empty(&self) -> bool {
        self.byte_length == 0
    }
}
