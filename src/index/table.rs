use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::layout::ContigLayout;
use crate::error::{ContextError, Result};

/// One row of a samtools-style `.fai` file
#[derive(Debug, Deserialize)]
struct FaiRow {
    name: String,
    length: u64,
    offset: u64,
    line_bases: u64,
    line_width: u64,
}

/// Read-only lookup from contig name to its layout, remembering index order
#[derive(Debug, Clone, Default)]
pub struct ContigTable {
    layouts: HashMap<String, ContigLayout>,
    order: Vec<String>,
}

impl ContigTable {
    /// Load the table from a `.fai` file on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ContextError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse tab-delimited index rows from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut table = ContigTable::default();
        let mut record = csv::StringRecord::new();

        loop {
            let more = reader.read_record(&mut record).map_err(|e| {
                let line = e.position().map_or(0, |p| p.line());
                ContextError::malformed_index(line, e.to_string())
            })?;
            if !more {
                break;
            }

            let line = record.position().map_or(0, |p| p.line());
            if record.len() < 5 {
                return Err(ContextError::malformed_index(
                    line,
                    format!("expected at least 5 fields, got {}", record.len()),
                ));
            }

            let row: FaiRow = record
                .deserialize(None)
                .map_err(|e| ContextError::malformed_index(line, e.to_string()))?;
            table.insert(row, line)?;
        }

        Ok(table)
    }

    fn insert(&mut self, row: FaiRow, line: u64) -> Result<()> {
        if row.line_bases == 0 {
            return Err(ContextError::malformed_index(
                line,
                format!("contig '{}' has zero bases per line", row.name),
            ));
        }
        if row.line_width <= row.line_bases {
            return Err(ContextError::malformed_index(
                line,
                format!(
                    "contig '{}' has {} bytes per line, which must exceed its {} bases per line",
                    row.name, row.line_width, row.line_bases
                ),
            ));
        }
        if row.length == 0 {
            return Err(ContextError::malformed_index(
                line,
                format!("contig '{}' is empty", row.name),
            ));
        }
        if self.layouts.contains_key(&row.name) {
            return Err(ContextError::malformed_index(
                line,
                format!("duplicate contig '{}'", row.name),
            ));
        }

        let layout = ContigLayout::new(
            row.name.clone(),
            row.length,
            row.offset,
            row.line_bases,
            row.line_width,
        );
        self.order.push(row.name.clone());
        self.layouts.insert(row.name, layout);
        Ok(())
    }

    pub fn get(&self, contig: &str) -> Option<&ContigLayout> {
        self.layouts.get(contig)
    }

    /// Contig names in index order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Layouts in index order
    pub fn iter(&self) -> impl Iterator<Item = &ContigLayout> {
        self.order.iter().filter_map(|name| self.layouts.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAI: &str = "chr1\t25\t6\t10\t11\nchr2\t16\t40\t16\t17\nchrM\t7\t65\t4\t6\n";

    #[test]
    fn test_parse_keeps_order_and_derives_end() {
        let table = ContigTable::from_reader(FAI.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.names(), &["chr1", "chr2", "chrM"]);

        let chr1 = table.get("chr1").unwrap();
        assert_eq!(chr1.total_bases, 25);
        assert_eq!(chr1.start_byte, 6);
        assert_eq!(chr1.end_byte, 6 + 2 * 11 + 5 - 1);

        // Single full line: remainder is zero
        let chr2 = table.get("chr2").unwrap();
        assert_eq!(chr2.end_byte, 40 + 17 - 1);

        let names: Vec<&str> = table.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["chr1", "chr2", "chrM"]);
    }

    #[test]
    fn test_fastq_index_column_is_accepted() {
        let table = ContigTable::from_reader("read1\t12\t7\t12\t13\t22\n".as_bytes()).unwrap();
        assert_eq!(table.get("read1").unwrap().end_byte, 7 + 13 - 1);

        let extra = ContigTable::from_reader("read2\t12\t7\t12\t13\t22\tx\n".as_bytes()).unwrap();
        assert_eq!(extra.get("read2").unwrap().total_bases, 12);
    }

    #[test]
    fn test_unknown_contig_is_absent() {
        let table = ContigTable::from_reader(FAI.as_bytes()).unwrap();
        assert!(table.get("chr3").is_none());
    }

    #[test]
    fn test_non_numeric_field_is_fatal() {
        let err = ContigTable::from_reader("chr1\t25\t6\t10\t11\nchr2\tlots\t40\t16\t17\n".as_bytes())
            .unwrap_err();
        match err {
            ContextError::MalformedIndex { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_fatal() {
        let err = ContigTable::from_reader("chr1\t25\t6\t10\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ContextError::MalformedIndex { line: 1, .. }));
    }

    #[test]
    fn test_line_invariant_is_enforced() {
        let zero_bases = ContigTable::from_reader("chr1\t25\t6\t0\t1\n".as_bytes());
        assert!(matches!(zero_bases, Err(ContextError::MalformedIndex { .. })));

        let no_terminator = ContigTable::from_reader("chr1\t25\t6\t10\t10\n".as_bytes());
        assert!(matches!(no_terminator, Err(ContextError::MalformedIndex { .. })));
    }

    #[test]
    fn test_duplicate_contig_is_fatal() {
        let err = ContigTable::from_reader("chr1\t25\t6\t10\t11\nchr1\t5\t40\t5\t6\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, ContextError::MalformedIndex { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = ContigTable::from_path("/nonexistent/ref.fa.fai").unwrap_err();
        assert!(matches!(err, ContextError::FileNotFound { .. }));
    }
}
