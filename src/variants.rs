use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{ContextError, Result};

/// Column layout of a VCF data line
const CHROM_COLUMN: usize = 0;
const POS_COLUMN: usize = 1;
const REF_COLUMN: usize = 3;
const ALT_COLUMN: usize = 4;
const MIN_COLUMNS: usize = 5;

/// Largest accepted coordinate; reference offsets must stay seekable
pub const MAX_POSITION: u64 = i64::MAX as u64;

/// A single variant taken from the variant list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub contig: String,
    /// 1-based coordinate of the variant base
    pub position: u64,
    pub reference_allele: String,
    pub alt_allele: String,
}

impl Variant {
    pub fn new(
        contig: impl Into<String>,
        position: u64,
        reference_allele: impl Into<String>,
        alt_allele: impl Into<String>,
    ) -> Self {
        Self {
            contig: contig.into(),
            position,
            reference_allele: reference_allele.into(),
            alt_allele: alt_allele.into(),
        }
    }
}

impl fmt::Display for Variant {
    /// `chr1:100A>G`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}>{}",
            self.contig, self.position, self.reference_allele, self.alt_allele
        )
    }
}

/// Parsed variants alongside the untouched rows they came from
#[derive(Debug, Default)]
pub struct VariantSet {
    variants: Vec<Variant>,
    records: Vec<csv::StringRecord>,
}

impl VariantSet {
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

    /// Parse tab-delimited rows, skipping `#` header and comment lines
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut set = VariantSet::default();
        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map_or(0, |p| p.line());
                ContextError::malformed_variant(line, e.to_string())
            })?;
            let line = record.position().map_or(0, |p| p.line());
            let variant = parse_variant(&record, line)?;
            set.variants.push(variant);
            set.records.push(record);
        }

        Ok(set)
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Write every row with `contexts[slot]` appended as a final column
    pub fn write_with_context<W: Write, S: AsRef<str>>(
        &self,
        writer: W,
        contexts: &[S],
    ) -> Result<()> {
        if contexts.len() != self.records.len() {
            return Err(ContextError::config(format!(
                "{} context sequences for {} variant rows",
                contexts.len(),
                self.records.len()
            )));
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);

        for (record, context) in self.records.iter().zip(contexts) {
            let mut row = record.clone();
            row.push_field(context.as_ref());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        path: P,
        contexts: &[S],
    ) -> Result<()> {
        let file = File::create(path)?;
        self.write_with_context(BufWriter::new(file), contexts)
    }
}

fn parse_variant(record: &csv::StringRecord, line: u64) -> Result<Variant> {
    if record.len() < MIN_COLUMNS {
        return Err(ContextError::malformed_variant(
            line,
            format!(
                "expected at least {} columns, got {}",
                MIN_COLUMNS,
                record.len()
            ),
        ));
    }

    let contig = &record[CHROM_COLUMN];
    if contig.is_empty() {
        return Err(ContextError::malformed_variant(line, "empty contig name"));
    }

    let raw_position = &record[POS_COLUMN];
    let position: u64 = raw_position.parse().map_err(|_| {
        ContextError::malformed_variant(line, format!("invalid position '{}'", raw_position))
    })?;
    if position == 0 {
        return Err(ContextError::malformed_variant(
            line,
            "positions are 1-based; got 0",
        ));
    }
    if position > MAX_POSITION {
        return Err(ContextError::malformed_variant(
            line,
            format!("position {} exceeds {}", position, MAX_POSITION),
        ));
    }

    Ok(Variant::new(
        contig,
        position,
        &record[REF_COLUMN],
        &record[ALT_COLUMN],
    ))
}
