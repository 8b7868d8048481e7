use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ctxseq::index::default_index_path;
use ctxseq::{ContigTable, FetchMode, Options};

#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Input file in VCF format
    #[arg(short = 'v', long = "vcf", value_name = "PATH")]
    pub vcf: PathBuf,

    /// Reference genome in FASTA format (must have a .fai index)
    #[arg(short = 'f', long = "fasta", value_name = "PATH")]
    pub fasta: PathBuf,

    /// FASTA index to use instead of <fasta>.fai
    #[arg(long = "fai", value_name = "PATH")]
    pub fai: Option<PathBuf>,

    /// Bases of context on each side of the variant
    #[arg(short = 'l', long = "length", default_value_t = 1)]
    pub length: u64,

    /// Output path
    #[arg(
        short = 'o',
        long = "output",
        visible_alias = "out",
        default_value = "output.vcf"
    )]
    pub output: PathBuf,

    /// Number of CPUs (capped at the CPUs available)
    #[arg(short = 'n', long = "ncpu", default_value_t = 1)]
    pub ncpu: usize,

    /// How context bytes are read from the reference
    #[arg(long = "fetch", value_enum, default_value = "seek")]
    pub fetch: FetchMode,

    /// Write '.' for variants that fail and continue, instead of aborting
    #[arg(long = "keep-going")]
    pub keep_going: bool,
}

impl From<ExtractArgs> for Options {
    fn from(args: ExtractArgs) -> Self {
        Options {
            vcf: args.vcf,
            fasta: args.fasta,
            index: args.fai,
            length: args.length,
            output: args.output,
            ncpu: args.ncpu,
            fetch: args.fetch,
            keep_going: args.keep_going,
        }
    }
}

#[derive(Debug, Parser)]
pub struct IndexInfoArgs {
    /// Reference genome in FASTA format
    #[arg(short = 'f', long = "fasta", value_name = "PATH")]
    pub fasta: PathBuf,

    /// FASTA index to use instead of <fasta>.fai
    #[arg(long = "fai", value_name = "PATH")]
    pub fai: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Append the context sequence of every variant as a new column
    Extract(ExtractArgs),

    /// Show the contig layout table, including derived end offsets
    IndexInfo(IndexInfoArgs),
}

#[derive(Debug, Parser)]
#[command(name = "ctxseq", author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Extract(args) => cmd_extract(args),
        Commands::IndexInfo(args) => cmd_index_info(args),
    }
}

/// `ctxseq extract -v <in.vcf> -f <ref.fa> [options]`
fn cmd_extract(args: ExtractArgs) -> Result<()> {
    eprintln!("Initializing");
    let options = Options::from(args);
    let summary = ctxseq::run(&options).context("context extraction failed")?;

    if summary.failed > 0 {
        eprintln!(
            "Finished with {} of {} variants missing context",
            summary.failed, summary.variants
        );
    }
    Ok(())
}

/// `ctxseq index-info -f <ref.fa>`
/// Prints one tab-delimited row per contig on stdout
fn cmd_index_info(args: IndexInfoArgs) -> Result<()> {
    let index_path = args
        .fai
        .unwrap_or_else(|| default_index_path(&args.fasta));

    eprintln!("Index Information");
    eprintln!("   FASTA: {}", args.fasta.display());
    eprintln!("   Index: {}", index_path.display());

    let table = ContigTable::from_path(&index_path)
        .with_context(|| format!("failed to load {}", index_path.display()))?;
    eprintln!("   Contigs: {}", table.len());

    println!("#name\ttotal_bases\tstart_byte\tend_byte\tbases_per_line\tbytes_per_line");
    for layout in table.iter() {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            layout.name,
            layout.total_bases,
            layout.start_byte,
            layout.end_byte,
            layout.bases_per_line,
            layout.bytes_per_line
        );
    }

    Ok(())
}
