use std::path::PathBuf;
use std::time::Instant;

use crate::MISSING_CONTEXT;
use crate::config::Options;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::index::ContigTable;
use crate::variants::VariantSet;

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub variants: usize,
    /// Variants written with the missing-value marker (only with `keep_going`)
    pub failed: usize,
    pub output: PathBuf,
}

/// Validate options, load inputs, extract every context and write the output
pub fn run(options: &Options) -> Result<RunSummary> {
    options.check()?;
    options.log_parameters();
    let start = Instant::now();

    let index_path = options.index_path();
    eprintln!("Parsing FASTA index: {}", index_path.display());
    let table = ContigTable::from_path(&index_path)?;
    eprintln!("   Contigs: {}", table.len());

    eprintln!("Loading variants: {}", options.vcf.display());
    let variant_set = VariantSet::from_path(&options.vcf)?;
    eprintln!("   Variants: {}", variant_set.len());

    let dispatcher = Dispatcher::new(options.dispatch_config())?;
    eprintln!(
        "Getting context sequences ({} workers, {} fetch)...",
        dispatcher.config().threads,
        dispatcher.config().fetch.name()
    );
    let outcomes = dispatcher.run(&table, variant_set.variants(), &options.fasta)?;

    let mut failed = 0;
    let contexts: Vec<String> = if options.keep_going {
        outcomes
            .into_iter()
            .map(|outcome| {
                outcome.unwrap_or_else(|e| {
                    eprintln!("   Skipped: {}", e);
                    failed += 1;
                    MISSING_CONTEXT.to_string()
                })
            })
            .collect()
    } else {
        outcomes.into_iter().collect::<Result<_>>()?
    };

    variant_set.write_to_path(&options.output, contexts.as_slice())?;
    eprintln!("Saved: {}", options.output.display());
    if failed > 0 {
        eprintln!("   Variants without context: {}", failed);
    }
    eprintln!("Completed in {:.3}s", start.elapsed().as_secs_f64());

    Ok(RunSummary {
        variants: variant_set.len(),
        failed,
        output: options.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;
    use crate::fetch::FetchMode;
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir, vcf: &str) -> Options {
        let fasta = dir.path().join("ref.fa");
        fs::write(&fasta, ">chr1\nacgtACGTac\nGGGGCCCCtt\nAATTC\n").unwrap();
        fs::write(dir.path().join("ref.fa.fai"), "chr1\t25\t6\t10\t11\n").unwrap();
        let vcf_path = dir.path().join("in.vcf");
        fs::write(&vcf_path, vcf).unwrap();

        Options {
            vcf: vcf_path,
            fasta,
            index: None,
            length: 1,
            output: dir.path().join("out.vcf"),
            ncpu: 2,
            fetch: FetchMode::Seek,
            keep_going: false,
        }
    }

    #[test]
    fn test_unknown_contig_aborts_without_output() {
        let dir = TempDir::new().unwrap();
        let opts = setup(&dir, "chr1\t5\t.\tA\tC\nchr9\t5\t.\tA\tC\n");

        let err = run(&opts).unwrap_err();
        assert!(matches!(err, ContextError::UnknownContig { slot: 1, .. }));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_keep_going_marks_failed_rows() {
        let dir = TempDir::new().unwrap();
        let mut opts = setup(&dir, "chr1\t5\t.\tA\tC\nchr9\t5\t.\tA\tC\nchr1\t11\t.\tG\tT\n");
        opts.keep_going = true;

        let summary = run(&opts).unwrap();
        assert_eq!(summary.variants, 3);
        assert_eq!(summary.failed, 1);

        let written = fs::read_to_string(&opts.output).unwrap();
        assert_eq!(
            written,
            "chr1\t5\t.\tA\tC\tTAC\nchr9\t5\t.\tA\tC\t.\nchr1\t11\t.\tG\tT\tCGG\n"
        );
    }
}
