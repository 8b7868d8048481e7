use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;

use crate::error::{ContextError, Result};
use crate::fetch::{FetchMode, Outcome};
use crate::index::ContigTable;
use crate::offset::ByteRange;
use crate::variants::Variant;

/// Settings injected into a [`Dispatcher`]
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Worker threads for the planning stage (and the mmap fetch stage)
    pub threads: usize,
    /// Bases requested on each side of every variant
    pub half_window: u64,
    pub fetch: FetchMode,
}

/// Two-stage driver: plan every byte range in parallel, join, then fetch
pub struct Dispatcher {
    config: DispatchConfig,
    pool: ThreadPool,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self> {
        if config.threads == 0 {
            return Err(ContextError::config("worker count must be at least 1"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("ctxseq-worker-{i}"))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Plan stage. `result[slot]` is the range for `variants[slot]`; the call
    /// returns only after every slot is filled.
    pub fn plan(&self, table: &ContigTable, variants: &[Variant]) -> Vec<Result<ByteRange>> {
        let half_window = self.config.half_window;
        self.pool.install(|| {
            variants
                .par_iter()
                .enumerate()
                .map(|(slot, variant)| plan_variant(table, slot, variant, half_window))
                .collect()
        })
    }

    /// Plan every variant, then read each context from `reference`.
    ///
    /// The returned vector has one outcome per variant, in input order.
    pub fn run(
        &self,
        table: &ContigTable,
        variants: &[Variant],
        reference: &Path,
    ) -> Result<Vec<Outcome>> {
        let planned = self.plan(table, variants);
        let strategy = self.config.fetch.strategy();
        self.pool.install(|| strategy.fetch(reference, variants, planned))
    }
}

/// Look up the variant's contig and plan its byte range
pub fn plan_variant(
    table: &ContigTable,
    slot: usize,
    variant: &Variant,
    half_window: u64,
) -> Result<ByteRange> {
    let layout = table
        .get(&variant.contig)
        .ok_or_else(|| ContextError::UnknownContig {
            slot,
            variant: variant.to_string(),
            contig: variant.contig.clone(),
        })?;
    Ok(ByteRange::plan(variant, layout, half_window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FASTA: &str = ">chr1\nacgtACGTac\nGGGGCCCCtt\nAATTC\n>chr2\nTTTTGGGG\nCC\n";
    const FAI: &str = "chr1\t25\t6\t10\t11\nchr2\t10\t40\t8\t9\n";

    fn reference() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FASTA.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn table() -> ContigTable {
        ContigTable::from_reader(FAI.as_bytes()).unwrap()
    }

    fn dispatcher(threads: usize, half_window: u64, fetch: FetchMode) -> Dispatcher {
        Dispatcher::new(DispatchConfig {
            threads,
            half_window,
            fetch,
        })
        .unwrap()
    }

    fn variants() -> Vec<Variant> {
        let mut variants = Vec::new();
        for pos in 1..=25 {
            variants.push(Variant::new("chr1", pos, "N", "A"));
        }
        for pos in 1..=10 {
            variants.push(Variant::new("chr2", pos, "N", "A"));
        }
        variants
    }

    #[test]
    fn test_zero_threads_is_config_error() {
        let err = Dispatcher::new(DispatchConfig {
            threads: 0,
            half_window: 1,
            fetch: FetchMode::Seek,
        })
        .err()
        .unwrap();
        assert!(matches!(err, ContextError::Config { .. }));
    }

    #[test]
    fn test_plan_fills_every_slot_in_order() {
        let variants = variants();
        let plans = dispatcher(4, 2, FetchMode::Seek).plan(&table(), &variants);

        assert_eq!(plans.len(), variants.len());
        let layout = table().get("chr2").cloned().unwrap();
        assert_eq!(
            plans[25].as_ref().unwrap(),
            &ByteRange::plan(&variants[25], &layout, 2)
        );
    }

    #[test]
    fn test_unknown_contig_carries_identity() {
        let variants = vec![
            Variant::new("chr1", 5, "A", "C"),
            Variant::new("chrUn", 7, "G", "T"),
        ];
        let file = reference();
        let outcomes = dispatcher(2, 1, FetchMode::Seek)
            .run(&table(), &variants, file.path())
            .unwrap();

        assert_eq!(outcomes[0].as_ref().unwrap(), "TAC");
        match &outcomes[1] {
            Err(ContextError::UnknownContig {
                slot,
                variant,
                contig,
            }) => {
                assert_eq!(*slot, 1);
                assert_eq!(variant, "chrUn:7G>T");
                assert_eq!(contig, "chrUn");
            }
            other => panic!("expected unknown contig, got {other:?}"),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let variants = variants();
        let file = reference();

        let collect = |threads, fetch| -> Vec<String> {
            dispatcher(threads, 3, fetch)
                .run(&table(), &variants, file.path())
                .unwrap()
                .into_iter()
                .map(|outcome| outcome.unwrap())
                .collect()
        };

        let baseline = collect(1, FetchMode::Seek);
        assert_eq!(baseline.len(), variants.len());
        for threads in [2, 8] {
            for fetch in FetchMode::all() {
                assert_eq!(collect(threads, fetch), baseline);
            }
        }
        assert_eq!(collect(1, FetchMode::Mmap), baseline);
    }

    #[test]
    fn test_second_contig_padding() {
        let variants = vec![
            Variant::new("chr2", 1, "T", "A"),
            Variant::new("chr2", 10, "C", "A"),
        ];
        let file = reference();
        let outcomes = dispatcher(2, 2, FetchMode::Mmap)
            .run(&table(), &variants, file.path())
            .unwrap();

        assert_eq!(outcomes[0].as_ref().unwrap(), "NNTTT");
        assert_eq!(outcomes[1].as_ref().unwrap(), "GCCNN");
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let variants = vec![Variant::new("chr1", 5, "A", "C")];
        let result = dispatcher(1, 1, FetchMode::Seek).run(
            &table(),
            &variants,
            Path::new("/nonexistent/ref.fa"),
        );
        assert!(matches!(result, Err(ContextError::Io(_))));
    }
}
