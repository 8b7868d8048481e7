pub mod layout;
pub mod table;

pub use layout::ContigLayout;
pub use table::ContigTable;

use std::path::{Path, PathBuf};

/// Side-car index path for a FASTA file: the full file name with ".fai" appended
pub fn default_index_path(fasta: &Path) -> PathBuf {
    let mut index_path = fasta.as_os_str().to_owned();
    index_path.push(".fai");
    PathBuf::from(index_path)
}
