//! Index serialization.
//!
//! One line per token, tokens in ascending byte order:
//!
//! ```text
//! token<TAB>doc1 doc2 ... docN
//! ```
//!
//! Documents on a line are in ascending identifier order, so the same
//! input always produces byte-identical output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::error::{IndexError, Result};
use crate::core::types::GlobalIndex;

/// Write `index` to `out`, returning the number of lines written.
pub fn write_index<W: Write>(index: &GlobalIndex, mut out: W) -> io::Result<usize> {
    let entries = index.sorted_entries();

    for (token, docs) in &entries {
        out.write_all(token.as_bytes())?;
        out.write_all(b"\t")?;
        for (i, doc) in docs.iter().enumerate() {
            if i > 0 {
                out.write_all(b" ")?;
            }
            out.write_all(doc.as_bytes())?;
        }
        out.write_all(b"\n")?;
    }

    out.flush()?;
    Ok(entries.len())
}

/// Write `index` to the file at `path`, replacing any existing file.
pub fn write_index_file(index: &GlobalIndex, path: &Path) -> Result<usize> {
    let output_failed = |source: io::Error| IndexError::OutputFailed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(output_failed)?;
    let lines = write_index(index, BufWriter::new(file)).map_err(output_failed)?;

    tracing::debug!("Wrote {} lines to {:?}", lines, path);
    Ok(lines)
}
