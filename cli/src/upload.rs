//! Checks applied to a résumé file before it reaches the matcher.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Read `path` if it looks like a PDF no larger than [`MAX_UPLOAD_BYTES`].
pub fn read_pdf(path: &Path) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("no CV file at {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    if metadata.len() > MAX_UPLOAD_BYTES {
        bail!(
            "{} is {} bytes; the limit is {MAX_UPLOAD_BYTES}",
            path.display(),
            metadata.len()
        );
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if !bytes.starts_with(PDF_MAGIC) {
        bail!("only PDF files are allowed: {}", path.display());
    }
    Ok(bytes)
}
