//! Document-to-text extraction.

use std::sync::Arc;

use tracing::debug;

use crate::error::ExtractionError;

/// Turns an uploaded document into plain text.
///
/// Implementations are stateless and may be slow; callers run them through
/// [`extract_text`] so the async runtime is not blocked.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError>;
}

/// Extracts the text layer of a PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        if document.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let text = pdf_extract::extract_text_from_mem(document)
            .map_err(|err| ExtractionError::Parse(err.to_string()))?;
        debug!(
            "Extracted {} characters from a {} byte PDF",
            text.chars().count(),
            document.len()
        );
        Ok(text)
    }
}

/// Run `extractor` on a blocking thread.
///
/// A panic inside the parser is reported as [`ExtractionError::Aborted`].
pub async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    document: Vec<u8>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&document))
        .await
        .map_err(|err| {
            if err.is_panic() {
                ExtractionError::Aborted("document parser panicked".to_string())
            } else {
                ExtractionError::Aborted("extraction task was cancelled".to_string())
            }
        })?
}
