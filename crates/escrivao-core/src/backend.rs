use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Text fragments of one page, in reading order.
pub type PageFragments = Vec<String>;

/// Trait for PDF text extraction backends.
///
/// Implementors only turn raw PDF bytes into per-page fragments; fetching
/// the document and joining the fragments into session text is done by
/// [`PdfTextExtractor`](crate::extract::PdfTextExtractor).
pub trait PdfBackend: Send + Sync {
    /// Extract the text fragments of every page, in page order.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<PageFragments>, BackendError>;
}
