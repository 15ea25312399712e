//! Document fetching and text extraction.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::ServiceError;
use crate::backend::{PageFragments, PdfBackend};

/// Source of per-page text for a document URL.
pub trait TextExtractor: Send + Sync {
    /// Yield, in page order, the text fragments of every page of `url`.
    fn extract_pages<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PageFragments>, ServiceError>> + Send + 'a>>;
}

/// Concatenate pages into session text.
///
/// Every fragment is followed by a single space and every page by a newline,
/// so `[["Hello"], ["World"]]` becomes `"Hello \nWorld \n"`.
pub fn join_pages(pages: &[PageFragments]) -> String {
    let mut text = String::new();
    for page in pages {
        for fragment in page {
            text.push_str(fragment);
            text.push(' ');
        }
        text.push('\n');
    }
    text
}

/// Where the bytes of a document live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    Remote(String),
    Local(PathBuf),
}

impl DocumentLocation {
    /// Classify a tab URL: `http(s)://` is fetched over the network,
    /// `file://` URLs and bare paths are read from disk.
    pub fn parse(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return DocumentLocation::Remote(url.to_string());
        }
        if lower.starts_with("file://") {
            let raw = &url["file://".len()..];
            let decoded = urlencoding::decode(raw)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            return DocumentLocation::Local(PathBuf::from(decoded));
        }
        DocumentLocation::Local(PathBuf::from(url))
    }
}

/// [`TextExtractor`] that downloads (or reads) the PDF and hands the bytes to
/// a [`PdfBackend`] on the blocking pool.
pub struct PdfTextExtractor {
    client: reqwest::Client,
    backend: Arc<dyn PdfBackend>,
}

impl PdfTextExtractor {
    pub fn new(client: reqwest::Client, backend: Arc<dyn PdfBackend>) -> Self {
        Self { client, backend }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        match DocumentLocation::parse(url) {
            DocumentLocation::Remote(url) => {
                let resp = self.client.get(&url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(ServiceError::Extraction(format!(
                        "download do documento retornou HTTP {}",
                        status.as_u16()
                    )));
                }
                Ok(resp.bytes().await?.to_vec())
            }
            DocumentLocation::Local(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| ServiceError::Extraction(format!("{}: {}", path.display(), e))),
        }
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PageFragments>, ServiceError>> + Send + 'a>> {
        Box::pin(async move {
            let data = self.fetch(url).await?;
            tracing::debug!(url, bytes = data.len(), "document fetched");

            // MuPDF parsing is CPU-bound
            let backend = Arc::clone(&self.backend);
            let pages = tokio::task::spawn_blocking(move || backend.extract_pages(&data))
                .await
                .map_err(|e| ServiceError::Extraction(e.to_string()))?
                .map_err(|e| ServiceError::Extraction(e.to_string()))?;

            tracing::debug!(url, pages = pages.len(), "text extracted");
            Ok(pages)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    fn pages(raw: &[&[&str]]) -> Vec<PageFragments> {
        raw.iter()
            .map(|p| p.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn join_pages_spaces_fragments_and_breaks_pages() {
        let text = join_pages(&pages(&[&["Hello"], &["World"]]));
        assert_eq!(text, "Hello \nWorld \n");
    }

    #[test]
    fn join_pages_multiple_fragments_per_page() {
        let text = join_pages(&pages(&[&["IPL", "123/2024"], &[]]));
        assert_eq!(text, "IPL 123/2024 \n\n");
    }

    #[test]
    fn join_pages_image_only_document_is_blank() {
        let text = join_pages(&pages(&[&[], &[]]));
        assert!(text.trim().is_empty());
    }

    #[test]
    fn parse_location_variants() {
        assert_eq!(
            DocumentLocation::parse("HTTPS://x/doc.pdf"),
            DocumentLocation::Remote("HTTPS://x/doc.pdf".into())
        );
        assert_eq!(
            DocumentLocation::parse("file:///tmp/inqu%C3%A9rito%201.pdf"),
            DocumentLocation::Local(PathBuf::from("/tmp/inquérito 1.pdf"))
        );
        assert_eq!(
            DocumentLocation::parse("docs/bo.pdf"),
            DocumentLocation::Local(PathBuf::from("docs/bo.pdf"))
        );
    }

    struct EchoBackend;

    impl PdfBackend for EchoBackend {
        fn extract_pages(&self, data: &[u8]) -> Result<Vec<PageFragments>, BackendError> {
            let text = String::from_utf8_lossy(data);
            Ok(text
                .split('\x0c')
                .map(|page| page.lines().map(String::from).collect())
                .collect())
        }
    }

    #[tokio::test]
    async fn local_file_goes_through_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bo.pdf");
        std::fs::write(&path, "linha 1\nlinha 2\x0cpágina 2").unwrap();

        let extractor = PdfTextExtractor::new(reqwest::Client::new(), Arc::new(EchoBackend));
        let url = format!("file://{}", path.display());
        let pages = extractor.extract_pages(&url).await.unwrap();

        assert_eq!(join_pages(&pages), "linha 1 linha 2 \npágina 2 \n");
    }

    #[tokio::test]
    async fn missing_local_file_is_extraction_error() {
        let extractor = PdfTextExtractor::new(reqwest::Client::new(), Arc::new(EchoBackend));
        let err = extractor
            .extract_pages("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Extraction(_)));
    }
}
