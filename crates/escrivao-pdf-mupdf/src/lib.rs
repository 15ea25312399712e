use mupdf::{Document, TextPageFlags};

use escrivao_core::config_file::PdfConfig;
use escrivao_core::{BackendError, PageFragments, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that the rest of the workspace does not transitively depend on it.
///
/// Every text line of a page becomes one fragment. Header and footer bands
/// are kept by default since police forms often print the procedure number
/// there; they can be cut with [`with_header_exclusion`] and
/// [`with_footer_exclusion`].
///
/// [`with_header_exclusion`]: MupdfBackend::with_header_exclusion
/// [`with_footer_exclusion`]: MupdfBackend::with_footer_exclusion
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with the margins from the `[pdf]` config section.
    pub fn from_config(config: Option<&PdfConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };
        Self::new()
            .with_header_exclusion(config.header_exclusion.unwrap_or(0.0))
            .with_footer_exclusion(config.footer_exclusion.unwrap_or(0.0))
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }
}

fn extraction_error(e: mupdf::Error) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<PageFragments>, BackendError> {
        let document = Document::from_bytes(data, "application/pdf")
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();

        for page_result in document.pages().map_err(extraction_error)? {
            let page = page_result.map_err(extraction_error)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction_error)?;

            let page_bounds = page.bounds().map_err(extraction_error)?;
            let page_height = page_bounds.y1 - page_bounds.y0;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| page_bounds.y0 + page_height * r);
            let footer_threshold = self
                .footer_exclusion_ratio
                .map(|r| page_bounds.y1 - page_height * r);

            let mut fragments = PageFragments::new();
            for block in text_page.blocks() {
                let block_bounds = block.bounds();

                if header_threshold.is_some_and(|t| block_bounds.y1 <= t) {
                    continue;
                }
                if footer_threshold.is_some_and(|t| block_bounds.y0 >= t) {
                    continue;
                }

                for line in block.lines() {
                    let text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    fragments.push(text);
                }
            }
            pages.push(fragments);
        }

        tracing::debug!(pages = pages.len(), "mupdf extraction finished");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = MupdfBackend::new()
            .extract_pages(b"definitely not a pdf")
            .unwrap_err();
        assert!(matches!(
            err,
            BackendError::OpenError(_) | BackendError::ExtractionError(_)
        ));
    }

    #[test]
    fn exclusion_ratio_zero_disables() {
        let backend = MupdfBackend::new()
            .with_header_exclusion(0.04)
            .with_footer_exclusion(0.0);
        assert_eq!(backend.header_exclusion_ratio, Some(0.04));
        assert_eq!(backend.footer_exclusion_ratio, None);
    }

    #[test]
    fn config_margins_applied() {
        let backend = MupdfBackend::from_config(Some(&PdfConfig {
            header_exclusion: None,
            footer_exclusion: Some(0.08),
        }));
        assert_eq!(backend.header_exclusion_ratio, None);
        assert_eq!(backend.footer_exclusion_ratio, Some(0.08));

        let plain = MupdfBackend::from_config(None);
        assert_eq!(plain.footer_exclusion_ratio, None);
    }
}
