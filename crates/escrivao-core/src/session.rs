/// Text of the document verified most recently.
///
/// Immutable once built; a new verification installs a new `Session`
/// instead of editing this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    text: String,
    source_url: String,
    page_count: usize,
}

impl Session {
    pub fn new(text: String, source_url: String, page_count: usize) -> Self {
        Self {
            text,
            source_url,
            page_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}
