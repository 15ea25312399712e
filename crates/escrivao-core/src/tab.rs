use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Answers "which document is the user looking at right now".
pub trait TabInspector: Send + Sync {
    fn active_url(&self) -> Option<String>;
}

/// Shared, swappable handle on the active document URL.
///
/// Front ends own one of these and update it as the user picks another
/// document; the orchestrator only ever reads it.
#[derive(Default)]
pub struct ActiveTab {
    url: ArcSwapOption<String>,
}

impl ActiveTab {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url: ArcSwapOption::new(url.map(Arc::new)),
        }
    }

    pub fn set(&self, url: impl Into<String>) {
        self.url.store(Some(Arc::new(url.into())));
    }

    pub fn clear(&self) {
        self.url.store(None);
    }
}

impl TabInspector for ActiveTab {
    fn active_url(&self) -> Option<String> {
        self.url.load_full().map(|u| u.as_ref().clone())
    }
}

/// Case-insensitive `.pdf` suffix check on the raw URL string.
pub fn is_pdf_url(url: &str) -> bool {
    url.to_lowercase().ends_with(".pdf")
}
