//! Hand-rolled test doubles for the generative API and the text extractor.
//!
//! Compiled unconditionally so front-end crates can drive an
//! [`Orchestrator`](crate::Orchestrator) in their own tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ServiceError;
use crate::backend::PageFragments;
use crate::extract::TextExtractor;
use crate::gemini::GenerativeApi;

/// One recorded call to [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub api_key: String,
    pub prompt: String,
}

/// A [`GenerativeApi`] that replays canned answers.
///
/// Either a fixed answer for every call, or a sequence consumed one per
/// call with the last one repeated once exhausted.
pub struct MockApi {
    responses: Mutex<Vec<Result<String, ServiceError>>>,
    fallback: Result<String, ServiceError>,
    calls: Mutex<Vec<ApiCall>>,
    call_count: AtomicUsize,
}

impl MockApi {
    pub fn new(response: Result<String, ServiceError>) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Always answer with `text`.
    pub fn answering(text: impl Into<String>) -> Self {
        Self::new(Ok(text.into()))
    }

    pub fn with_sequence(mut responses: Vec<Result<String, ServiceError>>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // popped from the back
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            responses: Mutex::new(responses),
            fallback,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn next_response(&self) -> Result<String, ServiceError> {
        let mut seq = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl GenerativeApi for MockApi {
    fn generate<'a>(
        &'a self,
        api_key: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ApiCall {
                api_key: api_key.to_string(),
                prompt: prompt.to_string(),
            });
        let response = self.next_response();
        Box::pin(async move { response })
    }
}

/// A [`TextExtractor`] returning canned pages (or errors) for any URL.
///
/// Like [`MockApi`], a sequence is consumed one per call and its last entry
/// repeats once exhausted.
pub struct MockExtractor {
    results: Mutex<Vec<Result<Vec<PageFragments>, ServiceError>>>,
    fallback: Result<Vec<PageFragments>, ServiceError>,
    urls: Mutex<Vec<String>>,
}

impl MockExtractor {
    fn new(result: Result<Vec<PageFragments>, ServiceError>) -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            fallback: result,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pages(pages: Vec<PageFragments>) -> Self {
        Self::new(Ok(pages))
    }

    /// One page per string, one fragment per page.
    pub fn with_text<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_pages(text_pages(pages))
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::new(Err(err))
    }

    pub fn with_sequence(mut results: Vec<Result<Vec<PageFragments>, ServiceError>>) -> Self {
        assert!(!results.is_empty(), "sequence must have at least one result");
        results.reverse();
        let fallback = results[0].clone();
        Self {
            results: Mutex::new(results),
            fallback,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// URLs requested so far, in call order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// One page per string, one fragment per page.
pub fn text_pages<I, S>(pages: I) -> Vec<PageFragments>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    pages.into_iter().map(|p| vec![p.into()]).collect()
}

impl TextExtractor for MockExtractor {
    fn extract_pages<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PageFragments>, ServiceError>> + Send + 'a>> {
        self.urls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());
        let result = self
            .results
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(|| self.fallback.clone());
        Box::pin(async move { result })
    }
}
