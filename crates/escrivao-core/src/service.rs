//! The extraction/orchestration service.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::ServiceError;
use crate::credential::{CredentialStore, KeyValueStore};
use crate::extract::{TextExtractor, join_pages};
use crate::gemini::GenerativeApi;
use crate::identification::IdentificationPolicy;
use crate::model::{InitialExtraction, parse_initial_extraction};
use crate::prompts::{self, OitivaOptions, ReportKind};
use crate::session::Session;
use crate::tab::{TabInspector, is_pdf_url};

/// Owns the current [`Session`] and runs the four operations against the
/// tab inspector, the text extractor and the generative API.
///
/// The session is only written by [`verify_and_process_document`]; readers
/// take a snapshot, so a report started before a new verification finishes
/// on the text it began with.
///
/// [`verify_and_process_document`]: Orchestrator::verify_and_process_document
pub struct Orchestrator {
    tab: Arc<dyn TabInspector>,
    extractor: Arc<dyn TextExtractor>,
    api: Arc<dyn GenerativeApi>,
    credentials: CredentialStore,
    policy: IdentificationPolicy,
    session: ArcSwapOption<Session>,
}

impl Orchestrator {
    pub fn new(
        tab: Arc<dyn TabInspector>,
        extractor: Arc<dyn TextExtractor>,
        api: Arc<dyn GenerativeApi>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            tab,
            extractor,
            api,
            credentials: CredentialStore::new(store),
            policy: IdentificationPolicy::default(),
            session: ArcSwapOption::empty(),
        }
    }

    pub fn with_policy(mut self, policy: IdentificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Snapshot of the current session, if a document has been verified.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }

    /// Check the active tab, extract its text, start a new session and ask
    /// the model for the procedure and the people involved.
    pub async fn verify_and_process_document(&self) -> Result<InitialExtraction, ServiceError> {
        let url = self
            .tab
            .active_url()
            .filter(|u| is_pdf_url(u))
            .ok_or(ServiceError::NotAPdf)?;

        let pages = self.extractor.extract_pages(&url).await?;
        let text = join_pages(&pages);
        if text.trim().is_empty() {
            self.session.store(None);
            tracing::info!(url = %url, pages = pages.len(), "document has no text, session cleared");
            return Err(ServiceError::EmptyDocument);
        }

        let session = Arc::new(Session::new(text, url, pages.len()));
        self.session.store(Some(Arc::clone(&session)));
        tracing::info!(
            url = %session.source_url(),
            pages = session.page_count(),
            chars = session.text().len(),
            "session replaced"
        );

        let answer = self
            .call_api(&prompts::initial_extraction_prompt(session.text()))
            .await?;
        let extraction = parse_initial_extraction(&answer, &self.policy)?;
        tracing::debug!(people = extraction.person_count(), "initial extraction parsed");
        Ok(extraction)
    }

    pub async fn generate_report(&self, kind: ReportKind) -> Result<String, ServiceError> {
        let session = self.current_session()?;
        tracing::debug!(kind = %kind, "generating report");
        self.call_api(&prompts::report_prompt(kind, session.text()))
            .await
    }

    pub async fn generate_oitivas(&self, options: &OitivaOptions) -> Result<String, ServiceError> {
        let session = self.current_session()?;
        options.validate()?;
        tracing::debug!(
            interview_type = %options.interview_type,
            questions = options.question_count,
            "generating oitiva questions"
        );
        self.call_api(&prompts::oitivas_prompt(session.text(), options))
            .await
    }

    /// Round-trip a trivial prompt with the stored credential.
    pub async fn test_api_key(&self) -> Result<(), ServiceError> {
        self.call_api(prompts::API_KEY_TEST_PROMPT).await.map(|_| ())
    }

    pub fn save_credential(&self, key: &str) -> Result<(), ServiceError> {
        self.credentials.save(key)
    }

    pub fn stored_credential(&self) -> Result<Option<String>, ServiceError> {
        self.credentials.load()
    }

    fn current_session(&self) -> Result<Arc<Session>, ServiceError> {
        self.session.load_full().ok_or(ServiceError::NoDocumentLoaded)
    }

    async fn call_api(&self, prompt: &str) -> Result<String, ServiceError> {
        // The store may hit the filesystem
        let credentials = self.credentials.clone();
        let key = tokio::task::spawn_blocking(move || credentials.load())
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))??
            .ok_or(ServiceError::MissingCredential)?;
        self.api.generate(&key, prompt).await
    }
}
