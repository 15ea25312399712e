use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use escrivao_core::{Operation, Orchestrator, Reply};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires, running each
/// on its own task so the UI keeps drawing while the API answers.
pub async fn run(
    orchestrator: Arc<Orchestrator>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        tracing::debug!(?cmd, "backend command");

        let orchestrator = Arc::clone(&orchestrator);
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let event = execute(&orchestrator, cmd).await;
            // receiver gone means the UI has quit
            let _ = tx.send(event);
        });
    }
}

/// Run one command to completion and wrap its outcome as an event.
pub async fn execute(orchestrator: &Orchestrator, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::VerifyAndProcessDocument => BackendEvent::Verified(Reply::from_result(
            Operation::VerifyAndProcessDocument,
            orchestrator.verify_and_process_document().await,
        )),
        BackendCommand::GenerateReport { kind } => BackendEvent::ReportGenerated {
            kind,
            reply: Reply::from_result(
                Operation::GenerateReport,
                orchestrator.generate_report(kind).await,
            ),
        },
        BackendCommand::GenerateOitivas { options } => BackendEvent::OitivasGenerated(
            Reply::from_result(
                Operation::GenerateOitivas,
                orchestrator.generate_oitivas(&options).await,
            ),
        ),
        BackendCommand::SaveCredential { key } => {
            let result = orchestrator.save_credential(&key).map_err(|e| e.to_string());
            BackendEvent::CredentialSaved {
                key: key.trim().to_string(),
                result,
            }
        }
        BackendCommand::TestApiKey => BackendEvent::ApiKeyTested(Reply::from_result(
            Operation::TestApiKey,
            orchestrator.test_api_key().await,
        )),
    }
}
