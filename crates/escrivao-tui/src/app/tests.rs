use std::collections::BTreeMap;

use escrivao_core::{Procedure, Reply, ReportKind, TabInspector};
use tokio::sync::mpsc;

use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;

/// Create an App wired to a command channel the test can inspect.
fn test_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let tab = Arc::new(ActiveTab::new(None));
    let mut app = App::new(tab, Some("https://x/inquerito.pdf".into()), Theme::hacker());
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

fn person(name: &str, age: Option<u32>) -> Person {
    Person {
        name: name.into(),
        national_id: None,
        address: None,
        age,
        phone: None,
        is_minor: age.is_some_and(|a| a < 18),
        has_incomplete_identification: false,
    }
}

fn extraction() -> InitialExtraction {
    let mut people = BTreeMap::new();
    people.insert(RoleCategory::Victim, vec![person("Ana Souza", Some(15))]);
    people.insert(
        RoleCategory::Witness,
        vec![person("Bruno Lima", Some(40)), person("Carla Dias", None)],
    );
    InitialExtraction {
        procedure: Procedure {
            procedure_number: Some("123/2024".into()),
            ..Procedure::default()
        },
        people,
    }
}

/// Drive the app through a successful verification.
fn verified_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let (mut app, mut rx) = test_app();
    app.update(Action::Verify);
    assert_eq!(rx.try_recv().ok(), Some(BackendCommand::VerifyAndProcessDocument));
    app.handle_backend_event(BackendEvent::Verified(Reply::Success {
        message: "PDF processado. Dados extraídos!".into(),
        data: extraction(),
    }));
    (app, rx)
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.update(Action::InputChar(ch));
    }
}

// ── Start-up ────────────────────────────────────────────────────

#[test]
fn new_app_publishes_url_to_tab() {
    let (app, _rx) = test_app();
    assert_eq!(app.tab.active_url().as_deref(), Some("https://x/inquerito.pdf"));
    assert_eq!(app.phase, Phase::Idle);
    assert!(!app.detail_visible());
}

#[test]
fn missing_key_prompts_for_configuration() {
    let (app, _rx) = test_app();
    let app = app.with_stored_key(None);
    assert_eq!(app.status.message, "Configure sua chave API do Gemini.");
    assert!(app.stored_key.is_empty());
}

// ── Verification ────────────────────────────────────────────────

#[test]
fn verify_sends_command_and_waits() {
    let (mut app, mut rx) = test_app();
    app.update(Action::Verify);

    assert_eq!(app.phase, Phase::AwaitingVerification);
    assert_eq!(app.status.kind, StatusKind::Loading);
    assert_eq!(rx.try_recv().ok(), Some(BackendCommand::VerifyAndProcessDocument));

    // a second press while waiting is ignored
    app.update(Action::Verify);
    assert!(rx.try_recv().is_err());
}

#[test]
fn verified_extraction_shows_detail() {
    let (app, _rx) = verified_app();
    assert_eq!(app.phase, Phase::ProcedureView);
    assert!(app.detail_visible());
    assert!(app.generation_enabled());
    assert_eq!(app.status.kind, StatusKind::Success);
    assert_eq!(app.person_rows().len(), 3);
}

#[test]
fn failed_verification_hides_detail() {
    let (mut app, _rx) = verified_app();
    app.update(Action::Verify);
    app.handle_backend_event(BackendEvent::Verified(Reply::Failure {
        error: "A aba ativa não é um arquivo .pdf".into(),
    }));

    assert_eq!(app.phase, Phase::Error);
    assert!(app.extraction.is_none());
    assert!(!app.detail_visible());
    assert!(!app.generation_enabled());
    assert_eq!(app.status.message, "A aba ativa não é um arquivo .pdf");
}

#[test]
fn closed_channel_reports_unavailable_service() {
    let (mut app, rx) = test_app();
    drop(rx);
    app.update(Action::Verify);
    assert_eq!(app.phase, Phase::Error);
    assert_eq!(app.status.message, "Serviço indisponível.");
}

// ── Reports ─────────────────────────────────────────────────────

#[test]
fn reports_are_ignored_before_verification() {
    let (mut app, mut rx) = test_app();
    app.update(Action::ReportFinal);
    app.update(Action::ReportPendencias);
    app.update(Action::GenerateOitivas);
    assert!(rx.try_recv().is_err());
    assert_eq!(app.phase, Phase::Idle);
}

#[test]
fn report_round_trip_fills_output() {
    let (mut app, mut rx) = verified_app();
    app.update(Action::ReportPendencias);

    assert_eq!(app.phase, Phase::AwaitingReport);
    assert_eq!(
        rx.try_recv().ok(),
        Some(BackendCommand::GenerateReport {
            kind: ReportKind::Pendencias
        })
    );
    // controls stay disabled until the answer arrives
    app.update(Action::ReportFinal);
    assert!(rx.try_recv().is_err());

    app.handle_backend_event(BackendEvent::ReportGenerated {
        kind: ReportKind::Pendencias,
        reply: Reply::Success {
            message: "Resposta gerada!".into(),
            data: "Pendências:\n- laudo".into(),
        },
    });
    assert_eq!(app.phase, Phase::OutputView);
    assert_eq!(app.output, "Pendências:\n- laudo");
    assert_eq!(app.output_kind, Some(OutputKind::Report(ReportKind::Pendencias)));
    assert!(app.detail_visible());
}

#[test]
fn report_failure_moves_to_error() {
    let (mut app, _rx) = verified_app();
    app.update(Action::ReportFinal);
    app.handle_backend_event(BackendEvent::ReportGenerated {
        kind: ReportKind::Final,
        reply: Reply::Failure {
            error: "Erro na API do Gemini: quota".into(),
        },
    });
    assert_eq!(app.phase, Phase::Error);
    assert_eq!(app.status.kind, StatusKind::Error);
    assert!(!app.generation_enabled());
}

#[test]
fn reverify_clears_previous_output() {
    let (mut app, _rx) = verified_app();
    app.update(Action::ReportFinal);
    app.handle_backend_event(BackendEvent::ReportGenerated {
        kind: ReportKind::Final,
        reply: Reply::Success {
            message: "Resposta gerada!".into(),
            data: "texto".into(),
        },
    });
    app.update(Action::Verify);
    assert!(app.output.is_empty());
    assert!(app.output_kind.is_none());
}

// ── Oitivas ─────────────────────────────────────────────────────

#[test]
fn oitivas_without_person_show_message() {
    let (mut app, mut rx) = verified_app();
    app.update(Action::GenerateOitivas);
    assert!(rx.try_recv().is_err());
    assert_eq!(
        app.status.message,
        "Por favor, selecione uma pessoa da lista para gerar as perguntas."
    );
    assert_eq!(app.phase, Phase::ProcedureView);
}

#[test]
fn select_person_and_generate_oitivas() {
    let (mut app, mut rx) = verified_app();
    app.update(Action::MoveDown);
    app.update(Action::SelectPerson);
    assert_eq!(
        app.form.selected_person.as_deref(),
        Some("Testemunha(s): Bruno Lima")
    );

    app.update(Action::CycleInterviewType);
    app.update(Action::GenerateOitivas);

    assert_eq!(app.phase, Phase::AwaitingOitivas);
    match rx.try_recv() {
        Ok(BackendCommand::GenerateOitivas { options }) => {
            assert_eq!(options.interview_type, "Testemunha");
            assert_eq!(options.question_count, 10);
            assert_eq!(options.person_descriptor, "Testemunha(s): Bruno Lima");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cursor_stays_within_people() {
    let (mut app, _rx) = verified_app();
    for _ in 0..10 {
        app.update(Action::MoveDown);
    }
    assert_eq!(app.people_cursor, 2);
    for _ in 0..10 {
        app.update(Action::MoveUp);
    }
    assert_eq!(app.people_cursor, 0);
}

#[test]
fn question_count_accepts_digits_only() {
    let (mut app, mut rx) = verified_app();
    app.update(Action::EditQuestionCount);
    assert_eq!(app.input_mode, InputMode::TextInput);
    app.update(Action::InputBackspace);
    app.update(Action::InputBackspace);
    type_text(&mut app, "a5-");
    app.update(Action::InputConfirm);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form.question_count, "5");

    // empty count fails validation before the person check
    app.update(Action::EditQuestionCount);
    app.update(Action::InputBackspace);
    app.update(Action::InputConfirm);
    app.update(Action::GenerateOitivas);
    assert!(rx.try_recv().is_err());
    assert_eq!(
        app.status.message,
        "Por favor, insira uma quantidade de perguntas válida."
    );
}

// ── Document URL ────────────────────────────────────────────────

#[test]
fn editing_url_updates_tab() {
    let (mut app, _rx) = test_app();
    app.update(Action::EditUrl);
    app.update(Action::CursorHome);
    for _ in 0.."https://x/inquerito.pdf".len() {
        app.update(Action::DeleteForward);
    }
    type_text(&mut app, "/tmp/bo.pdf");
    app.update(Action::InputConfirm);

    assert_eq!(app.url, "/tmp/bo.pdf");
    assert_eq!(app.tab.active_url().as_deref(), Some("/tmp/bo.pdf"));
}

#[test]
fn cancelled_edit_keeps_url() {
    let (mut app, _rx) = test_app();
    app.update(Action::EditUrl);
    type_text(&mut app, "zzz");
    app.update(Action::InputCancel);
    assert_eq!(app.url, "https://x/inquerito.pdf");
    assert!(app.editing.is_none());
}

// ── Credential ──────────────────────────────────────────────────

#[test]
fn saving_key_chains_into_test() {
    let (mut app, mut rx) = test_app();
    app.update(Action::EditApiKey);
    assert!(app.credential_panel_visible);
    type_text(&mut app, "  AIzaNova ");
    app.update(Action::InputConfirm);

    assert!(app.testing_key);
    assert_eq!(
        rx.try_recv().ok(),
        Some(BackendCommand::SaveCredential {
            key: "AIzaNova".into()
        })
    );

    app.handle_backend_event(BackendEvent::CredentialSaved {
        key: "AIzaNova".into(),
        result: Ok(()),
    });
    assert_eq!(app.stored_key, "AIzaNova");
    assert_eq!(rx.try_recv().ok(), Some(BackendCommand::TestApiKey));

    app.handle_backend_event(BackendEvent::ApiKeyTested(Reply::Success {
        message: "Chave API configurada e funcionando!".into(),
        data: (),
    }));
    assert!(!app.testing_key);
    assert_eq!(app.status.kind, StatusKind::Success);
}

#[test]
fn failed_key_test_is_prefixed() {
    let (mut app, _rx) = test_app();
    app.testing_key = true;
    app.handle_backend_event(BackendEvent::ApiKeyTested(Reply::Failure {
        error: "API key not valid".into(),
    }));
    assert!(!app.testing_key);
    assert_eq!(app.status.message, "Erro: API key not valid");
}

#[test]
fn blank_key_is_not_sent() {
    let (mut app, mut rx) = test_app();
    app.update(Action::EditApiKey);
    type_text(&mut app, "   ");
    app.update(Action::InputConfirm);
    assert!(rx.try_recv().is_err());
    assert!(!app.testing_key);
}

// ── Overlays ────────────────────────────────────────────────────

#[test]
fn help_swallows_actions() {
    let (mut app, mut rx) = test_app();
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::Verify);
    assert!(rx.try_recv().is_err());
    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}

#[test]
fn quit_sets_flag() {
    let (mut app, _rx) = test_app();
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

// ── Export ──────────────────────────────────────────────────────

#[test]
fn export_without_output_is_refused() {
    let (mut app, _rx) = verified_app();
    app.update(Action::Export);
    assert_eq!(app.status.message, "Nenhuma saída para exportar.");
}

#[test]
fn export_writes_into_outputs_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = verified_app();
    app.outputs_dir = Some(dir.path().to_path_buf());
    app.update(Action::GenerateOitivas);
    app.form.selected_person = Some("Vítima(s): Ana Souza".into());
    app.update(Action::GenerateOitivas);
    app.handle_backend_event(BackendEvent::OitivasGenerated(Reply::Success {
        message: "Resposta gerada!".into(),
        data: "1. Pergunta".into(),
    }));

    app.update(Action::Export);

    assert_eq!(app.status.kind, StatusKind::Success);
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    assert!(content.contains("1. Pergunta"));
    assert!(content.contains("Documento: https://x/inquerito.pdf"));
}
