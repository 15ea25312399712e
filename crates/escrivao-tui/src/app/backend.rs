use escrivao_core::Reply;

use super::{App, Phase, Status, StatusKind};
use crate::model::output::OutputKind;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Verified(reply) => match reply {
                Reply::Success { message, data } => {
                    self.extraction = Some(data);
                    self.people_cursor = 0;
                    self.form.selected_person = None;
                    self.phase = Phase::ProcedureView;
                    self.status = Status::new(message, StatusKind::Success);
                }
                Reply::Failure { error } => {
                    self.extraction = None;
                    self.phase = Phase::Error;
                    self.status = Status::new(error, StatusKind::Error);
                }
            },
            BackendEvent::ReportGenerated { kind, reply } => {
                self.finish_generation(OutputKind::Report(kind), reply);
            }
            BackendEvent::OitivasGenerated(reply) => {
                self.finish_generation(OutputKind::Oitivas, reply);
            }
            BackendEvent::CredentialSaved { key, result } => match result {
                Ok(()) => {
                    self.stored_key = key;
                    self.status = Status::new("Chave API salva. Testando...", StatusKind::Loading);
                    self.send(BackendCommand::TestApiKey);
                }
                Err(error) => {
                    self.testing_key = false;
                    self.status = Status::new(format!("Erro: {error}"), StatusKind::Error);
                }
            },
            BackendEvent::ApiKeyTested(reply) => {
                self.testing_key = false;
                self.status = match reply {
                    Reply::Success { message, .. } => Status::new(message, StatusKind::Success),
                    Reply::Failure { error } => {
                        Status::new(format!("Erro: {error}"), StatusKind::Error)
                    }
                };
            }
        }
    }

    fn finish_generation(&mut self, kind: OutputKind, reply: Reply<String>) {
        match reply {
            Reply::Success { message, data } => {
                self.output = data;
                self.output_kind = Some(kind);
                self.output_scroll = 0;
                self.phase = Phase::OutputView;
                self.status = Status::new(message, StatusKind::Success);
            }
            Reply::Failure { error } => {
                self.phase = Phase::Error;
                self.status = Status::new(error, StatusKind::Error);
            }
        }
    }
}
