use escrivao_core::ReportKind;

use super::{App, EditTarget, InputMode, Phase, Status, StatusKind};
use crate::action::Action;
use crate::model::text_field::TextField;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            self.should_quit = true;
            return true;
        }
        if action == Action::Tick {
            self.tick = self.tick.wrapping_add(1);
            return false;
        }
        if let Action::Resize(_w, h) = action {
            self.visible_rows = (h as usize).saturating_sub(14).max(1);
            return false;
        }

        if self.input_mode == InputMode::TextInput {
            self.update_text_input(action);
            return false;
        }

        // Help overlay swallows everything but its own dismissal
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        match action {
            Action::MoveDown => {
                let rows = self.person_rows().len();
                if rows > 0 {
                    self.people_cursor = (self.people_cursor + 1).min(rows - 1);
                }
            }
            Action::MoveUp => {
                self.people_cursor = self.people_cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1) as u16;
                self.output_scroll = self.output_scroll.saturating_add(page);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1) as u16;
                self.output_scroll = self.output_scroll.saturating_sub(page);
            }
            Action::NavigateBack => {
                self.credential_panel_visible = false;
            }
            Action::Verify => self.start_verification(),
            Action::ReportPendencias => self.start_report(ReportKind::Pendencias),
            Action::ReportFinal => self.start_report(ReportKind::Final),
            Action::GenerateOitivas => self.start_oitivas(),
            Action::SelectPerson => {
                if self.detail_visible() {
                    let selected = self
                        .person_rows()
                        .get(self.people_cursor)
                        .map(|(role, person)| person.selection_id(*role));
                    if selected.is_some() {
                        self.form.selected_person = selected;
                    }
                }
            }
            Action::CycleInterviewType => {
                self.form.interview_type = self.form.interview_type.next();
            }
            Action::EditQuestionCount => {
                let current = self.form.question_count.clone();
                self.begin_edit(EditTarget::QuestionCount, current);
            }
            Action::EditUrl => {
                let current = self.url.clone();
                self.begin_edit(EditTarget::Url, current);
            }
            Action::ToggleCredentialPanel => {
                self.credential_panel_visible = !self.credential_panel_visible;
            }
            Action::EditApiKey => {
                self.credential_panel_visible = true;
                let current = self.stored_key.clone();
                self.begin_edit(EditTarget::ApiKey, current);
            }
            Action::Export => self.export_output(),
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
        false
    }

    fn update_text_input(&mut self, action: Action) {
        let Some((target, field)) = self.editing.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };

        match action {
            Action::InputChar(ch) => {
                if *target != EditTarget::QuestionCount || ch.is_ascii_digit() {
                    field.insert(ch);
                }
            }
            Action::InputBackspace => field.backspace(),
            Action::DeleteForward => field.delete_forward(),
            Action::CursorLeft => field.left(),
            Action::CursorRight => field.right(),
            Action::CursorHome => field.home(),
            Action::CursorEnd => field.end(),
            Action::InputCancel => {
                self.editing = None;
                self.input_mode = InputMode::Normal;
            }
            Action::InputConfirm => {
                if let Some((target, field)) = self.editing.take() {
                    self.input_mode = InputMode::Normal;
                    self.commit_edit(target, field.as_str().trim().to_string());
                }
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self, target: EditTarget, initial: String) {
        self.editing = Some((target, TextField::new(initial)));
        self.input_mode = InputMode::TextInput;
    }

    fn commit_edit(&mut self, target: EditTarget, value: String) {
        match target {
            EditTarget::Url => {
                if value.is_empty() {
                    self.tab.clear();
                } else {
                    self.tab.set(value.clone());
                }
                self.url = value;
            }
            EditTarget::QuestionCount => {
                self.form.question_count = value;
            }
            EditTarget::ApiKey => {
                // blank input is ignored
                if !value.is_empty() {
                    self.testing_key = true;
                    self.status = Status::new("Salvando chave API...", StatusKind::Loading);
                    self.send(BackendCommand::SaveCredential { key: value });
                }
            }
        }
    }

    fn start_verification(&mut self) {
        if self.phase.is_awaiting() {
            return;
        }
        self.phase = Phase::AwaitingVerification;
        self.status = Status::new("Verificando aba...", StatusKind::Loading);
        self.output.clear();
        self.output_kind = None;
        self.send(BackendCommand::VerifyAndProcessDocument);
    }

    fn start_report(&mut self, kind: ReportKind) {
        if !self.generation_enabled() {
            return;
        }
        self.phase = Phase::AwaitingReport;
        self.status = Status::new(format!("Gerando {}...", kind.label()), StatusKind::Loading);
        self.clear_output();
        self.send(BackendCommand::GenerateReport { kind });
    }

    fn start_oitivas(&mut self) {
        if !self.generation_enabled() {
            return;
        }
        let options = match self.form.to_options() {
            Ok(options) => options,
            Err(message) => {
                self.status = Status::new(message, StatusKind::Error);
                return;
            }
        };
        self.phase = Phase::AwaitingOitivas;
        self.status = Status::new("Gerando Oitivas...", StatusKind::Loading);
        self.clear_output();
        self.send(BackendCommand::GenerateOitivas { options });
    }

    fn export_output(&mut self) {
        let Some(kind) = self.output_kind.filter(|_| !self.output.trim().is_empty()) else {
            self.status = Status::new("Nenhuma saída para exportar.", StatusKind::Info);
            return;
        };
        let Some(dir) = self.outputs_dir.clone().or_else(crate::export::outputs_dir) else {
            self.status = Status::new(
                "Não foi possível determinar a pasta de saída.",
                StatusKind::Error,
            );
            return;
        };

        let source = self.tab_source();
        match crate::export::write_output(&dir, kind, source.as_deref(), &self.output) {
            Ok(path) => {
                self.status = Status::new(
                    format!("Saída salva em {}", path.display()),
                    StatusKind::Success,
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.status = Status::new(format!("Falha ao salvar a saída: {e}"), StatusKind::Error);
            }
        }
    }

    fn tab_source(&self) -> Option<String> {
        Some(self.url.clone()).filter(|u| !u.is_empty())
    }

    fn clear_output(&mut self) {
        self.output.clear();
        self.output_kind = None;
        self.output_scroll = 0;
    }

    pub(super) fn send(&mut self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) if tx.send(cmd).is_ok() => {}
            _ => {
                tracing::warn!("backend channel closed, command dropped");
                self.phase = Phase::Error;
                self.testing_key = false;
                self.status = Status::new("Serviço indisponível.", StatusKind::Error);
            }
        }
    }
}
