mod backend;
mod update;

use std::path::PathBuf;
use std::sync::Arc;

use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use escrivao_core::{ActiveTab, InitialExtraction, Person, RoleCategory};

use crate::model::oitiva::OitivaForm;
use crate::model::output::OutputKind;
use crate::model::text_field::TextField;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Where the controller is in the verify → generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingVerification,
    ProcedureView,
    AwaitingReport,
    AwaitingOitivas,
    OutputView,
    Error,
}

impl Phase {
    pub fn is_awaiting(self) -> bool {
        matches!(
            self,
            Phase::AwaitingVerification | Phase::AwaitingReport | Phase::AwaitingOitivas
        )
    }
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
}

/// Which field a [`TextField`] edit writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Url,
    QuestionCount,
    ApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Main application state.
pub struct App {
    pub phase: Phase,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    /// Height of the people list (set on resize, used for page up/down).
    pub visible_rows: usize,

    /// Shared handle the service reads the document location from.
    pub tab: Arc<ActiveTab>,
    pub url: String,

    pub status: Status,
    pub extraction: Option<InitialExtraction>,
    pub people_cursor: usize,
    pub form: OitivaForm,

    pub output: String,
    pub output_kind: Option<OutputKind>,
    pub output_scroll: u16,
    /// Where `e` writes the output pane.
    pub outputs_dir: Option<PathBuf>,

    pub credential_panel_visible: bool,
    /// Last key saved (or found on start-up); shown masked.
    pub stored_key: String,
    pub testing_key: bool,

    pub input_mode: InputMode,
    pub editing: Option<(EditTarget, TextField)>,

    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(tab: Arc<ActiveTab>, url: Option<String>, theme: Theme) -> Self {
        let url = url.unwrap_or_default();
        if url.trim().is_empty() {
            tab.clear();
        } else {
            tab.set(url.clone());
        }

        Self {
            phase: Phase::Idle,
            theme,
            tick: 0,
            should_quit: false,
            show_help: false,
            visible_rows: 20,
            tab,
            url,
            status: Status::new("Informe o PDF (u) e verifique (v).", StatusKind::Info),
            extraction: None,
            people_cursor: 0,
            form: OitivaForm::default(),
            output: String::new(),
            output_kind: None,
            output_scroll: 0,
            outputs_dir: None,
            credential_panel_visible: false,
            stored_key: String::new(),
            testing_key: false,
            input_mode: InputMode::Normal,
            editing: None,
            backend_cmd_tx: None,
        }
    }

    /// Pre-fill the key field, or prompt for one when nothing is stored.
    pub fn with_stored_key(mut self, key: Option<String>) -> Self {
        match key {
            Some(key) => self.stored_key = key,
            None => {
                self.status = Status::new("Configure sua chave API do Gemini.", StatusKind::Info);
            }
        }
        self
    }

    /// Report and oitiva controls are live only with a verified document and
    /// nothing outstanding.
    pub fn generation_enabled(&self) -> bool {
        matches!(self.phase, Phase::ProcedureView | Phase::OutputView)
    }

    pub fn detail_visible(&self) -> bool {
        self.extraction.is_some()
            && !matches!(
                self.phase,
                Phase::Idle | Phase::AwaitingVerification | Phase::Error
            )
    }

    /// People in display order, paired with their category.
    pub fn person_rows(&self) -> Vec<(RoleCategory, &Person)> {
        self.extraction
            .as_ref()
            .map(|e| {
                e.groups()
                    .flat_map(|(role, people)| people.iter().map(move |p| (role, p)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render the current state.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let credential_height = if self.credential_panel_visible { 4 } else { 0 };

        let chunks = Layout::vertical([
            Constraint::Length(1),                 // header + url
            Constraint::Length(1),                 // status
            Constraint::Min(6),                    // body
            Constraint::Length(credential_height), // credential panel
            Constraint::Length(1),                 // footer
        ])
        .split(area);

        crate::view::status::render_header(f, self, chunks[0]);
        crate::view::status::render_status(f, self, chunks[1]);

        if self.detail_visible() {
            let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Min(30)])
                .split(chunks[2]);
            let left = Layout::vertical([Constraint::Length(6), Constraint::Min(3)])
                .split(columns[0]);
            let right = Layout::vertical([Constraint::Length(5), Constraint::Min(3)])
                .split(columns[1]);

            crate::view::procedure::render(f, self, left[0]);
            crate::view::people::render(f, self, left[1]);
            crate::view::oitiva::render(f, self, right[0]);
            crate::view::output::render(f, self, right[1]);
        } else {
            crate::view::output::render_placeholder(f, self, chunks[2]);
        }

        if self.credential_panel_visible {
            crate::view::credential::render(f, self, chunks[3]);
        }
        crate::view::status::render_footer(f, self, chunks[4]);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;
