use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::theme::Theme;

const UNKNOWN: &str = "Não identificado";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(extraction) = &app.extraction else {
        return;
    };
    let proc = &extraction.procedure;

    let occurrences = if proc.occurrence_numbers.is_empty() {
        None
    } else {
        Some(proc.occurrence_numbers.join(", "))
    };

    let lines = vec![
        field_line("Procedimento", proc.procedure_number.as_deref(), theme),
        field_line("Boletim de Ocorrência", occurrences.as_deref(), theme),
        field_line("Data do Fato", proc.fact_date.as_deref(), theme),
        field_line("Local do Fato", proc.fact_location.as_deref(), theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Procedimento "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn field_line<'a>(label: &'a str, value: Option<&'a str>, theme: &Theme) -> Line<'a> {
    let value_span = match value {
        Some(v) => Span::styled(v, Style::default().fg(theme.text)),
        None => Span::styled(UNKNOWN, Style::default().fg(theme.dim)),
    };
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        ),
        value_span,
    ])
}
