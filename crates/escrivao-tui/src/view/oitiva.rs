use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, EditTarget};
use crate::view::with_cursor;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let label = |text: &'static str| {
        Span::styled(
            text,
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        )
    };

    let count = match &app.editing {
        Some((EditTarget::QuestionCount, field)) => Span::styled(
            with_cursor(field),
            Style::default().fg(theme.active),
        ),
        _ => Span::styled(
            app.form.question_count.clone(),
            Style::default().fg(theme.text),
        ),
    };

    let person = match &app.form.selected_person {
        Some(id) => Span::styled(id.clone(), Style::default().fg(theme.text)),
        None => Span::styled("(nenhuma)", Style::default().fg(theme.dim)),
    };

    let lines = vec![
        Line::from(vec![
            label("Tipo (t): "),
            Span::styled(
                app.form.interview_type.label(),
                Style::default().fg(theme.text),
            ),
        ]),
        Line::from(vec![label("Perguntas (n): "), count]),
        Line::from(vec![label("Pessoa: "), person]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Oitiva "),
    );
    f.render_widget(paragraph, area);
}
