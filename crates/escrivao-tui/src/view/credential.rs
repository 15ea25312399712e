use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, EditTarget};
use crate::view::{mask_key, spinner_char};

/// Collapsible API key panel. The stored key is never shown in full.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let value = match &app.editing {
        Some((EditTarget::ApiKey, field)) => Span::styled(
            format!("{}\u{2588}", mask_key_for_edit(field.as_str())),
            Style::default().fg(theme.active),
        ),
        _ => Span::styled(mask_key(&app.stored_key), Style::default().fg(theme.text)),
    };

    let hint = if app.testing_key {
        Span::styled(
            format!("{} testando...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if app.editing.is_some() {
        Span::styled("Enter: salvar e testar  Esc: cancelar", Style::default().fg(theme.dim))
    } else {
        Span::styled("K: editar  c: fechar", Style::default().fg(theme.dim))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Chave API do Gemini: ",
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            ),
            value,
        ]),
        Line::from(hint),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Configuração "),
    );
    f.render_widget(paragraph, area);
}

/// While typing, show the prefix so the user can tell which key was pasted.
fn mask_key_for_edit(buffer: &str) -> String {
    if buffer.is_empty() {
        String::new()
    } else {
        mask_key(buffer)
    }
}
