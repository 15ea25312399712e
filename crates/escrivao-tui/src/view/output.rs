use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Phase};
use crate::view::spinner_char;

/// Generated report or oitiva text, scrolled by `output_scroll`.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let title = match app.output_kind {
        Some(kind) => format!(" {} ", kind.label()),
        None => " Saída ".to_string(),
    };

    let paragraph = if matches!(app.phase, Phase::AwaitingReport | Phase::AwaitingOitivas) {
        Paragraph::new(Line::from(Span::styled(
            format!("{} Aguardando resposta do Gemini...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )))
    } else if app.output.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "Gere um relatório (p/f) ou perguntas de oitiva (o).",
            Style::default().fg(theme.dim),
        )))
    } else {
        let lines: Vec<Line> = app
            .output
            .lines()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.output_scroll, 0))
    };

    f.render_widget(
        paragraph.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        ),
        area,
    );
}

/// Body shown before a document has been verified (or after a failure).
pub fn render_placeholder(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let message = match app.phase {
        Phase::AwaitingVerification => {
            format!("{} Extraindo e analisando o documento...", spinner_char(app.tick))
        }
        Phase::Error => {
            "Não foi possível concluir a operação. Verifique o documento novamente (v).".to_string()
        }
        _ => "Nenhum documento verificado. Informe o PDF (u) e pressione v.".to_string(),
    };
    let style = match app.phase {
        Phase::AwaitingVerification => Style::default().fg(theme.spinner),
        Phase::Error => Style::default().fg(theme.error),
        _ => Style::default().fg(theme.dim),
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(message, style)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
    f.render_widget(paragraph, area);
}
