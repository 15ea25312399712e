use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, EditTarget, StatusKind};
use crate::view::{spinner_char, truncate, with_cursor};

/// Title bar with the document URL (or its edit buffer).
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" ESCRIVÃO ", theme.header_style()),
        Span::styled(" PDF: ", Style::default().fg(theme.dim)),
    ];

    let budget = (area.width as usize).saturating_sub(18);
    match &app.editing {
        Some((EditTarget::Url, field)) => {
            spans.push(Span::styled(
                with_cursor(field),
                Style::default().fg(theme.active),
            ));
        }
        _ if app.url.is_empty() => {
            spans.push(Span::styled(
                "(nenhum documento; u para informar)",
                Style::default().fg(theme.dim),
            ));
        }
        _ => {
            spans.push(Span::styled(
                truncate(&app.url, budget),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let color = theme.status_color(app.status.kind);
    let prefix = match app.status.kind {
        StatusKind::Loading => format!(" {} ", spinner_char(app.tick)),
        StatusKind::Success => " \u{2713} ".to_string(),
        StatusKind::Error => " \u{2717} ".to_string(),
        StatusKind::Info => " \u{2139} ".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(app.status.message.clone(), Style::default().fg(color)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Key hints; generation keys are dimmed while they would be ignored.
pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    if app.editing.is_some() {
        let footer = Line::from(Span::styled(
            " Digite o valor  Enter:confirmar  Esc:cancelar",
            theme.footer_style(),
        ));
        f.render_widget(Paragraph::new(footer), area);
        return;
    }

    let enabled = app.generation_enabled();
    let verify_enabled = !app.phase.is_awaiting();
    let key = |label: &'static str, on: bool| {
        let style = if on {
            theme.footer_style()
        } else {
            theme.footer_style().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        };
        Span::styled(label, style)
    };

    let footer = Line::from(vec![
        key(" u:pdf ", true),
        key(" v:verificar ", verify_enabled),
        key(" p:pendências ", enabled),
        key(" f:final ", enabled),
        key(" o:oitivas ", enabled),
        key(" e:exportar ", !app.output.is_empty()),
        key(" c:chave ", true),
        key(" ?:ajuda ", true),
        key(" q:sair ", true),
    ]);
    f.render_widget(Paragraph::new(footer), area);
}
