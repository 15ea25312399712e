use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use escrivao_core::RoleCategory;

use crate::app::App;

/// Grouped list of people with a radio mark on the selected one.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let rows = app.person_rows();
    let selected = app.form.selected_person.as_deref();

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0usize;
    let mut current_role: Option<RoleCategory> = None;

    for (i, (role, person)) in rows.iter().enumerate() {
        if current_role != Some(*role) {
            current_role = Some(*role);
            lines.push(Line::from(Span::styled(
                role.label(),
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            )));
        }

        let id = person.selection_id(*role);
        let radio = if selected == Some(id.as_str()) {
            "(\u{2022}) "
        } else {
            "( ) "
        };
        let age = person
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let cpf = person.national_id.as_deref().unwrap_or("N/A");

        let mut name_style = Style::default().fg(theme.text);
        if person.is_minor {
            name_style = name_style.fg(theme.minor);
        } else if person.has_incomplete_identification {
            name_style = name_style.fg(theme.incomplete);
        }

        let mut spans = vec![
            Span::styled(format!("  {radio}"), Style::default().fg(theme.text)),
            Span::styled(person.name.clone(), name_style),
            Span::styled(
                format!(" (Idade: {age}) - CPF: {cpf}"),
                Style::default().fg(theme.dim),
            ),
        ];
        if person.is_minor {
            spans.push(Span::styled(" [menor]", Style::default().fg(theme.minor)));
        }
        if person.has_incomplete_identification {
            spans.push(Span::styled(
                " [qualificação incompleta]",
                Style::default().fg(theme.incomplete),
            ));
        }

        let mut line = Line::from(spans);
        if i == app.people_cursor {
            line = line.style(theme.highlight_style());
            cursor_line = lines.len();
        }
        lines.push(line);
    }

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nenhuma pessoa identificada.",
            Style::default().fg(theme.dim),
        )));
    }

    // keep the cursor row on screen
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(" Envolvidos ({}) ", rows.len())),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);
}
