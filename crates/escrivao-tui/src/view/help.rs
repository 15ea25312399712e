use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(64, 33, area);

    let lines = vec![
        Line::from(Span::styled(
            " Atalhos de teclado ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Documento", theme),
        key_line("u", "Informar URL/caminho do PDF", theme),
        key_line("v", "Verificar e extrair dados", theme),
        Line::from(""),
        section_header("Envolvidos", theme),
        key_line("j / \u{2193}", "Próxima pessoa", theme),
        key_line("k / \u{2191}", "Pessoa anterior", theme),
        key_line("Space / Enter", "Selecionar para oitiva", theme),
        Line::from(""),
        section_header("Geração", theme),
        key_line("p", "Relatório de pendências", theme),
        key_line("f", "Relatório final", theme),
        key_line("t", "Alternar tipo de oitiva", theme),
        key_line("n", "Quantidade de perguntas", theme),
        key_line("o", "Gerar perguntas de oitiva", theme),
        key_line("Ctrl+d / PgDn", "Rolar saída para baixo", theme),
        key_line("Ctrl+u / PgUp", "Rolar saída para cima", theme),
        key_line("e", "Salvar saída em arquivo", theme),
        Line::from(""),
        section_header("Chave API", theme),
        key_line("c", "Mostrar/ocultar painel", theme),
        key_line("K", "Editar e testar chave", theme),
        Line::from(""),
        section_header("Geral", theme),
        key_line("?", "Mostrar/ocultar ajuda", theme),
        key_line("Esc", "Voltar / cancelar edição", theme),
        key_line("q", "Sair", theme),
        key_line("Ctrl+c", "Forçar saída", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Ajuda "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
