use std::io::Write;

use escrivao_core::{InitialExtraction, Reply};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

const UNKNOWN: &str = "Não identificado";

/// Print the reply envelope as pretty JSON.
pub fn print_json<T: Serialize>(w: &mut dyn Write, reply: &Reply<T>) -> anyhow::Result<()> {
    writeln!(w, "{}", serde_json::to_string_pretty(reply)?)?;
    Ok(())
}

pub fn print_success(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "\u{2713}".green(), message.green())
    } else {
        writeln!(w, "{message}")
    }
}

pub fn print_failure(w: &mut dyn Write, error: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "ERRO:".bold().red(), error)
    } else {
        writeln!(w, "ERRO: {error}")
    }
}

pub fn print_warning(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "AVISO:".yellow(), message)
    } else {
        writeln!(w, "AVISO: {message}")
    }
}

/// Print the procedure block followed by the people grouped by role.
pub fn print_extraction(
    w: &mut dyn Write,
    extraction: &InitialExtraction,
    color: ColorMode,
) -> std::io::Result<()> {
    let proc = &extraction.procedure;
    let occurrences = if proc.occurrence_numbers.is_empty() {
        None
    } else {
        Some(proc.occurrence_numbers.join(", "))
    };

    print_heading(w, "Procedimento", color)?;
    print_field(w, "Número", proc.procedure_number.as_deref(), color)?;
    print_field(w, "Boletim de Ocorrência", occurrences.as_deref(), color)?;
    print_field(w, "Data do Fato", proc.fact_date.as_deref(), color)?;
    print_field(w, "Local do Fato", proc.fact_location.as_deref(), color)?;

    for (role, people) in extraction.groups() {
        writeln!(w)?;
        print_heading(w, role.label(), color)?;
        for person in people {
            let age = person
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let cpf = person.national_id.as_deref().unwrap_or("N/A");

            let mut flags = Vec::new();
            if person.is_minor {
                flags.push("menor");
            }
            if person.has_incomplete_identification {
                flags.push("qualificação incompleta");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };

            if color.enabled() {
                let name = if person.is_minor {
                    person.name.magenta().bold().to_string()
                } else if person.has_incomplete_identification {
                    person.name.yellow().to_string()
                } else {
                    person.name.cyan().to_string()
                };
                writeln!(
                    w,
                    "  - {} {}{}",
                    name,
                    format!("(Idade: {age}) - CPF: {cpf}").dimmed(),
                    flags.yellow()
                )?;
            } else {
                writeln!(w, "  - {} (Idade: {age}) - CPF: {cpf}{flags}", person.name)?;
            }
        }
    }

    if extraction.person_count() == 0 {
        writeln!(w)?;
        writeln!(w, "Nenhuma pessoa identificada.")?;
    }
    Ok(())
}

/// Generated text as returned by the model, framed by a separator.
pub fn print_generated(
    w: &mut dyn Write,
    title: &str,
    text: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.dimmed())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.dimmed())?;
    } else {
        writeln!(w, "{sep}")?;
        writeln!(w, "{title}")?;
        writeln!(w, "{sep}")?;
    }
    writeln!(w)?;
    writeln!(w, "{}", text.trim_end())?;
    Ok(())
}

fn print_heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold().underline())
    } else {
        writeln!(w, "{title}")
    }
}

fn print_field(
    w: &mut dyn Write,
    label: &str,
    value: Option<&str>,
    color: ColorMode,
) -> std::io::Result<()> {
    match (value, color.enabled()) {
        (Some(v), true) => writeln!(w, "  {}: {}", label.bold(), v),
        (None, true) => writeln!(w, "  {}: {}", label.bold(), UNKNOWN.dimmed()),
        (Some(v), false) => writeln!(w, "  {label}: {v}"),
        (None, false) => writeln!(w, "  {label}: {UNKNOWN}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrivao_core::{Person, Procedure, RoleCategory};
    use std::collections::BTreeMap;

    fn render(extraction: &InitialExtraction) -> String {
        let mut buf = Vec::new();
        print_extraction(&mut buf, extraction, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn missing_fields_show_placeholder() {
        let text = render(&InitialExtraction::default());
        assert!(text.contains("Número: Não identificado"));
        assert!(text.contains("Nenhuma pessoa identificada."));
    }

    #[test]
    fn people_are_grouped_with_flags() {
        let mut people = BTreeMap::new();
        people.insert(
            RoleCategory::Victim,
            vec![Person {
                name: "Ana".into(),
                national_id: None,
                address: None,
                age: Some(12),
                phone: None,
                is_minor: true,
                has_incomplete_identification: true,
            }],
        );
        let extraction = InitialExtraction {
            procedure: Procedure {
                occurrence_numbers: vec!["1/2024".into(), "2/2024".into()],
                ..Procedure::default()
            },
            people,
        };
        let text = render(&extraction);
        assert!(text.contains("Boletim de Ocorrência: 1/2024, 2/2024"));
        assert!(text.contains("Vítima(s)"));
        assert!(text.contains("  - Ana (Idade: 12) - CPF: N/A [menor, qualificação incompleta]"));
    }

    #[test]
    fn failure_envelope_as_json() {
        let reply: Reply<String> = Reply::Failure {
            error: "A aba ativa não é um arquivo .pdf".into(),
        };
        let mut buf = Vec::new();
        print_json(&mut buf, &reply).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "A aba ativa não é um arquivo .pdf");
    }
}
