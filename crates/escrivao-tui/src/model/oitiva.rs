use escrivao_core::OitivaOptions;

/// Kinds of hearing offered in the oitiva form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewType {
    Victim,
    Witness,
    Suspect,
    Informant,
    TutelaryCounselor,
    Other,
}

impl InterviewType {
    pub fn all() -> &'static [InterviewType] {
        &[
            InterviewType::Victim,
            InterviewType::Witness,
            InterviewType::Suspect,
            InterviewType::Informant,
            InterviewType::TutelaryCounselor,
            InterviewType::Other,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Victim => "Vítima",
            Self::Witness => "Testemunha",
            Self::Suspect => "Investigado/Suspeito",
            Self::Informant => "Informante",
            Self::TutelaryCounselor => "Conselheiro Tutelar",
            Self::Other => "Outro",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

pub const DEFAULT_QUESTION_COUNT: &str = "10";

/// Current values of the oitiva controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OitivaForm {
    pub interview_type: InterviewType,
    /// Raw text of the count field; validated on submit.
    pub question_count: String,
    /// Selection identifier (`"<role>: <name>"`) of the chosen person.
    pub selected_person: Option<String>,
}

impl Default for OitivaForm {
    fn default() -> Self {
        Self {
            interview_type: InterviewType::Victim,
            question_count: DEFAULT_QUESTION_COUNT.to_string(),
            selected_person: None,
        }
    }
}

impl OitivaForm {
    /// Build the request, or the message to show when the form is incomplete.
    pub fn to_options(&self) -> Result<OitivaOptions, String> {
        let count = self
            .question_count
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| "Por favor, insira uma quantidade de perguntas válida.".to_string())?;
        let person = self.selected_person.clone().ok_or_else(|| {
            "Por favor, selecione uma pessoa da lista para gerar as perguntas.".to_string()
        })?;
        Ok(OitivaOptions {
            interview_type: self.interview_type.label().to_string(),
            question_count: count,
            person_descriptor: person,
        })
    }
}
