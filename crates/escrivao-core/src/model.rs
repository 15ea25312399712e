//! Procedure and person records, and schema validation of the model's
//! initial-extraction answer.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::ServiceError;
use crate::identification::{IdentificationFields, IdentificationPolicy};

/// Fixed role categories a person can belong to, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Victim,
    Suspect,
    Witness,
    Counselor,
    Representative,
    Attorney,
    Other,
}

impl RoleCategory {
    pub fn all() -> &'static [RoleCategory] {
        &[
            RoleCategory::Victim,
            RoleCategory::Suspect,
            RoleCategory::Witness,
            RoleCategory::Counselor,
            RoleCategory::Representative,
            RoleCategory::Attorney,
            RoleCategory::Other,
        ]
    }

    /// Category name as used in the prompt and shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Victim => "Vítima(s)",
            Self::Suspect => "Infrator(es)/Suspeito(s)",
            Self::Witness => "Testemunha(s)",
            Self::Counselor => "Conselheiro(s)",
            Self::Representative => "Representante(s)",
            Self::Attorney => "Advogado(a)",
            Self::Other => "Outro(s)",
        }
    }

    /// Map a category name from the model's answer onto a fixed category.
    ///
    /// Matching ignores case and accents. Exact labels win; otherwise the
    /// more specific roles are tried first, so "Advogado do investigado" is
    /// an attorney and not a suspect.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded = fold(label.trim());
        if let Some(role) = Self::all().iter().find(|r| fold(r.label()) == folded) {
            return Some(*role);
        }

        const STEMS: &[(RoleCategory, &[&str])] = &[
            (RoleCategory::Attorney, &["advogad", "attorney"]),
            (RoleCategory::Representative, &["representante", "representative"]),
            (RoleCategory::Counselor, &["conselheir", "counselor"]),
            (RoleCategory::Witness, &["testemunha", "witness"]),
            (RoleCategory::Victim, &["vitima", "victim"]),
            (
                RoleCategory::Suspect,
                &["infrator", "suspeit", "investigad", "autor", "suspect"],
            ),
            (RoleCategory::Other, &["outro", "other"]),
        ];
        STEMS
            .iter()
            .find(|(_, stems)| stems.iter().any(|s| folded.contains(s)))
            .map(|(role, _)| *role)
    }
}

fn fold(s: &str) -> String {
    s.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
}

/// The police procedure the document belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Procedure {
    pub procedure_number: Option<String>,
    pub occurrence_numbers: Vec<String>,
    pub fact_date: Option<String>,
    pub fact_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub is_minor: bool,
    pub has_incomplete_identification: bool,
}

impl Person {
    /// Identifier used when selecting this person for an oitiva.
    pub fn selection_id(&self, role: RoleCategory) -> String {
        format!("{}: {}", role.label(), self.name)
    }
}

/// Validated answer to the initial-extraction prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitialExtraction {
    pub procedure: Procedure,
    pub people: BTreeMap<RoleCategory, Vec<Person>>,
}

impl InitialExtraction {
    /// Non-empty groups, in category order.
    pub fn groups(&self) -> impl Iterator<Item = (RoleCategory, &[Person])> {
        self.people
            .iter()
            .filter(|(_, people)| !people.is_empty())
            .map(|(role, people)| (*role, people.as_slice()))
    }

    pub fn person_count(&self) -> usize {
        self.people.values().map(Vec::len).sum()
    }
}

// ── Wire schema ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Scalar),
    Many(Vec<Scalar>),
}

#[derive(Deserialize)]
struct WireExtraction {
    procedimento: WireProcedure,
    #[serde(default)]
    pessoas: BTreeMap<String, Vec<WirePerson>>,
}

#[derive(Deserialize)]
struct WireProcedure {
    #[serde(default)]
    numero_procedimento: Option<Scalar>,
    #[serde(default)]
    numero_bo: Option<OneOrMany>,
    #[serde(default)]
    data_fato: Option<Scalar>,
    #[serde(default)]
    local_fato: Option<String>,
}

#[derive(Deserialize)]
struct WirePerson {
    #[serde(default)]
    nome: Option<String>,
    #[serde(default)]
    cpf: Option<Scalar>,
    #[serde(default)]
    endereco: Option<String>,
    #[serde(default)]
    idade: Option<Scalar>,
    #[serde(default)]
    telefone: Option<Scalar>,
    #[serde(default, rename = "isQualificacaoIncompleta")]
    incomplete_flag: Option<bool>,
}

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d{1,3})\b").unwrap());

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_age(raw: Option<Scalar>) -> Option<u32> {
    match raw? {
        Scalar::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Scalar::Text(s) => {
            let age = LEADING_NUMBER
                .captures(&s)
                .and_then(|c| c[1].parse::<u32>().ok());
            if age.is_none() && !s.trim().is_empty() {
                tracing::debug!(raw = %s, "unparseable age treated as unknown");
            }
            age
        }
    }
}

fn split_occurrences(raw: Option<OneOrMany>) -> Vec<String> {
    let items: Vec<String> = match raw {
        None => vec![],
        Some(OneOrMany::One(s)) => vec![s.into_text()],
        Some(OneOrMany::Many(list)) => list.into_iter().map(Scalar::into_text).collect(),
    };
    items
        .iter()
        .flat_map(|s| s.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl WirePerson {
    fn into_person(self, policy: &IdentificationPolicy) -> Person {
        let name = self.nome.map(|n| n.trim().to_string()).unwrap_or_default();
        let national_id = non_blank(self.cpf.map(Scalar::into_text));
        let address = non_blank(self.endereco);
        let age = parse_age(self.idade);
        let phone = non_blank(self.telefone.map(Scalar::into_text));

        let fields = IdentificationFields {
            name: &name,
            national_id: national_id.as_deref(),
            address: address.as_deref(),
            age,
            phone: phone.as_deref(),
        };
        let has_incomplete_identification = policy.is_incomplete(&fields, self.incomplete_flag);

        Person {
            is_minor: age.is_some_and(|a| a < 18),
            has_incomplete_identification,
            name,
            national_id,
            address,
            age,
            phone,
        }
    }
}

/// Validate the model's initial-extraction answer.
///
/// Fails with [`ServiceError::NotAPoliceDocument`] when the model answered
/// with its `{"error": ...}` escape hatch and with
/// [`ServiceError::MalformedResponse`] on any other shape mismatch.
pub fn parse_initial_extraction(
    raw: &str,
    policy: &IdentificationPolicy,
) -> Result<InitialExtraction, ServiceError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ServiceError::MalformedResponse(format!("JSON inválido: {e}")))?;

    if let Some(obj) = value.as_object()
        && !obj.contains_key("procedimento")
        && let Some(message) = obj.get("error").and_then(|e| e.as_str())
    {
        return Err(ServiceError::NotAPoliceDocument(message.to_string()));
    }

    let wire: WireExtraction = serde_json::from_value(value)
        .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

    let procedure = Procedure {
        procedure_number: non_blank(wire.procedimento.numero_procedimento.map(Scalar::into_text)),
        occurrence_numbers: split_occurrences(wire.procedimento.numero_bo),
        fact_date: non_blank(wire.procedimento.data_fato.map(Scalar::into_text)),
        fact_location: non_blank(wire.procedimento.local_fato),
    };

    let mut people: BTreeMap<RoleCategory, Vec<Person>> = BTreeMap::new();
    for (label, group) in wire.pessoas {
        let role = RoleCategory::from_label(&label).unwrap_or_else(|| {
            tracing::warn!(label = %label, "unknown role category, filed under Outro(s)");
            RoleCategory::Other
        });
        people
            .entry(role)
            .or_default()
            .extend(group.into_iter().map(|p| p.into_person(policy)));
    }

    Ok(InitialExtraction { procedure, people })
}
