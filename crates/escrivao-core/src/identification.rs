use serde::{Deserialize, Serialize};

/// Decides when a person's identification counts as incomplete.
///
/// The heuristic ("only a first name or nickname, or most
/// identifying data missing") has no exact threshold, so every knob is
/// configurable through the `[identification]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationPolicy {
    /// Incomplete when more than this many of CPF, address, age and phone
    /// are missing.
    pub max_missing_fields: usize,
    /// Treat a single-word name (first name or nickname) as incomplete.
    pub single_name_is_incomplete: bool,
    /// Also accept the model's own `isQualificacaoIncompleta` verdict.
    pub honor_model_flag: bool,
}

impl Default for IdentificationPolicy {
    fn default() -> Self {
        Self {
            max_missing_fields: 2,
            single_name_is_incomplete: true,
            honor_model_flag: true,
        }
    }
}

/// The identifying fields the policy looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentificationFields<'a> {
    pub name: &'a str,
    pub national_id: Option<&'a str>,
    pub address: Option<&'a str>,
    pub age: Option<u32>,
    pub phone: Option<&'a str>,
}

impl IdentificationFields<'_> {
    fn missing_count(&self) -> usize {
        let blank = |v: Option<&str>| v.is_none_or(|s| s.trim().is_empty());
        [
            blank(self.national_id),
            blank(self.address),
            self.age.is_none(),
            blank(self.phone),
        ]
        .into_iter()
        .filter(|missing| *missing)
        .count()
    }
}

impl IdentificationPolicy {
    pub fn is_incomplete(&self, fields: &IdentificationFields<'_>, model_flag: Option<bool>) -> bool {
        let name = fields.name.trim();
        if name.is_empty() {
            return true;
        }
        if self.single_name_is_incomplete && name.split_whitespace().count() < 2 {
            return true;
        }
        if fields.missing_count() > self.max_missing_fields {
            return true;
        }
        self.honor_model_flag && model_flag == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> IdentificationFields<'static> {
        IdentificationFields {
            name: "Maria da Silva",
            national_id: Some("123.456.789-00"),
            address: Some("Rua A, 10"),
            age: Some(34),
            phone: Some("(11) 99999-0000"),
        }
    }

    #[test]
    fn fully_identified_is_complete() {
        assert!(!IdentificationPolicy::default().is_incomplete(&full(), None));
    }

    #[test]
    fn nickname_only_is_incomplete_by_default() {
        let fields = IdentificationFields {
            name: "Neguinho",
            ..full()
        };
        let policy = IdentificationPolicy::default();
        assert!(policy.is_incomplete(&fields, None));

        let lenient = IdentificationPolicy {
            single_name_is_incomplete: false,
            ..policy
        };
        assert!(!lenient.is_incomplete(&fields, None));
    }

    // The default threshold ("missing most" = 3 of 4) is a policy decision,
    // pinned here so a change is deliberate.
    #[test]
    fn default_threshold_is_three_of_four_missing() {
        let policy = IdentificationPolicy::default();
        let two_missing = IdentificationFields {
            national_id: None,
            phone: Some("  "),
            ..full()
        };
        assert!(!policy.is_incomplete(&two_missing, None));

        let three_missing = IdentificationFields {
            address: None,
            ..two_missing
        };
        assert!(policy.is_incomplete(&three_missing, None));
    }

    #[test]
    fn model_flag_only_counts_when_honored() {
        let policy = IdentificationPolicy::default();
        assert!(policy.is_incomplete(&full(), Some(true)));

        let strict = IdentificationPolicy {
            honor_model_flag: false,
            ..policy
        };
        assert!(!strict.is_incomplete(&full(), Some(true)));
    }

    #[test]
    fn blank_name_is_always_incomplete() {
        let policy = IdentificationPolicy {
            max_missing_fields: 4,
            single_name_is_incomplete: false,
            honor_model_flag: false,
        };
        let fields = IdentificationFields { name: " ", ..full() };
        assert!(policy.is_incomplete(&fields, None));
    }
}
