use std::fmt;

use escrivao_core::{InitialExtraction, OitivaOptions, Reply, ReportKind};

/// Commands sent from the TUI to the backend, one per service operation.
#[derive(Clone, PartialEq, Eq)]
pub enum BackendCommand {
    VerifyAndProcessDocument,
    GenerateReport { kind: ReportKind },
    GenerateOitivas { options: OitivaOptions },
    SaveCredential { key: String },
    TestApiKey,
}

impl fmt::Debug for BackendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerifyAndProcessDocument => f.write_str("VerifyAndProcessDocument"),
            Self::GenerateReport { kind } => {
                f.debug_struct("GenerateReport").field("kind", kind).finish()
            }
            Self::GenerateOitivas { options } => f
                .debug_struct("GenerateOitivas")
                .field("options", options)
                .finish(),
            Self::SaveCredential { .. } => f
                .debug_struct("SaveCredential")
                .field("key", &"***")
                .finish(),
            Self::TestApiKey => f.write_str("TestApiKey"),
        }
    }
}

/// Results flowing from the backend task back to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Verified(Reply<InitialExtraction>),
    ReportGenerated {
        kind: ReportKind,
        reply: Reply<String>,
    },
    OitivasGenerated(Reply<String>),
    /// `result` carries the message to show on failure.
    CredentialSaved {
        key: String,
        result: Result<(), String>,
    },
    ApiKeyTested(Reply<()>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_credential() {
        let cmd = BackendCommand::SaveCredential {
            key: "AIzaSecret".into(),
        };
        let shown = format!("{cmd:?}");
        assert!(!shown.contains("AIzaSecret"));
        assert!(shown.contains("***"));
    }
}
