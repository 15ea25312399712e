//! Uniform success/failure envelope returned across the service boundary.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::ServiceError;

/// The four operations front ends can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    VerifyAndProcessDocument,
    GenerateReport,
    GenerateOitivas,
    TestApiKey,
}

impl Operation {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::VerifyAndProcessDocument => "PDF processado. Dados extraídos!",
            Self::GenerateReport | Self::GenerateOitivas => "Resposta gerada!",
            Self::TestApiKey => "Chave API configurada e funcionando!",
        }
    }

    /// Message shown for a failed operation.
    ///
    /// Precondition failures are reported as-is; anything that went wrong
    /// further in gets the operation's prefix.
    pub fn failure_message(self, err: &ServiceError) -> String {
        match err {
            ServiceError::NotAPdf
            | ServiceError::EmptyDocument
            | ServiceError::NoDocumentLoaded
            | ServiceError::InvalidOptions(_) => err.to_string(),
            _ => match self {
                Self::VerifyAndProcessDocument => format!("Falha ao processar o PDF: {err}"),
                Self::GenerateReport | Self::GenerateOitivas => {
                    format!("Erro na API do Gemini: {err}")
                }
                Self::TestApiKey => err.to_string(),
            },
        }
    }
}

/// Tagged result of an operation: `{success: true, message, data}` or
/// `{success: false, error}` once serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Success { message: String, data: T },
    Failure { error: String },
}

impl<T> Reply<T> {
    pub fn from_result(op: Operation, result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(data) => Reply::Success {
                message: op.success_message().to_string(),
                data,
            },
            Err(err) => {
                tracing::debug!(operation = ?op, error = %err, "operation failed");
                Reply::Failure {
                    error: op.failure_message(&err),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success { .. })
    }
}

impl<T: Serialize> Serialize for Reply<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reply::Success { message, data } => {
                let mut s = serializer.serialize_struct("Reply", 3)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("message", message)?;
                s.serialize_field("data", data)?;
                s.end()
            }
            Reply::Failure { error } => {
                let mut s = serializer.serialize_struct("Reply", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}
