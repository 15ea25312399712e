use thiserror::Error;

/// Failure of one of the orchestrator operations.
///
/// Display strings are user-facing (pt-BR) and are what ends up in the
/// `error` field of a failed [`Reply`](crate::Reply).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("A aba ativa não é um arquivo .pdf")]
    NotAPdf,
    #[error("Não foi possível extrair conteúdo do PDF. Pode estar vazio ou ser uma imagem.")]
    EmptyDocument,
    #[error("resposta da API em formato inesperado: {0}")]
    MalformedResponse(String),
    #[error("Nenhum conteúdo de PDF carregado. Verifique um arquivo primeiro.")]
    NoDocumentLoaded,
    #[error("Chave API do Gemini não configurada.")]
    MissingCredential,
    /// Non-success HTTP status from the generative API.
    #[error("{message}")]
    ApiHttp { status: u16, message: String },
    /// The model reported that the document is not a police record.
    #[error("{0}")]
    NotAPoliceDocument(String),
    #[error("{0}")]
    InvalidOptions(String),
    #[error("falha na extração de texto: {0}")]
    Extraction(String),
    #[error("erro de rede: {0}")]
    Network(String),
    #[error("falha no armazenamento local: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        // The API key travels in the query string; never let it reach a message.
        ServiceError::Network(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_http_displays_service_message() {
        let err = ServiceError::ApiHttp {
            status: 400,
            message: "API key not valid".into(),
        };
        assert_eq!(err.to_string(), "API key not valid");
    }

    #[test]
    fn precondition_messages_are_user_facing() {
        assert_eq!(
            ServiceError::NotAPdf.to_string(),
            "A aba ativa não é um arquivo .pdf"
        );
        assert!(ServiceError::NoDocumentLoaded
            .to_string()
            .starts_with("Nenhum conteúdo de PDF"));
    }
}
