//! Prompt templates sent to the generative API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Fixed prompt used to check that a credential works.
pub const API_KEY_TEST_PROMPT: &str = "Faça um teste simples respondendo apenas com 'OK'.";

/// Which report template to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Pending-actions report: orders from the chief and their status.
    Pendencias,
    /// Final investigative report.
    Final,
}

impl ReportKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pendencias => "Relatório de Pendências",
            Self::Final => "Relatório Final",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Pendencias => "pendencias",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendencias" | "pendências" => Ok(Self::Pendencias),
            "final" => Ok(Self::Final),
            other => Err(format!(
                "unknown report kind '{other}' (expected 'pendencias' or 'final')"
            )),
        }
    }
}

/// Parameters of an oitiva question-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OitivaOptions {
    pub interview_type: String,
    pub question_count: u32,
    /// Who will be heard, as `"<role>: <name>"`.
    pub person_descriptor: String,
}

impl OitivaOptions {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.question_count < 1 {
            return Err(ServiceError::InvalidOptions(
                "Por favor, insira uma quantidade de perguntas válida.".into(),
            ));
        }
        if self.person_descriptor.trim().is_empty() {
            return Err(ServiceError::InvalidOptions(
                "Por favor, selecione uma pessoa da lista para gerar as perguntas.".into(),
            ));
        }
        Ok(())
    }
}

pub fn initial_extraction_prompt(text: &str) -> String {
    format!(
        r#"
    Analise o seguinte texto extraído de um documento policial e retorne as informações em formato JSON.
    O JSON deve ter duas chaves principais: "procedimento" e "pessoas".

    1. Na chave "procedimento", extraia:
       - "numero_procedimento": o número do Inquérito (IPL), Auto de Prisão em Flagrante (APDF) ou similar. Se não houver, use null.
       - "numero_bo": o número do Boletim de Ocorrência (BO). Se houver mais de um, separe-os por vírgula.
       - "data_fato": a data em que o evento ocorreu.
       - "local_fato": o local do evento.
       Se o documento for APENAS um BO sem IPL, "numero_procedimento" será null.
       Se não for um documento policial, retorne apenas {{"error": "o arquivo .pdf não é um inquérito / boletim policial"}}.

    2. Na chave "pessoas", crie listas para cada categoria de envolvido encontrada: "Vítima(s)", "Infrator(es)/Suspeito(s)", "Testemunha(s)", "Conselheiro(s)", "Representante(s)", "Advogado(a)", "Outro(s)".
       - Para cada pessoa, crie um objeto com: "nome", "cpf", "endereco", "idade", "telefone". Se a informação não existir, use null.
       - "idade" deve ser um número inteiro de anos.
       - Adicione a chave booleana "isMenor": true se a idade for menor que 18.
       - Adicione a chave booleana "isQualificacaoIncompleta": true se a pessoa tiver apenas o primeiro nome, um apelido, ou se faltar a maioria dos dados de qualificação.

    NÃO inclua categorias sem ninguém. O JSON deve ser limpo e válido.

    Texto para análise:
    ---
    {text}
    ---
    "#
    )
}

pub fn report_prompt(kind: ReportKind, text: &str) -> String {
    match kind {
        ReportKind::Pendencias => pendencias_prompt(text),
        ReportKind::Final => final_report_prompt(text),
    }
}

fn pendencias_prompt(text: &str) -> String {
    format!(
        r#"
    Com base no texto completo do inquérito policial fornecido, atue como um analista investigativo.
    Identifique todas as diligências e ordens dadas pelo Delegado de Polícia (geralmente em despachos) e avalie o status de cumprimento de cada uma.

    Liste cada ordem e seu status como "total" (completamente cumprida), "parcial" (iniciada mas não finalizada) ou "inexistente" (nenhuma ação tomada).

    Exemplo:
    - Ordem: Intimar e ouvir Vítima e Testemunha.
      - Status Vítima: Parcial (intimada, mas não ouvida).
      - Status Testemunha: Total (intimada e ouvida).
    - Ordem: Apreender objetos e solicitar perícia.
      - Status Apreensão: Inexistente.
      - Status Perícia: Inexistente.

    Gere um relatório de pendências claro e objetivo.

    Texto para análise:
    ---
    {text}
    ---
    "#
    )
}

fn final_report_prompt(text: &str) -> String {
    format!(
        r#"
    Atue como um Escrivão de Polícia experiente. Com base em todo o conteúdo do inquérito policial fornecido, elabore um Relatório Final de Investigação conciso e técnico.
    O relatório não deve exceder 90 linhas e deve ter as seguintes seções obrigatórias:

    1. DOS FATOS E CIRCUNSTÂNCIAS APURADAS: resumo objetivo do ocorrido.
    2. DOS ELEMENTOS PROBATÓRIOS: principais provas coletadas (depoimentos, laudos, etc.).
    3. DA ADEQUAÇÃO AO TIPO PENAL: com base nas provas, o crime cometido.
    4. DA AUTORIA, DA CLASSIFICAÇÃO PENAL E DO INDICIAMENTO: provável(is) autor(es) e justificativa do indiciamento.
    5. DA CONCLUSÃO: encerramento formal, sugerindo o encaminhamento dos autos ao Judiciário.

    Seja direto e atenha-se aos fatos presentes no texto.

    Texto para análise:
    ---
    {text}
    ---
    "#
    )
}

pub fn oitivas_prompt(text: &str, options: &OitivaOptions) -> String {
    let OitivaOptions {
        interview_type,
        question_count,
        person_descriptor,
    } = options;
    format!(
        r#"
    Você é um assistente de um Escrivão de Polícia. Gere perguntas para uma oitiva policial com base no documento fornecido.

    Informações para a geração das perguntas:
    - Procedimento: Inquérito Policial (contexto abaixo)
    - Pessoa a ser ouvida: {person_descriptor}
    - Tipo de Oitiva: {interview_type}
    - Quantidade de perguntas: {question_count}

    As perguntas devem ser:
    1. Enumeradas e em negrito.
    2. Finalizadas com quebra de linha e parágrafo.
    3. Pertinentes ao contexto do documento, buscando elucidar os fatos.
    4. Formuladas respeitando o Código de Processo Penal e a Constituição Federal.
    5. Focadas em detalhes como local, data, pessoas presentes, relação entre os envolvidos e outros pontos-chave da investigação.

    Gere as {question_count} perguntas para a oitiva de {person_descriptor}.

    Contexto do documento:
    ---
    {text}
    ---
    "#
    )
}
