use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use escrivao_core::config_file::{self, ConfigFile};
use escrivao_core::{
    ActiveTab, Config, InitialExtraction, OitivaOptions, Operation, Orchestrator, Reply,
    ReportKind,
};
use escrivao_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// Escrivão: extract data from police documents and draft reports with Gemini
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print the reply envelope as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Read configuration from this TOML file instead of the default cascade
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the procedure data and people involved from a PDF
    Verify {
        /// http(s) URL, file:// URL or local path of the PDF
        url: String,
    },

    /// Generate a report from a PDF
    Report {
        /// http(s) URL, file:// URL or local path of the PDF
        url: String,

        /// Report template: pendencias or final
        #[arg(long, default_value = "final")]
        kind: ReportKind,
    },

    /// Generate hearing (oitiva) questions for one person in a PDF
    Oitivas {
        /// http(s) URL, file:// URL or local path of the PDF
        url: String,

        /// Who will be heard, as "<role>: <name>"
        #[arg(long)]
        person: String,

        /// Kind of hearing (e.g. Vítima, Testemunha)
        #[arg(long, default_value = "Vítima")]
        interview_type: String,

        /// Number of questions to generate
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },

    /// Save the Gemini API key and check that it works
    SetKey {
        /// The API key
        key: String,
    },

    /// Check that the stored API key works
    TestKey,

    /// Write the effective configuration to the platform config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let file = match &cli.config {
        Some(path) => config_file::load_from_path(path).ok_or_else(|| {
            anyhow::anyhow!("could not read config file {}", path.display())
        })?,
        None => config_file::load_config(),
    };
    let mut config = Config::from_file(&file);
    config.apply_env(|k| std::env::var(k).ok());

    let color = ColorMode(!cli.no_color && !cli.json);
    let url = match &cli.command {
        Command::Verify { url } | Command::Report { url, .. } | Command::Oitivas { url, .. } => {
            Some(url.clone())
        }
        Command::SetKey { .. } | Command::TestKey | Command::InitConfig { .. } => None,
    };
    let tab = Arc::new(ActiveTab::new(url));
    let orchestrator = escrivao_core::build_orchestrator(
        &config,
        tab,
        Arc::new(MupdfBackend::from_config(file.pdf.as_ref())),
    )?;

    let runner = Runner {
        orchestrator,
        json: cli.json,
        color,
    };

    let ok = match cli.command {
        Command::Verify { .. } => runner.verify().await?,
        Command::Report { kind, .. } => runner.report(kind).await?,
        Command::Oitivas {
            person,
            interview_type,
            count,
            ..
        } => {
            runner
                .oitivas(OitivaOptions {
                    interview_type,
                    question_count: count,
                    person_descriptor: person,
                })
                .await?
        }
        Command::SetKey { key } => runner.set_key(&key).await?,
        Command::TestKey => runner.test_key().await?,
        Command::InitConfig { force } => return init_config(&config, &file, force, color),
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_config(
    config: &Config,
    file: &ConfigFile,
    force: bool,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let path = config_file::config_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
    if path.exists() && !force {
        output::print_failure(
            &mut std::io::stderr(),
            &format!("{} já existe (use --force para sobrescrever)", path.display()),
            color,
        )?;
        return Ok(ExitCode::FAILURE);
    }

    let mut out = config.to_file();
    out.display = file.display.clone();
    out.pdf = file.pdf.clone();
    let written = config_file::save_config(&out).map_err(|e| anyhow::anyhow!(e))?;
    output::print_success(
        &mut std::io::stdout(),
        &format!("Configuração salva em {}", written.display()),
        color,
    )?;
    Ok(ExitCode::SUCCESS)
}

/// One CLI invocation: the service plus how to present its replies.
struct Runner {
    orchestrator: Orchestrator,
    json: bool,
    color: ColorMode,
}

impl Runner {
    async fn verify(&self) -> anyhow::Result<bool> {
        let reply = self.extract().await?;
        self.emit(&reply, |w, data, color| output::print_extraction(w, data, color))
    }

    async fn report(&self, kind: ReportKind) -> anyhow::Result<bool> {
        if !self.load_document().await? {
            return Ok(false);
        }
        let result = self
            .with_spinner(
                &format!("Gerando {}...", kind.label()),
                self.orchestrator.generate_report(kind),
            )
            .await?;
        let reply = Reply::from_result(Operation::GenerateReport, result);
        self.emit(&reply, |w, text, color| {
            output::print_generated(w, kind.label(), text, color)
        })
    }

    async fn oitivas(&self, options: OitivaOptions) -> anyhow::Result<bool> {
        if let Err(e) = options.validate() {
            let reply: Reply<String> = Reply::from_result(Operation::GenerateOitivas, Err(e));
            return self.emit(&reply, |_, _, _| Ok(()));
        }
        if !self.load_document().await? {
            return Ok(false);
        }
        let result = self
            .with_spinner("Gerando Oitivas...", self.orchestrator.generate_oitivas(&options))
            .await?;
        let reply = Reply::from_result(Operation::GenerateOitivas, result);
        let title = format!("Oitiva ({}) - {}", options.interview_type, options.person_descriptor);
        self.emit(&reply, |w, text, color| {
            output::print_generated(w, &title, text, color)
        })
    }

    async fn set_key(&self, key: &str) -> anyhow::Result<bool> {
        if let Err(e) = self.orchestrator.save_credential(key) {
            let reply: Reply<()> = Reply::Failure {
                error: e.to_string(),
            };
            return self.emit(&reply, |_, _, _| Ok(()));
        }
        if !self.json {
            output::print_success(&mut std::io::stderr(), "Chave API salva. Testando...", self.color)?;
        }
        self.test_key().await
    }

    async fn test_key(&self) -> anyhow::Result<bool> {
        let result = self
            .with_spinner("Testando chave API...", self.orchestrator.test_api_key())
            .await?;
        let reply = Reply::from_result(Operation::TestApiKey, result);
        self.emit(&reply, |_, _, _| Ok(()))
    }

    async fn extract(&self) -> anyhow::Result<Reply<InitialExtraction>> {
        let result = self
            .with_spinner(
                "Extraindo e analisando o documento...",
                self.orchestrator.verify_and_process_document(),
            )
            .await?;
        Ok(Reply::from_result(Operation::VerifyAndProcessDocument, result))
    }

    /// Verify the document so a session exists for the follow-up request.
    ///
    /// A failed analysis is not fatal as long as the text was extracted;
    /// the report and oitiva prompts only need the session.
    async fn load_document(&self) -> anyhow::Result<bool> {
        let reply = self.extract().await?;
        match reply {
            Reply::Success { .. } => Ok(true),
            Reply::Failure { error } if self.orchestrator.session().is_some() => {
                tracing::warn!(%error, "document analysis failed, continuing with extracted text");
                if !self.json {
                    output::print_warning(&mut std::io::stderr(), &error, self.color)?;
                }
                Ok(true)
            }
            failure => {
                self.emit(&failure, |_, _, _| Ok(()))?;
                Ok(false)
            }
        }
    }

    /// Print `reply` as JSON or through `render`; returns whether it succeeded.
    fn emit<T: Serialize>(
        &self,
        reply: &Reply<T>,
        render: impl FnOnce(&mut dyn Write, &T, ColorMode) -> std::io::Result<()>,
    ) -> anyhow::Result<bool> {
        let mut stdout = std::io::stdout();
        if self.json {
            output::print_json(&mut stdout, reply)?;
            return Ok(reply.is_success());
        }
        match reply {
            Reply::Success { message, data } => {
                output::print_success(&mut std::io::stderr(), message, self.color)?;
                render(&mut stdout, data, self.color)?;
                Ok(true)
            }
            Reply::Failure { error } => {
                output::print_failure(&mut std::io::stderr(), error, self.color)?;
                Ok(false)
            }
        }
    }

    /// Show a spinner on stderr while `fut` runs.
    async fn with_spinner<F: Future>(&self, message: &str, fut: F) -> anyhow::Result<F::Output> {
        let bar = if self.json {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        let out = fut.await;
        bar.finish_and_clear();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escrivao_core::credential::MemoryStore;
    use escrivao_core::mock::{MockApi, MockExtractor};

    fn runner(api: Arc<MockApi>, extractor: Arc<MockExtractor>) -> Runner {
        let tab = Arc::new(ActiveTab::new(Some("file:///tmp/ipl.pdf".into())));
        let orchestrator =
            Orchestrator::new(tab, extractor, api, Arc::new(MemoryStore::new()));
        orchestrator.save_credential("k").unwrap();
        Runner {
            orchestrator,
            json: true,
            color: ColorMode(false),
        }
    }

    #[tokio::test]
    async fn invalid_oitiva_request_touches_nothing() {
        let api = Arc::new(MockApi::answering("{}"));
        let extractor = Arc::new(MockExtractor::with_text(["texto"]));
        let runner = runner(api.clone(), extractor.clone());

        for options in [
            OitivaOptions {
                interview_type: "Vítima".into(),
                question_count: 0,
                person_descriptor: "Vítima(s): Ana".into(),
            },
            OitivaOptions {
                interview_type: "Vítima".into(),
                question_count: 5,
                person_descriptor: "  ".into(),
            },
        ] {
            assert!(!runner.oitivas(options).await.unwrap());
        }
        assert_eq!(api.call_count(), 0);
        assert_eq!(extractor.call_count(), 0);
    }

    #[test]
    fn zero_question_count_rejected_by_parser() {
        let parsed = Cli::try_parse_from([
            "escrivao", "oitivas", "a.pdf", "--person", "Vítima(s): Ana", "--count", "0",
        ]);
        assert!(parsed.is_err());
    }
}
