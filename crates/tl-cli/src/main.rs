//! tl: translate English into Chinese from the terminal.

mod input;
mod render;
mod spinner;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;
use tl_api::OpenAiProvider;
use tl_config::{CliOverrides, TlConfig};
use tl_core::{Translator, TranslatorOptions};
use tl_types::{TlError, Usage};
use tokio_util::sync::CancellationToken;

use crate::input::Source;
use crate::render::Renderer;
use crate::spinner::Spinner;

/// Exit status when there is no input to translate.
const EXIT_USAGE: u8 = 2;
/// Exit status after Ctrl+C (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(
    name = "tl",
    version,
    about = "Translate English words, phrases, sentences and paragraphs into Chinese",
    after_help = "Use `-` to read the text from stdin; finish with EOF (Ctrl+D)."
)]
struct Cli {
    /// Texts to translate, one at a time
    texts: Vec<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature for the translation
    #[arg(long)]
    temperature: Option<f32>,

    /// API root, e.g. https://api.openai.com/v1 (overrides OPENAI_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// API key (overrides OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Skip classification and use the generic prompt
    #[arg(long)]
    no_classify: bool,

    /// Seconds allowed per text, classification included
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print token usage to stderr when done
    #[arg(long)]
    usage: bool,

    /// Show the resolved configuration, classification and debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) if matches!(e.downcast_ref::<TlError>(), Some(TlError::Cancelled)) => {
            eprintln!();
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(mut cli: Cli) -> Result<ExitCode> {
    let stdin_is_terminal = io::stdin().is_terminal();
    let Some(source) = input::source(std::mem::take(&mut cli.texts), stdin_is_terminal) else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(EXIT_USAGE));
    };

    let config = TlConfig::load(CliOverrides {
        api_key: cli.api_key,
        base_url: cli.base_url,
        model: cli.model,
        temperature: cli.temperature,
        classify: cli.no_classify.then_some(false),
        timeout_secs: cli.timeout,
    })
    .context("Failed to load configuration")?;
    if cli.verbose {
        eprintln!("{config}");
    }

    let provider = OpenAiProvider::new(config.require_api_key()?, &config.base_url)
        .context("Failed to create API client")?;
    let translator = Translator::new(
        Arc::new(provider),
        TranslatorOptions {
            model: config.model.clone(),
            temperature: config.temperature,
            classify: config.classify,
            timeout: config.timeout,
        },
    );

    if source == Source::Stdin && stdin_is_terminal {
        eprintln!("Enter text, then press Ctrl+D:");
    }
    let texts =
        input::read_texts(source, io::stdin().lock()).context("Failed to read standard input")?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let waiting = if config.classify {
        "分析中..."
    } else {
        "翻译中..."
    };
    let mut renderer = Renderer::new(io::stdout().lock(), io::stderr(), cli.verbose);
    for text in &texts {
        renderer.begin(text, Spinner::start_if_terminal(waiting));
        let result = translator
            .translate(text, &cancel, &mut |event| renderer.handle(event))
            .await;
        renderer.finish().context("Failed to write output")?;
        result?;
    }

    if cli.usage {
        print_usage(renderer.usage());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_usage(usage: &Usage) {
    eprintln!(
        "Tokens: prompt {}, completion {}, total {}",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    );
}
