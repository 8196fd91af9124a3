//! Text Translator CLI - Translate a text file, PDF or the clipboard from the command line.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use text_translator_core::{
    AppConfig, AppState, Backend, BlankLines, Clipboard, Lang, TextTranslator, source_for_path,
    translate_text,
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendOption {
    /// Local opus-mt models
    Marian,
    /// OpenAI-compatible API
    Openai,
}

impl From<BackendOption> for Backend {
    fn from(opt: BackendOption) -> Self {
        match opt {
            BackendOption::Marian => Self::Marian,
            BackendOption::Openai => Self::OpenAi,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "text-translate")]
#[command(
    author,
    version,
    about = "Translate text files, PDFs or the clipboard",
    long_about = None
)]
#[command(group(ArgGroup::new("text_source").required(true).args(["input", "clipboard"])))]
struct Args {
    /// Input file (.txt or .pdf)
    input: Option<PathBuf>,

    /// Read the input from the clipboard
    #[arg(long)]
    clipboard: bool,

    /// Source language code (de, en, fr, es, it, nl, pt, ru, zh)
    #[arg(short = 's', long, env = "TEXT_TRANSLATOR_SOURCE")]
    source: Option<String>,

    /// Target language code
    #[arg(short = 't', long, env = "TEXT_TRANSLATOR_TARGET")]
    target: Option<String>,

    /// Save the translation as PDF instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep blank lines between paragraphs
    #[arg(long)]
    keep_blank_lines: bool,

    /// Translation backend
    #[arg(long, value_enum)]
    backend: Option<BackendOption>,

    /// Directory holding opus-mt-{src}-{tgt} models
    #[arg(long, env = "TEXT_TRANSLATOR_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// OpenAI API base URL
    #[arg(long, env = "OPENAI_API_BASE")]
    api_base: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    api_key: Option<String>,

    /// Model name for OpenAI-compatible API
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Disable the paragraph cache
    #[arg(long)]
    no_cache: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Fold command line overrides into the loaded configuration.
fn apply_args(config: &mut AppConfig, args: &Args) -> Result<()> {
    if let Some(ref code) = args.source {
        config.source_lang = Some(Lang::parse_supported(code)?);
    }
    if let Some(ref code) = args.target {
        config.target_lang = Some(Lang::parse_supported(code)?);
    }
    if args.keep_blank_lines {
        config.blank_lines = BlankLines::Preserve;
    }
    if let Some(backend) = args.backend {
        config.translator.backend = backend.into();
    }
    if let Some(ref dir) = args.models_dir {
        config.translator.marian.models_dir = Some(dir.clone());
    }
    if let Some(ref api_base) = args.api_base {
        config.translator.openai.api_base.clone_from(api_base);
    }
    if args.api_key.is_some() {
        config.translator.openai.api_key.clone_from(&args.api_key);
    }
    if let Some(ref model) = args.model {
        config.translator.openai.model.clone_from(model);
    }
    if args.no_cache {
        config.cache.memory_enabled = false;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    apply_args(&mut config, &args)?;

    let mut state = AppState::from_config(&config);

    // Load input
    if let Some(ref input) = args.input {
        info!("Loading input: {}", input.display());
        let source = source_for_path(input)?;
        state
            .open_file(source.as_ref())
            .with_context(|| format!("Failed to read {}", input.display()))?;
    } else {
        state
            .paste_from_clipboard(&Clipboard)
            .context("Failed to read the clipboard")?;
    }

    let translator =
        TextTranslator::new(config.clone()).context("Failed to initialize translator")?;

    let job = state.prepare_translation()?;
    info!(
        "Translating {} with {}",
        job.pair(),
        translator.translator_info().name
    );

    // Setup progress bar
    let pb = ProgressBar::new(0);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template(concat!(
                "{spinner:.green} [{elapsed_precise}] ",
                "[{bar:40.cyan/blue}] {pos}/{len} paragraphs ({eta})",
            ))
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = |done: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    };

    let translated = translate_text(
        job.text(),
        translator.translator().as_ref(),
        job.pair(),
        translator.blank_lines(),
        Some(&report),
    )
    .await
    .context("Translation failed")?;

    pb.finish_and_clear();
    state.finish_translation(translated);

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        if let Some(ref output) = args.output {
            let saved = translator
                .save_as_pdf(&state, output)
                .with_context(|| format!("Failed to write output: {}", output.display()))?;
            println!("Translated PDF saved to: {}", saved.display());
        } else {
            println!("{}", state.output_text);
        }
    }

    Ok(())
}
