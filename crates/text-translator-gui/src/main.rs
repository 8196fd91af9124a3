//! Text Translator - Desktop window for translating text files, PDFs and clipboard text.

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use text_translator_core::{AppConfig, TextTranslator};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::TranslatorApp;

#[derive(Parser, Debug)]
#[command(name = "text-translator")]
#[command(author, version, about = "Translate text with local neural models", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding opus-mt-{src}-{tgt} models
    #[arg(long, env = "TEXT_TRANSLATOR_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // winit and wgpu log every frame at debug level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{default_level},winit=warn,wgpu=warn,eframe=warn"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    if let Some(dir) = args.models_dir {
        config.translator.marian.models_dir = Some(dir);
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let translator = TextTranslator::new(config).context("Failed to initialize translator")?;
    info!("Translator backend: {}", translator.translator_info().name);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Text Translator")
            .with_inner_size([1100.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Text Translator",
        options,
        Box::new(move |_cc| Ok(Box::new(TranslatorApp::new(translator, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {e}"))
}
