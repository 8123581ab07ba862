use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use studyscribe::{Config, FfmpegAnalyzer, OpenAiStt, TranscriptionPipeline};
use tracing::info;

/// Silence-aware chunked audio transcription.
#[derive(Parser, Debug)]
#[command(name = "studyscribe", version)]
struct Cli {
    /// Audio file to transcribe (MP3)
    input: PathBuf,

    /// Override the configured STT model
    #[arg(long)]
    model: Option<String>,

    /// Override the configured language hint
    #[arg(long)]
    language: Option<String>,

    /// Override the configured response format
    #[arg(long)]
    response_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut cfg = Config::from_env().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        cfg.stt_model = model;
    }
    if let Some(language) = cli.language {
        cfg.stt_language = language;
    }
    if let Some(format) = cli.response_format {
        cfg.stt_response_format = format;
    }

    info!(
        "Model: {} (language {}, format {})",
        cfg.stt_model, cfg.stt_language, cfg.stt_response_format
    );
    info!("Chunk limit: {} bytes", cfg.max_chunk_bytes);

    let audio = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let pipeline = TranscriptionPipeline::new(
        Arc::new(FfmpegAnalyzer::new()),
        Arc::new(OpenAiStt::from_env()?),
        cfg,
    );

    let transcript = pipeline.transcribe(&audio).await?;
    println!("{transcript}");

    Ok(())
}
