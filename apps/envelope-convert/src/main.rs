use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use envelope_conversion::{Converter, ConverterConfig, TagRendering};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod stream;

#[derive(Debug, Parser)]
#[command(name = "envelope-convert")]
#[command(about = "Convert newline-delimited v1 envelopes to v2")]
struct Cli {
    /// Input file; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// JSON converter config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `tag_rendering` from the config file.
    #[arg(long, value_enum)]
    tag_rendering: Option<RenderingArg>,
    /// Log and skip lines that fail to decode instead of aborting.
    #[arg(long)]
    skip_invalid: bool,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderingArg {
    Text,
    Typed,
}

impl From<RenderingArg> for TagRendering {
    fn from(arg: RenderingArg) -> Self {
        match arg {
            RenderingArg::Text => Self::Text,
            RenderingArg::Typed => Self::Typed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(cli: &Cli) -> Result<ConverterConfig> {
    let config = match &cli.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };
    Ok(match cli.tag_rendering {
        Some(rendering) => config.with_tag_rendering(rendering.into()),
        None => config,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let converter = Converter::new(load_config(&cli)?);

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .await
                .with_context(|| format!("failed to open input {path:?}"))?,
        )),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .await
                .with_context(|| format!("failed to create output {path:?}"))?,
        )),
        None => Box::new(BufWriter::new(tokio::io::stdout())),
    };

    let summary = stream::convert_lines(&converter, reader, writer, cli.skip_invalid).await?;
    info!(
        converted = summary.converted,
        skipped = summary.skipped,
        rendering = ?converter.config().tag_rendering,
        "conversion finished"
    );

    Ok(())
}
