use anyhow::{Context, Result};
use clap::Parser;
use liedblatt::{
    normalize, ContentNode, DirectoryFetcher, Exporter, LogProgress, PageFormat, StyleConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liedblatt", about = "Lay out a Liedblatt and write it as PDF", version)]
struct Cli {
    /// Content tree as JSON
    #[arg(short, long)]
    content: PathBuf,

    /// Style configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory serving /ttf, /icons and image URLs
    #[arg(short, long, default_value = ".")]
    assets: PathBuf,

    /// Page format, overrides the configuration (a5, dl, narrow-a4, narrow-a3)
    #[arg(short, long)]
    format: Option<PageFormat>,

    /// Impose the pages onto sheets for folding
    #[arg(short, long)]
    brochure: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Print the normalized blocks as JSON instead of exporting
    #[arg(long)]
    dump_blocks: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .init();

    let json = std::fs::read_to_string(&cli.content)
        .with_context(|| format!("Failed to read {}", cli.content.display()))?;
    let content = ContentNode::from_json(&json)
        .with_context(|| format!("Failed to parse content tree {}", cli.content.display()))?;

    if cli.dump_blocks {
        let stream = normalize(&content);
        println!("{}", serde_json::to_string_pretty(&stream)?);
        return Ok(());
    }

    let mut style = match &cli.config {
        Some(path) => StyleConfig::load(path)
            .with_context(|| format!("Failed to load style configuration {}", path.display()))?,
        None => StyleConfig::default(),
    };
    if let Some(format) = cli.format {
        style.page_format = format;
    }

    let fetcher = DirectoryFetcher::new(&cli.assets);
    let progress = LogProgress;
    let artifact = Exporter::new(&style, &fetcher)
        .with_progress(&progress)
        .export(&content, cli.brochure)
        .context("Export failed")?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("Failed to create {}", cli.out.display()))?;
    let path = cli.out.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Wrote {} ({} pages, {} PDF pages)",
        path.display(),
        artifact.page_count,
        artifact.sheet_count
    );
    Ok(())
}
