use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "spritepack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack every sprite set of a manifest into annotated PNG sheets.
    Pack(PackArgs),
    /// Print the palette dump and control table of a written sheet as JSON.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame manifest JSON.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output directory (created if missing).
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    canvas_width: Option<u32>,

    #[arg(long)]
    canvas_height: Option<u32>,

    /// Worker threads (default: available parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Encoder-to-rewriter pipe depth in segments.
    #[arg(long)]
    pipe_capacity: Option<usize>,

    /// Chunk types used for the metadata pair.
    #[arg(long, value_enum)]
    chunk_tags: Option<TagChoice>,

    #[arg(long, value_enum)]
    failure_policy: Option<PolicyChoice>,

    /// PNG deflate effort.
    #[arg(long, value_enum)]
    compression: Option<CompressionChoice>,

    /// Zero-padded digits of the sprite set index in output file names.
    #[arg(long)]
    file_name_width: Option<usize>,

    /// Keep the output file of a failed job instead of deleting it.
    #[arg(long)]
    keep_partial: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Sprite sheet PNG written by `pack`.
    file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TagChoice {
    Private,
    Legacy,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    DrainAll,
    StopScheduling,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionChoice {
    Fast,
    Default,
    Best,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_config(args: &PackArgs) -> anyhow::Result<spritepack::PackConfig> {
    let mut cfg = match &args.config {
        Some(path) => spritepack::PackConfig::from_json_file(path)?,
        None => spritepack::PackConfig::default(),
    };

    if let Some(source) = &args.source {
        cfg.source_path = source.clone();
    }
    if let Some(out) = &args.out {
        cfg.output_dir = out.clone();
    }
    if let Some(w) = args.canvas_width {
        cfg.canvas_width = w;
    }
    if let Some(h) = args.canvas_height {
        cfg.canvas_height = h;
    }
    if let Some(n) = args.workers {
        cfg.workers = Some(n);
    }
    if let Some(n) = args.pipe_capacity {
        cfg.pipe_capacity = n;
    }
    if let Some(tags) = args.chunk_tags {
        cfg.chunk_tags = match tags {
            TagChoice::Private => spritepack::ChunkTagStyle::Private,
            TagChoice::Legacy => spritepack::ChunkTagStyle::Legacy,
        };
    }
    if let Some(policy) = args.failure_policy {
        cfg.failure_policy = match policy {
            PolicyChoice::DrainAll => spritepack::FailurePolicy::DrainAll,
            PolicyChoice::StopScheduling => spritepack::FailurePolicy::StopScheduling,
        };
    }
    if let Some(level) = args.compression {
        cfg.compression = match level {
            CompressionChoice::Fast => spritepack::PngCompression::Fast,
            CompressionChoice::Default => spritepack::PngCompression::Default,
            CompressionChoice::Best => spritepack::PngCompression::Best,
        };
    }
    if let Some(width) = args.file_name_width {
        cfg.file_name_width = width;
    }
    if args.keep_partial {
        cfg.remove_partial_outputs = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;

    std::fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir '{}'", cfg.output_dir.display()))?;

    let source = spritepack::ManifestSource::new(cfg.source_path.clone());
    let report = spritepack::pack(&cfg, &source)
        .with_context(|| format!("pack '{}'", cfg.source_path.display()))?;

    eprintln!(
        "packed {} sprite sets into {} ({} written, {} skipped)",
        report.total,
        cfg.output_dir.display(),
        report.written,
        report.skipped
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let info = spritepack::inspect_file(&args.file)
        .with_context(|| format!("inspect '{}'", args.file.display()))?;
    let json = serde_json::to_string_pretty(&info).context("serialize sheet info")?;
    println!("{json}");
    Ok(())
}
