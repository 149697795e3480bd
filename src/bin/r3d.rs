use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "r3d", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every backend advertised by the registered factories.
    List(ListArgs),
    /// Clear one frame on a backend and save it as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Print metadata as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Backend id, as printed by `list`.
    #[arg(long, default_value = "soft_x11")]
    backend: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Viewport width, overrides the settings file.
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height, overrides the settings file.
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    r3d::register_builtin_factories().context("register built-in factories")?;

    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let found = r3d::discover();
    if args.json {
        let meta: Vec<_> = found.iter().map(|b| b.metadata).collect();
        println!("{}", serde_json::to_string_pretty(&meta)?);
        return Ok(());
    }

    for b in &found {
        println!(
            "{:<16} {:<32} window={:?} format={:?} (factory '{}' #{})",
            b.metadata.id,
            b.metadata.display,
            b.metadata.window,
            b.metadata.format,
            b.factory.name(),
            b.index
        );
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => r3d::BackendSettings::from_json_file(path)?,
        None => r3d::BackendSettings {
            viewport: r3d::Viewport::new(0, 0, 256, 256),
            ..Default::default()
        },
    };
    if let Some(w) = args.width {
        settings.viewport.width = isize::try_from(w).context("width out of range")?;
    }
    if let Some(h) = args.height {
        settings.viewport.height = isize::try_from(h).context("height out of range")?;
    }

    let entry = r3d::with_registry(|r| r.find(&args.backend))?;
    tracing::info!(backend = entry.metadata.id, factory = entry.factory.name(), "using backend");

    let mut backend = entry.create()?;
    backend.init()?;
    settings.apply(backend.as_mut())?;

    backend.start()?;
    let raw = settings.read_pixels(backend.as_mut())?;
    backend.finish()?;
    backend.destroy();

    let (width, height) = settings.viewport.extent();
    tracing::debug!(format = ?settings.pixel_format, bytes = raw.len(), "read back frame");
    let pixels = settings.pixel_format.convert_to_rgba8(&raw);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &pixels,
        u32::try_from(width).context("width out of range")?,
        u32::try_from(height).context("height out of range")?,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
