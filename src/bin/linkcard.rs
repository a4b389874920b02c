use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use linkcard::{
    CardEdit, CardFile, CardSession, CategoryPreset, CropOutput, DirSink, ExportOptions,
    ExportOutcome, Exporter, HttpFetcher, ImageFetcher, OfflineFetcher, ProfileImage, QrStyle,
    SkipReason, crop_to_circle, resolve_bytes, write_svg,
};

#[derive(Parser, Debug)]
#[command(name = "linkcard", version, about = "Compose and export QR link cards")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the card and save `<NAME>_Memories.png`.
    Export(ExportArgs),
    /// Write the card as SVG, optionally mid-transition.
    Preview(PreviewArgs),
    /// Crop an image to a circle and write it as PNG.
    Crop(CropArgs),
    /// Print the card's scene tree as JSON.
    Dump(DumpArgs),
}

/// Card description: a JSON file plus per-field overrides.
#[derive(Args, Debug)]
struct CardArgs {
    /// Input card JSON (`{name, subtitle, url, avatar?, category?}`).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    subtitle: Option<String>,

    /// Destination URL; an empty value encodes a placeholder.
    #[arg(long)]
    url: Option<String>,

    /// Category preset, e.g. "google-photos".
    #[arg(long)]
    category: Option<CategoryPreset>,

    /// Avatar image: file path, data URI or http(s) URL.
    #[arg(long)]
    avatar: Option<String>,

    /// Do not load remote images.
    #[arg(long, default_value_t = false)]
    no_cors: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Super-sampling scale (overrides LINKCARD_EXPORT_SCALE).
    #[arg(long)]
    scale: Option<f32>,

    /// Extra fonts directory (overrides LINKCARD_FONTS_DIR).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Export as if clicked this many milliseconds after the card appeared.
    #[arg(long)]
    at_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Milliseconds since the card appeared; defaults to fully settled.
    #[arg(long)]
    at_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct CropArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct DumpArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Milliseconds since the card appeared; defaults to fully settled.
    #[arg(long)]
    at_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn build_session(card: &CardArgs, mut export: ExportOptions) -> anyhow::Result<CardSession> {
    if card.no_cors {
        export.use_cors = false;
    }
    let fetcher: Box<dyn ImageFetcher> = if export.use_cors {
        Box::new(HttpFetcher::new()?)
    } else {
        Box::new(OfflineFetcher)
    };

    let file = match &card.in_path {
        Some(path) => CardFile::load(path)?,
        None => CardFile::default(),
    };
    let base_dir = card
        .in_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let mut config = file
        .to_config(base_dir, fetcher.as_ref())
        .context("load card description")?;

    if let Some(avatar) = &card.avatar {
        let bytes = resolve_bytes(avatar, fetcher.as_ref())
            .with_context(|| format!("load avatar '{avatar}'"))?;
        config = config.with_profile_image(Some(
            ProfileImage::from_bytes(&bytes).context("crop avatar")?,
        ));
    }

    let exporter = Exporter::with_fetcher(export, fetcher);
    let mut session = CardSession::with_exporter(QrStyle::default(), exporter)?;
    session.set_config(config)?;

    let mut edits = Vec::new();
    if let Some(preset) = card.category {
        edits.push(CardEdit::Category(preset));
    }
    if let Some(name) = &card.name {
        edits.push(CardEdit::Name(name.clone()));
    }
    if let Some(subtitle) = &card.subtitle {
        edits.push(CardEdit::Subtitle(subtitle.clone()));
    }
    if let Some(url) = &card.url {
        edits.push(CardEdit::Url(url.clone()));
    }
    for edit in edits {
        session.apply(edit)?;
    }
    Ok(session)
}

fn mount_at(session: &mut CardSession, at_ms: Option<u64>) -> anyhow::Result<()> {
    match at_ms {
        Some(ms) => session.mount(Duration::from_millis(ms))?,
        None => session.mount_settled()?,
    };
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut export = ExportOptions::from_env();
    if let Some(scale) = args.scale {
        export.scale = scale;
    }
    if let Some(dir) = args.fonts_dir {
        export.fonts_dir = Some(dir);
    }

    let mut session = build_session(&args.card, export)?;
    mount_at(&mut session, args.at_ms)?;

    let mut sink = DirSink::new(&args.out_dir);
    match session.export(&mut sink)? {
        ExportOutcome::Saved {
            filename,
            width,
            height,
        } => {
            eprintln!(
                "wrote {} ({width}x{height})",
                args.out_dir.join(filename).display()
            );
        }
        ExportOutcome::Skipped(reason) => {
            let why = match reason {
                SkipReason::Unmounted => "no card mounted",
                SkipReason::Busy => "another export is running",
            };
            anyhow::bail!("export skipped: {why}");
        }
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.card, ExportOptions::from_env())?;
    mount_at(&mut session, args.at_ms)?;
    let frame = session.frame().context("card not mounted")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, write_svg(frame))
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let out = crop_to_circle(&bytes)?;
    if matches!(out, CropOutput::Passthrough { .. }) {
        tracing::warn!("image too large to crop, writing it unchanged");
    }

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, out.bytes())
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.card, ExportOptions::from_env())?;
    mount_at(&mut session, args.at_ms)?;
    let frame = session.frame().context("card not mounted")?;
    let json = serde_json::to_string_pretty(frame).context("serialize frame")?;
    println!("{json}");
    Ok(())
}
